// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EM energy meter decoder.

use crate::frame::ByteFrame;
use crate::types::{Family, Readings, names};

use super::{DeviceDecoder, round_tenth, show};

const COUNTER_INDEX: usize = 2;
const CUMULATIVE_INDEX: usize = 3;
const INTERVAL_INDEX: usize = 5;
const PEAK_INDEX: usize = 7;

/// Sampling intervals per hour (the meter reports every 5 minutes).
const INTERVALS_PER_HOUR: u32 = 12;

/// Decoder for energy meter frames (`E`).
///
/// Payload layout after the two address bytes:
///
/// | Bytes | Content |
/// |-------|---------|
/// | 2     | rolling packet counter |
/// | 3-4   | cumulative pulses (little-endian) |
/// | 5-6   | pulses in the last interval (little-endian) |
/// | 7-8   | duration of the fastest pulse, in tenths of a second |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnergyMeterDecoder;

impl EnergyMeterDecoder {
    /// Returns the hourly consumption implied by the last interval.
    #[must_use]
    pub fn interval_consumption(frame: &ByteFrame) -> Option<u32> {
        frame
            .get_u16_le(INTERVAL_INDEX)
            .map(|pulses| u32::from(pulses) * INTERVALS_PER_HOUR)
    }

    /// Returns the consumption rate implied by the fastest pulse in the
    /// interval, rounded to one decimal.
    ///
    /// A zero pulse duration yields `None` rather than an infinite rate.
    #[must_use]
    pub fn peak_consumption(frame: &ByteFrame) -> Option<f64> {
        let tenths = frame.get_u16_le(PEAK_INDEX)?;
        if tenths == 0 {
            return None;
        }
        let seconds = f64::from(tenths) / 10.0;
        Some(round_tenth(3600.0 / seconds))
    }
}

impl DeviceDecoder for EnergyMeterDecoder {
    fn family(&self) -> Family {
        Family::EnergyMeter
    }

    fn decode(&self, frame: &ByteFrame, _prior: &Readings) -> Readings {
        let mut readings = Readings::new();
        if let Some(counter) = frame.get(COUNTER_INDEX) {
            readings.set(names::COUNTER, counter);
        }
        if let Some(cumulative) = frame.get_u16_le(CUMULATIVE_INDEX) {
            readings.set(names::CUMULATIVE, cumulative);
        }
        if let Some(interval) = Self::interval_consumption(frame) {
            readings.set(names::INTERVAL, interval);
        }
        match Self::peak_consumption(frame) {
            Some(peak) => readings.set(names::PEAK, peak),
            None if frame.get_u16_le(PEAK_INDEX) == Some(0) => {
                tracing::trace!(frame = %frame, "Zero peak time, omitting peak reading");
            }
            None => {}
        }
        readings
    }

    fn describe(&self, frame: &ByteFrame) -> String {
        format!(
            "Counter: {} Cumulative: {} Interval: {}, Peak: {}",
            show(frame.get(COUNTER_INDEX)),
            show(frame.get_u16_le(CUMULATIVE_INDEX)),
            show(frame.get_u16_le(INTERVAL_INDEX)),
            show(frame.get_u16_le(PEAK_INDEX)),
        )
    }
}
