// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! KS300/ASH weather station decoder.
//!
//! Temperature and humidity are BCD-like nibbles spread over bytes 0-3:
//!
//! ```text
//! byte 0   bit 7      temperature sign (1 = negative)
//! byte 1   high/low   temperature units / tenths
//! byte 2   high/low   humidity tenths / temperature tens
//! byte 3   high/low   humidity tens / units
//! ```

use crate::frame::ByteFrame;
use crate::types::{Family, Readings, names};

use super::{DeviceDecoder, show};

/// Decoder for weather station frames (`K`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherStationDecoder;

impl WeatherStationDecoder {
    /// Returns the temperature in °C, or `None` if bytes 0-2 are missing.
    #[must_use]
    pub fn temperature(frame: &ByteFrame) -> Option<f64> {
        let negative = frame.get(0)? & 0x80 != 0;
        let b1 = frame.get(1)?;
        let b2 = frame.get(2)?;

        let tenths = u16::from(b2 & 0x0f) * 100 + u16::from(b1 >> 4) * 10 + u16::from(b1 & 0x0f);
        let value = f64::from(tenths) / 10.0;
        Some(if negative && tenths != 0 { -value } else { value })
    }

    /// Returns the relative humidity in percent, or `None` if bytes 2-3
    /// are missing.
    #[must_use]
    pub fn humidity(frame: &ByteFrame) -> Option<f64> {
        let b2 = frame.get(2)?;
        let b3 = frame.get(3)?;

        let tenths = u16::from(b3 >> 4) * 100 + u16::from(b3 & 0x0f) * 10 + u16::from(b2 >> 4);
        Some(f64::from(tenths) / 10.0)
    }
}

impl DeviceDecoder for WeatherStationDecoder {
    fn family(&self) -> Family {
        Family::WeatherStation
    }

    fn decode(&self, frame: &ByteFrame, _prior: &Readings) -> Readings {
        let mut readings = Readings::new();
        if let Some(temperature) = Self::temperature(frame) {
            readings.set(names::TEMPERATURE, temperature);
        }
        if let Some(humidity) = Self::humidity(frame) {
            readings.set(names::HUMIDITY, humidity);
        }
        readings
    }

    fn describe(&self, frame: &ByteFrame) -> String {
        format!(
            "Temp: {} Humidity: {}",
            show(Self::temperature(frame)),
            show(Self::humidity(frame))
        )
    }
}
