// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-family decoders and the header dispatch table.
//!
//! Each family has a stateless decoder turning a [`ByteFrame`] into the
//! device identity and a set of named [`Readings`]. The [`Decoder`] enum
//! closes over the four families and [`DecoderRegistry`] selects one by
//! frame header.
//!
//! # Examples
//!
//! ```
//! use fs20_lib::decoder::DecoderRegistry;
//! use fs20_lib::frame::ByteFrame;
//! use fs20_lib::types::{Readings, names};
//!
//! let registry = DecoderRegistry::new();
//! let frame = ByteFrame::parse("K00230145").unwrap();
//!
//! let decoder = registry.select(frame.header()).unwrap();
//! let decoded = decoder.decode(&frame, &Readings::new());
//!
//! assert_eq!(decoded.identity.as_str(), "k00");
//! assert_eq!(decoded.readings.number(names::TEMPERATURE), Some(12.3));
//! assert_eq!(decoded.readings.number(names::HUMIDITY), Some(45.0));
//! ```

mod energy;
mod motion;
mod thermostat;
mod weather;

use std::collections::HashMap;

pub use energy::EnergyMeterDecoder;
pub use motion::MotionSensorDecoder;
pub use thermostat::{ActuatorStatus, ThermostatDecoder, ThermostatMessage};
pub use weather::WeatherStationDecoder;

use crate::frame::ByteFrame;
use crate::types::{DeviceIdentity, Family, Readings};

/// Capabilities shared by every device-family decoder.
pub trait DeviceDecoder {
    /// The family this decoder understands.
    fn family(&self) -> Family;

    /// Derives the identity of the device that sent `frame`.
    ///
    /// The identity is the header followed by the family's address bytes.
    /// Address bytes missing from a short frame are left out.
    fn identity(&self, frame: &ByteFrame) -> DeviceIdentity {
        let payload = frame.payload();
        let width = self.family().address_len().min(payload.len());
        DeviceIdentity::derive(frame.header(), &payload[..width])
    }

    /// Extracts readings from `frame`.
    ///
    /// `prior` holds the values previously stored for the device, for
    /// readings that span more than one frame. Readings whose bytes are
    /// missing are skipped.
    fn decode(&self, frame: &ByteFrame, prior: &Readings) -> Readings;

    /// Renders a one-line human-readable description of `frame`.
    fn describe(&self, frame: &ByteFrame) -> String;
}

/// The output of one decoder invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Identity of the device that produced the frame.
    pub identity: DeviceIdentity,
    /// Readings carried by the frame.
    pub readings: Readings,
}

/// A decoder for one of the supported device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// FHT thermostat and valve actuator.
    Thermostat(ThermostatDecoder),
    /// EM energy meter.
    EnergyMeter(EnergyMeterDecoder),
    /// KS300/ASH weather station.
    WeatherStation(WeatherStationDecoder),
    /// PIRI motion sensor.
    MotionSensor(MotionSensorDecoder),
}

impl Decoder {
    /// Returns the decoder for `family`.
    #[must_use]
    pub const fn for_family(family: Family) -> Self {
        match family {
            Family::Thermostat => Self::Thermostat(ThermostatDecoder),
            Family::EnergyMeter => Self::EnergyMeter(EnergyMeterDecoder),
            Family::WeatherStation => Self::WeatherStation(WeatherStationDecoder),
            Family::MotionSensor => Self::MotionSensor(MotionSensorDecoder),
        }
    }

    /// Derives the identity and decodes the readings in one call.
    #[must_use]
    pub fn decode(&self, frame: &ByteFrame, prior: &Readings) -> Decoded {
        Decoded {
            identity: self.identity(frame),
            readings: DeviceDecoder::decode(self, frame, prior),
        }
    }
}

impl DeviceDecoder for Decoder {
    fn family(&self) -> Family {
        match self {
            Self::Thermostat(d) => d.family(),
            Self::EnergyMeter(d) => d.family(),
            Self::WeatherStation(d) => d.family(),
            Self::MotionSensor(d) => d.family(),
        }
    }

    fn decode(&self, frame: &ByteFrame, prior: &Readings) -> Readings {
        match self {
            Self::Thermostat(d) => d.decode(frame, prior),
            Self::EnergyMeter(d) => d.decode(frame, prior),
            Self::WeatherStation(d) => d.decode(frame, prior),
            Self::MotionSensor(d) => d.decode(frame, prior),
        }
    }

    fn describe(&self, frame: &ByteFrame) -> String {
        match self {
            Self::Thermostat(d) => d.describe(frame),
            Self::EnergyMeter(d) => d.describe(frame),
            Self::WeatherStation(d) => d.describe(frame),
            Self::MotionSensor(d) => d.describe(frame),
        }
    }
}

/// Lookup table from frame header to decoder.
///
/// Headers are matched exactly. Unknown headers select nothing, because
/// the gateway relays families this library does not decode.
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<char, Decoder>,
}

impl DecoderRegistry {
    /// Creates a registry covering every supported family.
    #[must_use]
    pub fn new() -> Self {
        Self::with_families(Family::ALL)
    }

    /// Creates a registry restricted to the given families.
    #[must_use]
    pub fn with_families(families: impl IntoIterator<Item = Family>) -> Self {
        let decoders = families
            .into_iter()
            .map(|family| (family.header(), Decoder::for_family(family)))
            .collect();
        Self { decoders }
    }

    /// Selects the decoder for a frame header.
    #[must_use]
    pub fn select(&self, header: char) -> Option<Decoder> {
        self.decoders.get(&header).copied()
    }

    /// Returns the number of registered decoders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` if no decoder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds to one decimal place.
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Formats an optional byte, using `-` for an absent one.
pub(crate) fn show(value: Option<impl std::fmt::Display>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
