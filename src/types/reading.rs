// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded reading values.

use std::collections::BTreeMap;
use std::fmt;

/// Well-known reading names produced by the decoders.
pub mod names {
    /// Weather station and thermostat temperature in °C.
    pub const TEMPERATURE: &str = "temperature";
    /// Relative humidity in percent.
    pub const HUMIDITY: &str = "humidity";

    /// Rolling pulse counter of an energy meter.
    pub const COUNTER: &str = "counter";
    /// Cumulative pulse count.
    pub const CUMULATIVE: &str = "cumulative";
    /// Pulses in the last interval, normalised to an hourly rate.
    pub const INTERVAL: &str = "interval";
    /// Consumption derived from the fastest pulse in the interval.
    pub const PEAK: &str = "peak";

    /// Valve opening in percent.
    pub const VALVE_POSITION: &str = "valvePosition";
    /// Actuator status label.
    pub const ACTUATOR_STATUS: &str = "actuatorStatus";
    /// Desired temperature set-point in °C.
    pub const DESIRED_TEMP: &str = "desiredTemp";
    /// Day temperature set-point in °C.
    pub const DAY_TEMP: &str = "dayTemp";
    /// Night temperature set-point in °C.
    pub const NIGHT_TEMP: &str = "nightTemp";
    /// Low byte of the measured temperature.
    pub const LOW_TEMP: &str = "lowTemp";
    /// High byte of the measured temperature.
    pub const HIGH_TEMP: &str = "highTemp";
    /// Thermostat warning flags.
    pub const WARNINGS: &str = "warnings";
    /// Thermostat acknowledge parameter.
    pub const ACKNOWLEDGE: &str = "acknowledge";
    /// Thermostat "can transmit" parameter.
    pub const CAN_TRANSMIT: &str = "canTransmit";
    /// Thermostat "can receive" parameter.
    pub const CAN_RECEIVE: &str = "canReceive";
    /// Thermostat start-of-transmission parameter.
    pub const START_TRANSMIT: &str = "startTransmit";
    /// Thermostat end-of-transmission parameter.
    pub const END_TRANSMIT: &str = "endTransmit";

    /// Motion sensor brightness.
    pub const BRIGHTNESS: &str = "brightness";
}

/// A single reading value.
///
/// Serialises untagged, so numbers appear as JSON numbers and labels as
/// JSON strings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    /// A numeric reading.
    Number(f64),
    /// A textual reading such as a status label.
    Text(String),
}

impl ReadingValue {
    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u8> for ReadingValue {
    fn from(value: u8) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u16> for ReadingValue {
    fn from(value: u16) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ReadingValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A set of named readings.
///
/// Ordered by name so that two sets compare and serialise identically
/// regardless of insertion order.
///
/// # Examples
///
/// ```
/// use fs20_lib::types::{Readings, names};
///
/// let mut readings = Readings::new();
/// readings.set(names::TEMPERATURE, 12.3);
/// assert_eq!(readings.number(names::TEMPERATURE), Some(12.3));
/// assert_eq!(readings.number(names::HUMIDITY), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Readings(BTreeMap<String, ReadingValue>);

impl Readings {
    /// Creates an empty reading set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a reading, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ReadingValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Gets a reading by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReadingValue> {
        self.0.get(name)
    }

    /// Gets a numeric reading by name.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ReadingValue::as_f64)
    }

    /// Returns `true` if a reading with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Merges `other` into this set, overwriting readings with the same name.
    ///
    /// Readings absent from `other` are kept. Returns `true` if any stored
    /// value changed.
    pub fn merge(&mut self, other: Readings) -> bool {
        let mut changed = false;
        for (name, value) in other.0 {
            if self.0.get(&name) != Some(&value) {
                self.0.insert(name, value);
                changed = true;
            }
        }
        changed
    }

    /// Returns the number of readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no readings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over readings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReadingValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<ReadingValue>> FromIterator<(K, V)> for Readings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Readings {
    type Item = (String, ReadingValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ReadingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_absent_readings() {
        let mut stored: Readings = [(names::LOW_TEMP, 32u8)].into_iter().collect();
        let changed = stored.merge([(names::DESIRED_TEMP, 21.5)].into_iter().collect());

        assert!(changed);
        assert_eq!(stored.number(names::LOW_TEMP), Some(32.0));
        assert_eq!(stored.number(names::DESIRED_TEMP), Some(21.5));
    }

    #[test]
    fn merge_reports_no_change_for_equal_values() {
        let mut stored: Readings = [(names::BRIGHTNESS, 7u8)].into_iter().collect();
        assert!(!stored.merge([(names::BRIGHTNESS, 7u8)].into_iter().collect()));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = Readings::new();
        a.set("x", 1u8);
        a.set("y", "on");
        let mut b = Readings::new();
        b.set("y", "on");
        b.set("x", 1u8);
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut readings = Readings::new();
        readings.set(names::HUMIDITY, 45.0);
        readings.set(names::ACTUATOR_STATUS, "position");
        let json = serde_json::to_value(&readings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "actuatorStatus": "position", "humidity": 45.0 })
        );
    }

    #[test]
    fn value_accessors() {
        assert_eq!(ReadingValue::from(3u16).as_f64(), Some(3.0));
        assert_eq!(ReadingValue::from("open").as_text(), Some("open"));
        assert_eq!(ReadingValue::from("open").as_f64(), None);
        assert_eq!(ReadingValue::from(12.5).to_string(), "12.5");
    }
}
