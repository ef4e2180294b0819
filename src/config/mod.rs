// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver configuration.
//!
//! Configuration is read once at startup and never mutated. It lists the
//! monitored sensors with their output routing, and (separately, see
//! [`ServiceTable`]) which readings of each family are published.
//!
//! # Examples
//!
//! ```
//! use fs20_lib::config::DriverConfig;
//!
//! let config = DriverConfig::from_json(r#"{
//!     "port": "/dev/ttyACM0",
//!     "sensors": [
//!         { "id": "k01", "feedId": "garden-weather" },
//!         { "id": "E0A0B", "feedId": "house-energy" }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(config.baud_rate, 38400);
//! assert_eq!(config.sensors[1].id.as_str(), "e0a0b");
//! ```

mod services;

use std::collections::BTreeMap;
use std::path::Path;

pub use services::{FamilyServices, ServiceDef, ServiceTable};

use crate::error::ConfigError;
use crate::types::DeviceIdentity;

/// Default CUL baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Top-level driver configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverConfig {
    /// Serial device of the gateway. Used by whoever opens the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Serial baud rate. Used by whoever opens the transport.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Sensors to monitor.
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl DriverConfig {
    /// Creates an empty configuration with default transport settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            sensors: Vec::new(),
        }
    }

    /// Adds a monitored sensor.
    #[must_use]
    pub fn with_sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensors.push(sensor);
        self
    }

    /// Sets the serial device path.
    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or a
    /// sensor identity is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Json`] if it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One monitored sensor.
///
/// Fields other than `id` and `feedId` are kept verbatim in `extra` and
/// ignored by the decoder pipeline.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConfig {
    /// Identity of the physical device.
    pub id: DeviceIdentity,
    /// Routing target passed to the event sink.
    pub feed_id: String,
    /// Any further settings.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SensorConfig {
    /// Creates a sensor entry.
    #[must_use]
    pub fn new(id: DeviceIdentity, feed_id: impl Into<String>) -> Self {
        Self {
            id,
            feed_id: feed_id.into(),
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_fields_are_missing() {
        let config = DriverConfig::from_json("{}").unwrap();
        assert_eq!(config, DriverConfig::new());
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
    }

    #[test]
    fn keeps_extra_sensor_settings() {
        let config = DriverConfig::from_json(
            r#"{ "sensors": [ { "id": "f1a2b", "feedId": "hall", "room": "hall" } ] }"#,
        )
        .unwrap();
        let sensor = &config.sensors[0];
        assert_eq!(sensor.feed_id, "hall");
        assert_eq!(sensor.extra.get("room"), Some(&serde_json::json!("hall")));
    }

    #[test]
    fn invalid_identity_is_rejected() {
        let err = DriverConfig::from_json(r#"{ "sensors": [ { "id": "q01", "feedId": "x" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn builder_matches_json() {
        let built = DriverConfig::new()
            .with_port("/dev/ttyACM0")
            .with_sensor(SensorConfig::new("k01".parse().unwrap(), "garden"));
        let parsed = DriverConfig::from_json(
            r#"{ "port": "/dev/ttyACM0", "sensors": [ { "id": "K01", "feedId": "garden" } ] }"#,
        )
        .unwrap();
        assert_eq!(built, parsed);
    }
}
