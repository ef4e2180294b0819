// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Published field tables per device family.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{Family, Readings, names};

/// One published field: the name under which a reading is emitted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceDef {
    /// Published field name.
    pub name: String,
}

/// Readings published for one family, keyed by reading name.
///
/// Readings without an entry are tracked but never published, and never
/// count as a change on their own.
///
/// # Examples
///
/// ```
/// use fs20_lib::config::FamilyServices;
/// use fs20_lib::types::{Readings, names};
///
/// let services = FamilyServices::new().with_service(names::TEMPERATURE, "temp");
///
/// let mut values = Readings::new();
/// values.set(names::TEMPERATURE, 21.5);
/// values.set(names::LOW_TEMP, 215u8);
///
/// let projection = services.project(&values);
/// assert_eq!(projection.number("temp"), Some(21.5));
/// assert_eq!(projection.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FamilyServices {
    #[serde(default)]
    services: BTreeMap<String, ServiceDef>,
}

impl FamilyServices {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `reading` under `published_name`.
    #[must_use]
    pub fn with_service(mut self, reading: impl Into<String>, published_name: impl Into<String>) -> Self {
        self.services.insert(
            reading.into(),
            ServiceDef {
                name: published_name.into(),
            },
        );
        self
    }

    /// Returns the published name of a reading, if it is published.
    #[must_use]
    pub fn published_name(&self, reading: &str) -> Option<&str> {
        self.services.get(reading).map(|def| def.name.as_str())
    }

    /// Returns the number of published readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if nothing is published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Builds the published projection of `values`: each published reading
    /// present in `values`, renamed to its published name.
    #[must_use]
    pub fn project(&self, values: &Readings) -> Readings {
        self.services
            .iter()
            .filter_map(|(reading, def)| {
                values
                    .get(reading)
                    .map(|value| (def.name.clone(), value.clone()))
            })
            .collect()
    }

    fn identity(readings: &[&str]) -> Self {
        readings
            .iter()
            .fold(Self::new(), |services, reading| services.with_service(*reading, *reading))
    }
}

/// Published field tables for every family.
///
/// The JSON form is keyed by family header letter:
///
/// ```json
/// { "K": { "services": { "temperature": { "name": "temperature" } } } }
/// ```
///
/// [`ServiceTable::default`] publishes the main readings of every family
/// under their own names.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ServiceTable(BTreeMap<Family, FamilyServices>);

impl ServiceTable {
    /// Creates a table with no families.
    #[must_use]
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Parses a table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or names an
    /// unknown family.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a table from a JSON file.
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

    /// Sets the table for one family, replacing any previous entry.
    #[must_use]
    pub fn with_family(mut self, family: Family, services: FamilyServices) -> Self {
        self.0.insert(family, services);
        self
    }

    /// Returns the table for a family.
    #[must_use]
    pub fn get(&self, family: Family) -> Option<&FamilyServices> {
        self.0.get(&family)
    }
}

impl Default for ServiceTable {
    fn default() -> Self {
        Self::empty()
            .with_family(
                Family::Thermostat,
                FamilyServices::identity(&[
                    names::TEMPERATURE,
                    names::VALVE_POSITION,
                    names::DESIRED_TEMP,
                    names::DAY_TEMP,
                    names::NIGHT_TEMP,
                ]),
            )
            .with_family(
                Family::EnergyMeter,
                FamilyServices::identity(&[names::CUMULATIVE, names::INTERVAL, names::PEAK]),
            )
            .with_family(
                Family::WeatherStation,
                FamilyServices::identity(&[names::TEMPERATURE, names::HUMIDITY]),
            )
            .with_family(
                Family::MotionSensor,
                FamilyServices::identity(&[names::BRIGHTNESS]),
            )
    }
}
