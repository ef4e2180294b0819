// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State of every monitored device, keyed by identity.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::config::{DriverConfig, ServiceTable};
use crate::decoder::{Decoder, DeviceDecoder};
use crate::frame::ByteFrame;
use crate::types::DeviceIdentity;

use super::{ApplyOutcome, DeviceState};

/// Result of routing a frame through the [`StateTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// No monitored device has the frame's identity.
    Unmonitored(DeviceIdentity),
    /// The frame was applied to the device's state.
    Applied(ApplyOutcome),
}

/// Collection of [`DeviceState`]s for the configured sensors.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    devices: HashMap<DeviceIdentity, DeviceState>,
}

impl StateTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one state per configured sensor.
    ///
    /// Sensors whose family has no entry in `services` are skipped, as are
    /// repeated identities after the first.
    #[must_use]
    pub fn from_config(config: &DriverConfig, services: &ServiceTable) -> Self {
        let mut tracker = Self::new();
        for sensor in &config.sensors {
            let Some(family) = sensor.id.family() else {
                tracing::warn!(id = %sensor.id, "Sensor identity names no device family, skipping");
                continue;
            };
            let Some(family_services) = services.get(family) else {
                tracing::warn!(id = %sensor.id, %family, "No services defined for family, skipping sensor");
                continue;
            };
            if !tracker.insert(DeviceState::new(sensor.clone(), family_services.clone())) {
                tracing::warn!(id = %sensor.id, "Duplicate sensor identity, keeping the first entry");
            }
        }
        tracing::debug!(sensors = tracker.len(), "Device states created");
        tracker
    }

    /// Adds a bound device state. Returns `false` if the state is unbound or
    /// its identity is already tracked.
    pub fn insert(&mut self, state: DeviceState) -> bool {
        let Some(identity) = state.identity().cloned() else {
            return false;
        };
        match self.devices.entry(identity) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(state);
                true
            }
        }
    }

    /// Returns the state of a device.
    #[must_use]
    pub fn get(&self, identity: &DeviceIdentity) -> Option<&DeviceState> {
        self.devices.get(identity)
    }

    /// Returns the state of a device mutably.
    pub fn get_mut(&mut self, identity: &DeviceIdentity) -> Option<&mut DeviceState> {
        self.devices.get_mut(identity)
    }

    /// Returns `true` if the device is monitored.
    #[must_use]
    pub fn is_monitored(&self, identity: &DeviceIdentity) -> bool {
        self.devices.contains_key(identity)
    }

    /// Returns the number of monitored devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if no device is monitored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterates over the monitored devices in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceIdentity, &DeviceState)> {
        self.devices.iter()
    }

    /// Routes a frame to the state of the device that sent it.
    pub fn track(&mut self, decoder: &Decoder, frame: &ByteFrame, timestamp: i64) -> TrackOutcome {
        let identity = decoder.identity(frame);
        match self.devices.get_mut(&identity) {
            Some(state) => TrackOutcome::Applied(state.apply(decoder, frame, timestamp)),
            None => TrackOutcome::Unmonitored(identity),
        }
    }

    /// Clears the dirty flag of a device after its change was published.
    /// Returns `false` if the device is not monitored.
    pub fn acknowledge(&mut self, identity: &DeviceIdentity) -> bool {
        self.devices.get_mut(identity).map(DeviceState::clear_dirty).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FamilyServices, SensorConfig};
    use crate::types::{Family, names};

    fn config() -> DriverConfig {
        DriverConfig::new()
            .with_sensor(SensorConfig::new("k01".parse().unwrap(), "garden"))
            .with_sensor(SensorConfig::new("e0a0b".parse().unwrap(), "house"))
    }

    #[test]
    fn from_config_creates_one_state_per_sensor() {
        let tracker = StateTracker::from_config(&config(), &ServiceTable::default());
        assert_eq!(tracker.len(), 2);
        assert!(tracker.is_monitored(&"k01".parse().unwrap()));
        assert!(tracker.is_monitored(&"E0A0B".parse().unwrap()));
    }

    #[test]
    fn sensors_without_services_are_skipped() {
        let services = ServiceTable::empty().with_family(
            Family::WeatherStation,
            FamilyServices::new().with_service(names::TEMPERATURE, "temperature"),
        );
        let tracker = StateTracker::from_config(&config(), &services);
        assert_eq!(tracker.len(), 1);
        assert!(!tracker.is_monitored(&"e0a0b".parse().unwrap()));
    }

    #[test]
    fn duplicate_identities_keep_the_first_sensor() {
        let config = config().with_sensor(SensorConfig::new("K01".parse().unwrap(), "other"));
        let tracker = StateTracker::from_config(&config, &ServiceTable::default());
        assert_eq!(tracker.len(), 2);
        let state = tracker.get(&"k01".parse().unwrap()).unwrap();
        assert_eq!(state.config().feed_id, "garden");
    }

    #[test]
    fn track_routes_by_identity() {
        let mut tracker = StateTracker::from_config(&config(), &ServiceTable::default());
        let decoder = Decoder::for_family(Family::WeatherStation);

        let outcome = tracker.track(&decoder, &ByteFrame::parse("K01230145").unwrap(), 0);
        assert!(matches!(outcome, TrackOutcome::Applied(ApplyOutcome::Changed(_))));

        let outcome = tracker.track(&decoder, &ByteFrame::parse("K02230145").unwrap(), 0);
        assert_eq!(outcome, TrackOutcome::Unmonitored("k02".parse().unwrap()));
    }

    #[test]
    fn acknowledge_clears_dirty_flag() {
        let mut tracker = StateTracker::from_config(&config(), &ServiceTable::default());
        let decoder = Decoder::for_family(Family::WeatherStation);
        let id: DeviceIdentity = "k01".parse().unwrap();

        tracker.track(&decoder, &ByteFrame::parse("K01230145").unwrap(), 0);
        assert!(tracker.get(&id).unwrap().is_dirty());

        assert!(tracker.acknowledge(&id));
        assert!(!tracker.get(&id).unwrap().is_dirty());
        assert!(!tracker.acknowledge(&"k09".parse().unwrap()));
    }

    #[test]
    fn unbound_states_are_not_inserted() {
        let mut tracker = StateTracker::new();
        let state = DeviceState::unbound(
            SensorConfig::new("f0102".parse().unwrap(), "hall"),
            FamilyServices::new(),
        );
        assert!(!tracker.insert(state));
        assert!(tracker.is_empty());
    }
}
