// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device state tracking.

use crate::config::{FamilyServices, SensorConfig};
use crate::decoder::{Decoder, DeviceDecoder};
use crate::event::ChangeEvent;
use crate::frame::ByteFrame;
use crate::types::{DeviceIdentity, Readings};

/// Result of applying a frame to a [`DeviceState`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The frame came from a different device; nothing was changed.
    WrongDevice,
    /// Values were merged but the published projection is unchanged.
    Unchanged,
    /// The published projection changed.
    Changed(ChangeEvent),
}

impl ApplyOutcome {
    /// Returns `true` if the frame belonged to the device.
    #[must_use]
    pub fn is_match(&self) -> bool {
        !matches!(self, Self::WrongDevice)
    }

    /// Returns `true` if the projection changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    /// Returns the change event, if any.
    #[must_use]
    pub fn into_event(self) -> Option<ChangeEvent> {
        match self {
            Self::Changed(event) => Some(event),
            Self::WrongDevice | Self::Unchanged => None,
        }
    }
}

/// Tracked state of one physical device.
///
/// Values persist across frames, so readings carried by different
/// messages (such as the two halves of a thermostat temperature) accumulate.
/// The identity, once bound, is authoritative: frames from any other device
/// are refused without touching the state.
///
/// # Examples
///
/// ```
/// use fs20_lib::config::{FamilyServices, SensorConfig};
/// use fs20_lib::decoder::Decoder;
/// use fs20_lib::frame::ByteFrame;
/// use fs20_lib::state::{ApplyOutcome, DeviceState};
/// use fs20_lib::types::{Family, names};
///
/// let config = SensorConfig::new("k00".parse().unwrap(), "garden");
/// let services = FamilyServices::new().with_service(names::TEMPERATURE, "temp");
/// let mut state = DeviceState::new(config, services);
///
/// let decoder = Decoder::for_family(Family::WeatherStation);
/// let frame = ByteFrame::parse("K00230145").unwrap();
///
/// let outcome = state.apply(&decoder, &frame, 0);
/// assert!(outcome.is_changed());
/// assert!(state.is_dirty());
///
/// // Same frame again: nothing new to publish.
/// assert_eq!(state.apply(&decoder, &frame, 1), ApplyOutcome::Unchanged);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    identity: Option<DeviceIdentity>,
    config: SensorConfig,
    services: FamilyServices,
    values: Readings,
    dirty: bool,
}

impl DeviceState {
    /// Creates the state of a configured sensor, bound to its configured
    /// identity.
    #[must_use]
    pub fn new(config: SensorConfig, services: FamilyServices) -> Self {
        Self {
            identity: Some(config.id.clone()),
            ..Self::unbound(config, services)
        }
    }

    /// Creates a state that binds to the first device applied to it.
    #[must_use]
    pub fn unbound(config: SensorConfig, services: FamilyServices) -> Self {
        Self {
            identity: None,
            config,
            services,
            values: Readings::new(),
            dirty: false,
        }
    }

    /// Returns the bound identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    /// Returns the sensor configuration.
    #[must_use]
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Returns all last-known values, published or not.
    #[must_use]
    pub fn values(&self) -> &Readings {
        &self.values
    }

    /// Returns `true` if the projection changed since the last
    /// [`clear_dirty`](Self::clear_dirty).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledges a publish.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Returns the published projection of the current values.
    #[must_use]
    pub fn projection(&self) -> Readings {
        self.services.project(&self.values)
    }

    /// Applies a frame decoded by `decoder`.
    ///
    /// Returns [`ApplyOutcome::WrongDevice`] without mutation if the state is
    /// bound to a different identity. Otherwise binds the identity, merges
    /// the decoded readings and compares the projection before and after.
    pub fn apply(&mut self, decoder: &Decoder, frame: &ByteFrame, timestamp: i64) -> ApplyOutcome {
        let derived = decoder.identity(frame);
        if let Some(bound) = &self.identity
            && *bound != derived
        {
            return ApplyOutcome::WrongDevice;
        }

        let before = self.projection();
        let readings = DeviceDecoder::decode(decoder, frame, &self.values);
        self.values.merge(readings);
        let after = self.projection();
        let identity = self.identity.get_or_insert(derived).clone();

        if before == after {
            return ApplyOutcome::Unchanged;
        }

        self.dirty = true;
        ApplyOutcome::Changed(ChangeEvent::new(
            self.config.feed_id.clone(),
            identity,
            after,
            timestamp,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceTable;
    use crate::types::{Family, names};

    fn weather_state(id: &str) -> DeviceState {
        let services = ServiceTable::default()
            .get(Family::WeatherStation)
            .cloned()
            .unwrap();
        DeviceState::new(SensorConfig::new(id.parse().unwrap(), "garden"), services)
    }

    fn weather() -> Decoder {
        Decoder::for_family(Family::WeatherStation)
    }

    #[test]
    fn first_change_is_reported() {
        let mut state = weather_state("k01");
        let frame = ByteFrame::parse("K01230145").unwrap();

        let event = state.apply(&weather(), &frame, 42).into_event().unwrap();
        assert_eq!(event.feed_id, "garden");
        assert_eq!(event.device.as_str(), "k01");
        assert_eq!(event.timestamp, 42);
        assert_eq!(event.projection.number(names::TEMPERATURE), Some(12.3));
        assert_eq!(event.projection.number(names::HUMIDITY), Some(45.0));
        assert!(state.is_dirty());
    }

    #[test]
    fn identical_frame_is_idempotent() {
        let mut state = weather_state("k01");
        let frame = ByteFrame::parse("K01230145").unwrap();

        assert!(state.apply(&weather(), &frame, 0).is_changed());
        state.clear_dirty();

        assert_eq!(state.apply(&weather(), &frame, 1), ApplyOutcome::Unchanged);
        assert!(!state.is_dirty());
    }

    #[test]
    fn smallest_change_is_reported() {
        let mut state = weather_state("k01");
        state.apply(&weather(), &ByteFrame::parse("K01230145").unwrap(), 0);
        let outcome = state.apply(&weather(), &ByteFrame::parse("K01240145").unwrap(), 1);
        let event = outcome.into_event().unwrap();
        assert_eq!(event.projection.number(names::TEMPERATURE), Some(12.4));
    }

    #[test]
    fn wrong_device_leaves_state_untouched() {
        let mut state = weather_state("k01");
        state.apply(&weather(), &ByteFrame::parse("K01230145").unwrap(), 0);
        state.clear_dirty();
        let before = state.clone();

        let outcome = state.apply(&weather(), &ByteFrame::parse("K02990199").unwrap(), 1);

        assert_eq!(outcome, ApplyOutcome::WrongDevice);
        assert!(!outcome.is_match());
        assert_eq!(state, before);
    }

    #[test]
    fn identity_comparison_ignores_case() {
        let mut state = weather_state("K01");
        let outcome = state.apply(&weather(), &ByteFrame::parse("K01230145").unwrap(), 0);
        assert!(outcome.is_match());
    }

    #[test]
    fn unbound_state_binds_on_first_apply() {
        let services = FamilyServices::new().with_service(names::BRIGHTNESS, "lux");
        let config = SensorConfig::new("f0102".parse().unwrap(), "hall");
        let mut state = DeviceState::unbound(config, services);
        let decoder = Decoder::for_family(Family::MotionSensor);

        let outcome = state.apply(&decoder, &ByteFrame::parse("F0a0b00000010").unwrap(), 0);
        assert!(outcome.is_changed());
        assert_eq!(state.identity().map(DeviceIdentity::as_str), Some("f0a0b"));

        let other = state.apply(&decoder, &ByteFrame::parse("F0c0d00000010").unwrap(), 1);
        assert_eq!(other, ApplyOutcome::WrongDevice);
    }

    #[test]
    fn unpublished_readings_do_not_count_as_changes() {
        let services = FamilyServices::new().with_service(names::TEMPERATURE, "temperature");
        let config = SensorConfig::new("t1a2b".parse().unwrap(), "lounge");
        let mut state = DeviceState::new(config, services);
        let decoder = Decoder::for_family(Family::Thermostat);

        let low = state.apply(&decoder, &ByteFrame::parse("T1a2b420020").unwrap(), 0);
        assert_eq!(low, ApplyOutcome::Unchanged);
        assert_eq!(state.values().number(names::LOW_TEMP), Some(32.0));

        let high = state.apply(&decoder, &ByteFrame::parse("T1a2b430001").unwrap(), 1);
        let event = high.into_event().unwrap();
        assert_eq!(event.projection.number("temperature"), Some(28.8));
    }
}
