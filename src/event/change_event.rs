// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change event type.

use chrono::{DateTime, Utc};

use crate::types::{DeviceIdentity, Readings};

/// A detected change in a device's published projection.
///
/// Serialises to the projection fields plus a `timestamp` in milliseconds
/// since the Unix epoch. The routing fields are not serialised.
///
/// # Examples
///
/// ```
/// use fs20_lib::event::ChangeEvent;
/// use fs20_lib::types::Readings;
///
/// let mut projection = Readings::new();
/// projection.set("temperature", 12.3);
///
/// let event = ChangeEvent::new("garden", "k01".parse().unwrap(), projection, 1_700_000_000_000);
/// assert_eq!(
///     serde_json::to_value(&event).unwrap(),
///     serde_json::json!({ "temperature": 12.3, "timestamp": 1_700_000_000_000_i64 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChangeEvent {
    /// Routing target from the sensor configuration.
    #[serde(skip)]
    pub feed_id: String,
    /// Device whose state changed.
    #[serde(skip)]
    pub device: DeviceIdentity,
    /// Published projection after the change.
    #[serde(flatten)]
    pub projection: Readings,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChangeEvent {
    /// Creates a change event.
    #[must_use]
    pub fn new(
        feed_id: impl Into<String>,
        device: DeviceIdentity,
        projection: Readings,
        timestamp: i64,
    ) -> Self {
        Self {
            feed_id: feed_id.into(),
            device,
            projection,
            timestamp,
        }
    }

    /// Returns the capture time, or `None` if the timestamp is out of range.
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
