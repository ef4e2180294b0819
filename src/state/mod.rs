// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! A [`DeviceState`] holds the last-known values of one device and detects
//! when the published projection of those values changes. The
//! [`StateTracker`] owns the states of all monitored devices and routes
//! each frame to the right one.
//!
//! # Examples
//!
//! ```
//! use fs20_lib::config::{DriverConfig, SensorConfig, ServiceTable};
//! use fs20_lib::decoder::DecoderRegistry;
//! use fs20_lib::frame::ByteFrame;
//! use fs20_lib::state::{StateTracker, TrackOutcome};
//!
//! let config = DriverConfig::new()
//!     .with_sensor(SensorConfig::new("k01".parse().unwrap(), "garden"));
//! let mut tracker = StateTracker::from_config(&config, &ServiceTable::default());
//!
//! let frame = ByteFrame::parse("K01230145").unwrap();
//! let decoder = DecoderRegistry::new().select(frame.header()).unwrap();
//!
//! match tracker.track(&decoder, &frame, 0) {
//!     TrackOutcome::Applied(outcome) => assert!(outcome.is_changed()),
//!     TrackOutcome::Unmonitored(id) => panic!("{id} should be monitored"),
//! }
//! ```

mod device_state;
mod tracker;

pub use device_state::{ApplyOutcome, DeviceState};
pub use tracker::{StateTracker, TrackOutcome};
