// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `fs20_lib` - Decode FS20/FHT radio sensor traffic from a CUL gateway.
//!
//! A CUL USB stick relays the 868 MHz radio messages it overhears as
//! text lines: a header letter naming the device family followed by hex
//! pairs. This library turns those lines into per-device state and emits a
//! change event whenever a published reading of a monitored sensor changes.
//!
//! # Supported Device Families
//!
//! - **`T` Thermostat**: FHT80b room controllers and FHT8v valve actuators
//! - **`E` Energy meter**: EM1000 pulse counters
//! - **`K` Weather station**: KS300 and ASH2200 temperature/humidity sensors
//! - **`F` Motion sensor**: PIRI brightness reports
//!
//! # Pipeline
//!
//! 1. [`ByteFrame`] decodes a line into header and payload bytes.
//! 2. [`DecoderRegistry`] selects the family [`Decoder`] by header.
//! 3. [`StateTracker`] merges the decoded readings into the sending
//!    device's [`DeviceState`].
//! 4. If the published projection changed, the [`Driver`] hands one
//!    [`ChangeEvent`] to its [`EventSink`].
//!
//! # Quick Start
//!
//! ```no_run
//! use fs20_lib::config::{DriverConfig, ServiceTable};
//! use fs20_lib::driver::Driver;
//! use fs20_lib::event::EventBus;
//! use tokio::io::AsyncBufRead;
//!
//! // `port` is the opened serial device, wrapped in a buffered reader.
//! async fn ingest(port: impl AsyncBufRead + Unpin) -> fs20_lib::Result<()> {
//!     let config = DriverConfig::from_file("fs20.json")?;
//!     let bus = EventBus::new();
//!     let mut changes = bus.subscribe();
//!
//!     tokio::spawn(async move {
//!         while let Ok(event) = changes.recv().await {
//!             println!("{}: {}", event.feed_id, serde_json::to_string(&event).unwrap_or_default());
//!         }
//!     });
//!
//!     let mut driver = Driver::new(&config, &ServiceTable::default(), bus);
//!     driver.run(port).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library logs through [`tracing`] and never installs a subscriber.

pub mod config;
pub mod decoder;
pub mod driver;
pub mod error;
pub mod event;
pub mod frame;
pub mod state;
pub mod types;

pub use config::{DriverConfig, FamilyServices, SensorConfig, ServiceTable};
pub use decoder::{Decoder, DecoderRegistry, DeviceDecoder};
pub use driver::{Disposition, Driver};
pub use error::{ConfigError, Error, FrameError, Result, ValueError};
pub use event::{ChangeEvent, EventBus, EventSink};
pub use frame::ByteFrame;
pub use state::{DeviceState, StateTracker};
pub use types::{DeviceIdentity, Family, ReadingValue, Readings};
