// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line ingestion and change publishing.
//!
//! The [`Driver`] is the single entry point for gateway output. Every line
//! goes through the same pipeline: hex decoding, decoder selection by
//! header, state update of the sending device, and, when the published
//! projection changed, exactly one call to the [`EventSink`].
//!
//! Nothing in the pipeline fails loudly. Malformed lines, foreign device
//! families and unmonitored devices are reported through the returned
//! [`Disposition`] and a log line, and the driver carries on.
//!
//! # Examples
//!
//! ```
//! use fs20_lib::config::{DriverConfig, SensorConfig, ServiceTable};
//! use fs20_lib::driver::{Disposition, Driver};
//! use fs20_lib::event::ChangeEvent;
//!
//! let config = DriverConfig::new()
//!     .with_sensor(SensorConfig::new("k01".parse().unwrap(), "garden"));
//! let mut driver = Driver::new(&config, &ServiceTable::default(), Vec::<ChangeEvent>::new());
//!
//! assert!(matches!(driver.receive("K01230145\r\n"), Disposition::Published(_)));
//! assert!(matches!(driver.receive("K01230145\r\n"), Disposition::Unchanged(_)));
//! assert!(matches!(driver.receive("K02230145\r\n"), Disposition::Unmonitored(_)));
//!
//! let events = driver.into_sink();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].feed_id, "garden");
//! ```

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::{DriverConfig, ServiceTable};
use crate::decoder::{DecoderRegistry, DeviceDecoder};
use crate::error::{FrameError, Result};
use crate::event::EventSink;
use crate::frame::ByteFrame;
use crate::state::{ApplyOutcome, StateTracker, TrackOutcome};
use crate::types::DeviceIdentity;

/// What happened to one received line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The line is not a valid frame.
    NotLoaded(FrameError),
    /// No decoder handles the frame's header.
    UnknownHeader(char),
    /// The sending device is not monitored.
    Unmonitored(DeviceIdentity),
    /// The frame did not belong to the state it was routed to.
    WrongDevice(DeviceIdentity),
    /// The device state was updated but nothing published changed.
    Unchanged(DeviceIdentity),
    /// A change event was handed to the sink.
    Published(DeviceIdentity),
}

impl Disposition {
    /// Returns `true` if a change event was published.
    #[must_use]
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }

    /// Returns the identity of the sending device, if the line got that far.
    #[must_use]
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        match self {
            Self::NotLoaded(_) | Self::UnknownHeader(_) => None,
            Self::Unmonitored(id)
            | Self::WrongDevice(id)
            | Self::Unchanged(id)
            | Self::Published(id) => Some(id),
        }
    }
}

/// Turns gateway lines into change events for the monitored sensors.
#[derive(Debug)]
pub struct Driver<S> {
    registry: DecoderRegistry,
    tracker: StateTracker,
    sink: S,
}

impl<S: EventSink> Driver<S> {
    /// Creates a driver monitoring the sensors in `config`.
    #[must_use]
    pub fn new(config: &DriverConfig, services: &ServiceTable, sink: S) -> Self {
        Self::with_parts(DecoderRegistry::new(), StateTracker::from_config(config, services), sink)
    }

    /// Creates a driver from prepared components.
    #[must_use]
    pub fn with_parts(registry: DecoderRegistry, tracker: StateTracker, sink: S) -> Self {
        Self {
            registry,
            tracker,
            sink,
        }
    }

    /// Processes one text line, stamped with the current time.
    pub fn receive(&mut self, line: &str) -> Disposition {
        self.receive_at(line, Utc::now().timestamp_millis())
    }

    /// Processes one text line with an explicit capture time in
    /// milliseconds since the Unix epoch.
    pub fn receive_at(&mut self, line: &str, timestamp: i64) -> Disposition {
        match ByteFrame::parse(line) {
            Ok(frame) => self.process(&frame, timestamp),
            Err(error) => Self::not_loaded(error),
        }
    }

    /// Processes one raw line as read from the serial port.
    pub fn receive_bytes(&mut self, line: &[u8]) -> Disposition {
        match ByteFrame::from_bytes(line) {
            Ok(frame) => self.process(&frame, Utc::now().timestamp_millis()),
            Err(error) => Self::not_loaded(error),
        }
    }

    /// Reads lines from `reader` until end of stream.
    ///
    /// Returns the number of lines read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if reading fails. Lines that
    /// cannot be processed never end the loop.
    pub async fn run<R>(&mut self, mut reader: R) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = Vec::new();
        let mut count = 0;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            count += 1;
            self.receive_bytes(&line);
        }
        tracing::debug!(lines = count, "Line stream ended");
        Ok(count)
    }

    /// Returns the device states.
    #[must_use]
    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    /// Returns the event sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the event sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the driver, returning the event sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn not_loaded(error: FrameError) -> Disposition {
        tracing::debug!(%error, "Dropping line");
        Disposition::NotLoaded(error)
    }

    fn process(&mut self, frame: &ByteFrame, timestamp: i64) -> Disposition {
        let Some(decoder) = self.registry.select(frame.header()) else {
            tracing::trace!(header = %frame.header(), "No decoder for header");
            return Disposition::UnknownHeader(frame.header());
        };

        let identity = match self.tracker.track(&decoder, frame, timestamp) {
            TrackOutcome::Unmonitored(identity) => {
                tracing::debug!(device = %identity, "Ignoring unmonitored device");
                return Disposition::Unmonitored(identity);
            }
            TrackOutcome::Applied(ApplyOutcome::WrongDevice) => {
                let identity = decoder.identity(frame);
                tracing::debug!(device = %identity, "Frame does not belong to tracked state");
                return Disposition::WrongDevice(identity);
            }
            TrackOutcome::Applied(ApplyOutcome::Unchanged) => {
                let identity = decoder.identity(frame);
                tracing::trace!(device = %identity, "Projection unchanged");
                return Disposition::Unchanged(identity);
            }
            TrackOutcome::Applied(ApplyOutcome::Changed(event)) => {
                tracing::debug!(device = %event.device, "{}", decoder.describe(frame));
                tracing::info!(device = %event.device, feed = %event.feed_id, "Publishing change");
                self.sink.publish(&event.feed_id, &event);
                event.device
            }
        };

        self.tracker.acknowledge(&identity);
        Disposition::Published(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorConfig;
    use crate::event::ChangeEvent;

    fn driver() -> Driver<Vec<ChangeEvent>> {
        let config = DriverConfig::new()
            .with_sensor(SensorConfig::new("k01".parse().unwrap(), "garden"));
        Driver::new(&config, &ServiceTable::default(), Vec::new())
    }

    #[test]
    fn malformed_lines_are_not_loaded() {
        let mut driver = driver();
        assert_eq!(driver.receive("\r\n"), Disposition::NotLoaded(FrameError::Empty));
        assert_eq!(
            driver.receive("K0123014"),
            Disposition::NotLoaded(FrameError::OddLength { digits: 7 })
        );
        assert!(matches!(
            driver.receive("K01zz"),
            Disposition::NotLoaded(FrameError::InvalidHexDigit { .. })
        ));
        assert!(driver.sink().is_empty());
    }

    #[test]
    fn unknown_header_is_ignored() {
        let mut driver = driver();
        assert_eq!(driver.receive("X0102"), Disposition::UnknownHeader('X'));
        assert_eq!(driver.receive("k01230145"), Disposition::UnknownHeader('k'));
    }

    #[test]
    fn published_change_clears_dirty_flag() {
        let mut driver = driver();
        let disposition = driver.receive_at("K01230145", 7);
        assert!(disposition.is_published());

        let id = disposition.identity().unwrap();
        assert!(!driver.tracker().get(id).unwrap().is_dirty());
        assert_eq!(driver.sink()[0].timestamp, 7);
    }

    #[test]
    fn raw_bytes_are_accepted() {
        let mut driver = driver();
        assert!(driver.receive_bytes(b"K01230145\r\n").is_published());
        assert_eq!(
            driver.receive_bytes(b"K01230145\r\n"),
            Disposition::Unchanged("k01".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn run_reads_until_end_of_stream() {
        let mut driver = driver();
        let input: &[u8] = b"K01230145\r\n\r\nX00\r\nK01240145\r\n";
        let lines = driver.run(input).await.unwrap();
        assert_eq!(lines, 4);
        assert_eq!(driver.sink().len(), 2);
    }
}
