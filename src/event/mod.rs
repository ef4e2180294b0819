// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change events and the sinks that receive them.
//!
//! The driver hands each [`ChangeEvent`] to an [`EventSink`] exactly once.
//! Delivery, retries and batching are the sink's business. Two sinks are
//! provided: `Vec<ChangeEvent>` collects events in memory and
//! [`EventBus`] broadcasts them over a tokio channel.
//!
//! # Examples
//!
//! ```
//! use fs20_lib::event::{ChangeEvent, EventSink};
//! use fs20_lib::types::Readings;
//!
//! let mut sink: Vec<ChangeEvent> = Vec::new();
//! let event = ChangeEvent::new("garden", "k01".parse().unwrap(), Readings::new(), 0);
//! sink.publish("garden", &event);
//! assert_eq!(sink.len(), 1);
//! ```

mod change_event;
mod event_bus;

pub use change_event::ChangeEvent;
pub use event_bus::EventBus;

/// Receiver of change events.
pub trait EventSink {
    /// Publishes one change for the sensor routed to `feed_id`.
    fn publish(&mut self, feed_id: &str, event: &ChangeEvent);
}

impl EventSink for Vec<ChangeEvent> {
    fn publish(&mut self, _feed_id: &str, event: &ChangeEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, feed_id: &str, event: &ChangeEvent) {
        (**self).publish(feed_id, event);
    }
}
