// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast sink for change events.

use tokio::sync::broadcast;

use super::{ChangeEvent, EventSink};

/// Events buffered per subscriber before the oldest are overwritten.
const DEFAULT_CAPACITY: usize = 256;

/// Fans change events out to any number of async consumers.
///
/// The driver loop runs synchronously, so publishing never waits for a
/// consumer. A subscriber that falls more than the bus capacity behind
/// loses the oldest events and sees `RecvError::Lagged` on its next
/// receive. Publishing with no subscriber drops the event.
///
/// Cloning the bus yields another handle on the same channel, which lets
/// the owner of the driver subscribe new consumers after the bus has been
/// moved into it.
///
/// # Examples
///
/// ```
/// use fs20_lib::event::{ChangeEvent, EventBus, EventSink};
/// use fs20_lib::types::Readings;
///
/// let mut bus = EventBus::new();
/// let mut weather = bus.subscribe();
///
/// let event = ChangeEvent::new("garden", "k01".parse().unwrap(), Readings::new(), 0);
/// bus.publish("garden", &event);
///
/// assert_eq!(weather.try_recv().unwrap().device.as_str(), "k01");
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to 256 events per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sender: broadcast::Sender::new(capacity),
        }
    }

    /// Returns a receiver for the events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Broadcasts `event`, returning how many receivers got it.
    pub fn send(&self, event: ChangeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn publish(&mut self, feed_id: &str, event: &ChangeEvent) {
        let receivers = self.send(event.clone());
        if receivers == 0 {
            tracing::trace!(feed = %feed_id, device = %event.device, "No subscriber for change event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Readings;

    fn event(feed_id: &str, device: &str) -> ChangeEvent {
        ChangeEvent::new(feed_id, device.parse().unwrap(), Readings::new(), 0)
    }

    #[test]
    fn subscriber_count_follows_receivers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn send_without_subscribers_drops_event() {
        let bus = EventBus::new();
        assert_eq!(bus.send(event("garden", "k01")), 0);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event_in_order() {
        let mut bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish("garden", &event("garden", "k01"));
        bus.publish("hall", &event("hall", "f0a0b"));

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await.unwrap().feed_id, "garden");
            assert_eq!(rx.recv().await.unwrap().feed_id, "hall");
        }
    }

    #[test]
    fn slow_subscriber_lags() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();
        for device in ["k01", "k02", "k03"] {
            bus.send(event("garden", device));
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(1))
        ));
        assert_eq!(rx.try_recv().unwrap().device.as_str(), "k02");
    }

    #[test]
    fn clones_share_the_channel() {
        let bus = EventBus::with_capacity(8);
        let handle = bus.clone();
        let mut rx = handle.subscribe();

        assert_eq!(bus.send(event("garden", "k01")), 1);
        assert!(rx.try_recv().is_ok());
    }
}
