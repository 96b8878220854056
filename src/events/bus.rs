//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from multiple sources (controller, probe task,
//! per-channel apply tasks, subscriber workers).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Subscribers:
//!   Controller ──┐
//!   Probe task ──┼──────► Bus ──┬──► listener ────► SubscriberSet
//!   Apply tasks ─┘              └──► Controller::subscribe() (tests, embedders)
//! ```
//!
//! Publishing never waits. Receivers that fall more than `capacity` events
//! behind see `RecvError::Lagged` and resume from the oldest retained event;
//! nothing is kept for receivers that do not exist yet.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel shared by every publisher; clones share one ring buffer.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Sends `ev` to current receivers, dropping it if there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Receiver for events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::ProbeStarting));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::RecheckTriggered));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::RecheckTriggered);
    }
}
