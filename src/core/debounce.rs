//! # Network notification debouncer.
//!
//! Every [`NetworkEvent`] re-arms the debounce slot. Only the firing of the last
//! armed timer is accepted, so a burst of transitions collapses into one recheck
//! `window` after the final event.

use std::fmt;
use std::time::Duration;

use crate::core::timer::TimerSlot;

/// Connectivity transition reported by the embedding system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkEvent {
    Connected,
    Disconnected,
}

impl NetworkEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkEvent::Connected => "connected",
            NetworkEvent::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for NetworkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) struct Debouncer {
    window: Duration,
    slot: TimerSlot,
}

impl Debouncer {
    pub fn new(window: Duration, slot: TimerSlot) -> Self {
        Self { window, slot }
    }

    /// Restarts the settle window.
    pub fn notify(&mut self) {
        self.slot.arm(self.window);
    }

    /// True if `id` is the firing of the latest window.
    pub fn settled(&mut self, id: u64) -> bool {
        self.slot.take_fired(id)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use tokio::time;

    use super::*;
    use crate::core::timer::TimerKind;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one_firing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = Debouncer::new(
            Duration::from_millis(1_000),
            TimerSlot::new(TimerKind::Debounce, tx),
        );

        for _ in 0..5 {
            d.notify();
            time::sleep(Duration::from_millis(200)).await;
        }
        let last = time::Instant::now() - Duration::from_millis(200);

        let fired = rx.recv().await.unwrap();
        assert_eq!(time::Instant::now() - last, Duration::from_millis(1_000));
        assert!(d.settled(fired.id));

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
