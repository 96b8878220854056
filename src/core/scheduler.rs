//! # Backoff scheduler: stored delay plus the single poll timer.
//!
//! ```text
//! schedule(reachable)
//!   ├─► delay  = Backoff::next_delay(reachable)   (stored)
//!   ├─► jitter = Backoff::jitter()                (this wait only)
//!   └─► poll slot: cancel + arm(delay + jitter)
//! ```

use std::time::Duration;

use crate::core::timer::TimerSlot;
use crate::policies::{Backoff, BackoffPolicy};

/// What was armed by [`Scheduler::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Scheduled {
    pub delay: Duration,
    pub jitter: Duration,
}

pub(crate) struct Scheduler {
    backoff: Backoff,
    slot: TimerSlot,
}

impl Scheduler {
    pub fn new(policy: BackoffPolicy, slot: TimerSlot) -> Self {
        Self {
            backoff: Backoff::new(policy),
            slot,
        }
    }

    /// Arms the one-shot startup probe.
    pub fn arm_startup(&mut self, grace: Duration) {
        self.slot.arm(grace);
    }

    /// Updates the stored delay from the outcome and arms the next probe.
    pub fn schedule(&mut self, was_reachable: bool) -> Scheduled {
        let delay = self.backoff.next_delay(was_reachable);
        let jitter = self.backoff.jitter();
        self.slot.arm(delay.saturating_add(jitter));
        Scheduled { delay, jitter }
    }

    /// Resets backoff to the floor and drops the pending probe.
    pub fn reset(&mut self) {
        self.backoff.reset();
        self.slot.cancel();
    }

    /// Accepts a poll firing if it is the armed one.
    pub fn take_fired(&mut self, id: u64) -> bool {
        self.slot.take_fired(id)
    }

    #[inline]
    pub fn current(&self) -> Duration {
        self.backoff.current()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use tokio::time;

    use super::*;
    use crate::core::timer::TimerKind;
    use crate::policies::JitterPolicy;

    fn scheduler() -> (Scheduler, mpsc::UnboundedReceiver<crate::core::timer::TimerFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let policy = BackoffPolicy {
            min: Duration::from_millis(1_000),
            max: Duration::from_millis(4_000),
            factor: 2.0,
            jitter: JitterPolicy::None,
        };
        (Scheduler::new(policy, TimerSlot::new(TimerKind::Poll, tx)), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_arms_single_timer() {
        let (mut s, mut rx) = scheduler();

        assert_eq!(s.schedule(false).delay, Duration::from_millis(2_000));
        assert_eq!(s.schedule(false).delay, Duration::from_millis(4_000));

        let start = time::Instant::now();
        let fired = rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(4_000));
        assert!(s.take_fired(fired.id));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_and_restores_floor() {
        let (mut s, mut rx) = scheduler();
        s.schedule(false);
        s.schedule(false);
        s.reset();
        assert_eq!(s.current(), Duration::from_millis(1_000));

        time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
