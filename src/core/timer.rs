//! # Cancellable one-shot timers tracked by the controller.
//!
//! A [`TimerSlot`] holds **at most one** armed timer of its [`TimerKind`]. Arming
//! always cancels the previous timer first. A firing is delivered to the
//! controller as [`TimerFired`] over an unbounded channel.
//!
//! ## Stale firings
//! Aborting a sleeping task cannot recall a message already queued. Every arm gets
//! a fresh id and [`TimerSlot::take_fired`] only accepts the id that is currently
//! armed, so a firing that raced a cancel is ignored.
//!
//! ```text
//! arm(d) ─► cancel() ─► id += 1 ─► spawn { sleep(d); tx.send(TimerFired{kind,id}) }
//! recv(TimerFired{id}) ─► take_fired(id) ─► true only if id == armed id
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

/// Which slot a firing belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerKind {
    /// Next scheduled probe (also used for the startup grace probe).
    Poll,
    /// Network notification settle window.
    Debounce,
}

/// Message sent when a timer elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TimerFired {
    pub kind: TimerKind,
    pub id: u64,
}

struct Armed {
    id: u64,
    join: JoinHandle<()>,
}

/// Single optional timer handle of one kind.
pub(crate) struct TimerSlot {
    kind: TimerKind,
    tx: mpsc::UnboundedSender<TimerFired>,
    next_id: u64,
    armed: Option<Armed>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind, tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            kind,
            tx,
            next_id: 0,
            armed: None,
        }
    }

    /// Cancels any armed timer and arms a new one. Returns its id.
    pub fn arm(&mut self, delay: Duration) -> u64 {
        self.cancel();

        self.next_id += 1;
        let id = self.next_id;
        let kind = self.kind;
        let tx = self.tx.clone();

        let join = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(TimerFired { kind, id });
        });
        self.armed = Some(Armed { id, join });
        id
    }

    /// Cancels the armed timer. No-op if none is armed or it already fired.
    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.join.abort();
        }
    }

    /// Accepts a firing if it belongs to the armed timer, disarming the slot.
    pub fn take_fired(&mut self, id: u64) -> bool {
        match &self.armed {
            Some(armed) if armed.id == id => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
