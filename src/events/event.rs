//! # Runtime events emitted by the controller, probe and apply tasks.
//!
//! The [`EventKind`] enum classifies event types across four groups:
//! - **Probe events**: reachability checks and their outcome
//! - **Apply events**: per-channel mode writes and output enforcement
//! - **Scheduling events**: backoff, network notifications, rechecks
//! - **Subscriber events**: overflow/panic inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, channel,
//! mode, reasons and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Per-channel apply tasks run concurrently, so events of different channels may
//! interleave; `seq` restores the publication order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use hubwatch::{ChannelId, Event, EventKind, Mode};
//!
//! let ev = Event::new(EventKind::ChannelModeWritten)
//!     .with_channel(ChannelId(1))
//!     .with_mode(Mode::Detached);
//!
//! assert_eq!(ev.kind, EventKind::ChannelModeWritten);
//! assert_eq!(ev.channel, Some(ChannelId(1)));
//! assert_eq!(ev.mode, Some(Mode::Detached));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::channels::{ChannelId, Mode};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Controller lifecycle ===
    /// Controller loop started and armed the startup probe.
    ///
    /// Sets:
    /// - `delay_ms`: startup grace delay
    ControllerStarted,

    /// Controller loop exited (cancellation token fired).
    ControllerStopped,

    // === Probe events ===
    /// A probe cycle is starting.
    ///
    /// Sets:
    /// - `cycle`: probe cycle number (1-based, monotonic)
    ProbeStarting,

    /// One probe attempt failed; a retry may follow.
    ///
    /// Sets:
    /// - `cycle`: probe cycle number
    /// - `attempt`: attempt within the cycle (1 or 2)
    /// - `reason`: failure message
    ProbeAttemptFailed,

    /// A probe cycle finished.
    ///
    /// Sets:
    /// - `cycle`: probe cycle number
    /// - `reachable`: outcome
    /// - `attempt`: number of transport attempts used
    /// - `reason`: `"superseded"` when a newer cycle has started
    ProbeCompleted,

    /// Classification flipped (or was established for the first time).
    ///
    /// Sets:
    /// - `reachable`: new classification
    HubStateChanged,

    // === Apply events ===
    /// Apply was issued for all channels.
    ///
    /// Sets:
    /// - `mode`: desired mode
    /// - `reason`: `"changed"` or `"unchanged"` (mode writes skipped)
    ModeApplied,

    /// A channel's input mode was rewritten.
    ///
    /// Sets:
    /// - `channel`, `mode`
    ChannelModeWritten,

    /// A channel's output was found off in the powered mode and switched on.
    ///
    /// Sets:
    /// - `channel`
    OutputForcedOn,

    /// A channel read/write failed; that channel's step was abandoned.
    ///
    /// Sets:
    /// - `channel`, `reason`
    ChannelFailed,

    // === Scheduling events ===
    /// Next probe armed.
    ///
    /// Sets:
    /// - `delay_ms`: stored backoff delay
    /// - `jitter_ms`: random addition to this wait only
    /// - `reachable`: outcome that drove the schedule
    BackoffScheduled,

    /// Connectivity notification received (debounce timer re-armed).
    ///
    /// Sets:
    /// - `reason`: `"connected"` or `"disconnected"`
    NetworkChanged,

    /// Debounce settled: backoff reset and an immediate probe started.
    RecheckTriggered,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Channel the event refers to.
    pub channel: Option<ChannelId>,
    /// Mode the event refers to.
    pub mode: Option<Mode>,
    /// Probe outcome.
    pub reachable: Option<bool>,
    /// Probe cycle the event belongs to.
    pub cycle: Option<u64>,
    /// Transport attempt within a probe cycle.
    pub attempt: Option<u32>,
    /// Delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Jitter in milliseconds (compact).
    pub jitter_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            channel: None,
            mode: None,
            reachable: None,
            cycle: None,
            attempt: None,
            delay_ms: None,
            jitter_ms: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_channel(mut self, id: ChannelId) -> Self {
        self.channel = Some(id);
        self
    }

    #[inline]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[inline]
    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = Some(reachable);
        self
    }

    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches a transport attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a jitter sample (stored as milliseconds).
    #[inline]
    pub fn with_jitter(mut self, d: Duration) -> Self {
        self.jitter_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns the delay as a [`Duration`], if set.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ProbeStarting);
        let b = Event::new(EventKind::ProbeStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_compaction() {
        let ev = Event::new(EventKind::BackoffScheduled)
            .with_delay(Duration::from_millis(60_000))
            .with_jitter(Duration::from_millis(1_250));
        assert_eq!(ev.delay_ms, Some(60_000));
        assert_eq!(ev.delay(), Some(Duration::from_millis(60_000)));
        assert_eq!(ev.jitter_ms, Some(1_250));

        let huge = Event::new(EventKind::BackoffScheduled).with_delay(Duration::MAX);
        assert_eq!(huge.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_events() {
        let ev = Event::subscriber_overflow("LogWriter", "full");
        assert!(ev.is_subscriber_event());
        assert_eq!(ev.reason.as_deref(), Some("subscriber=LogWriter reason=full"));
    }
}
