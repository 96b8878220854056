//! # Tracing-backed logging subscriber.
//!
//! [`LogWriter`] renders controller events through `tracing` with structured
//! fields. Routine events go to `debug`, state changes and writes to `info`,
//! failures to `warn`.
//!
//! ## Output (compact fmt layer)
//! ```text
//!  INFO hub state changed reachable=false
//!  INFO mode applied mode=follow writes="changed"
//!  INFO channel mode written channel=0 mode=follow
//!  WARN channel step abandoned channel=1 reason=connect failed: refused
//! DEBUG next probe scheduled delay_ms=60000 jitter_ms=1734 reachable=false
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Logs every event through `tracing`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::ControllerStarted => {
                info!(startup_delay_ms = e.delay_ms, "controller started");
            }
            EventKind::ControllerStopped => {
                info!("controller stopped");
            }
            EventKind::ProbeStarting => {
                debug!(cycle = e.cycle, "probing hub");
            }
            EventKind::ProbeAttemptFailed => {
                debug!(cycle = e.cycle, attempt = e.attempt, reason, "probe attempt failed");
            }
            EventKind::ProbeCompleted => {
                debug!(
                    cycle = e.cycle,
                    reachable = e.reachable,
                    attempts = e.attempt,
                    reason,
                    "probe completed"
                );
            }
            EventKind::HubStateChanged => {
                info!(reachable = e.reachable, "hub state changed");
            }
            EventKind::ModeApplied => {
                info!(mode = ?e.mode, writes = reason, "mode applied");
            }
            EventKind::ChannelModeWritten => {
                info!(channel = ?e.channel, mode = ?e.mode, "channel mode written");
            }
            EventKind::OutputForcedOn => {
                info!(channel = ?e.channel, "output forced on");
            }
            EventKind::ChannelFailed => {
                warn!(channel = ?e.channel, reason, "channel step abandoned");
            }
            EventKind::BackoffScheduled => {
                debug!(
                    delay_ms = e.delay_ms,
                    jitter_ms = e.jitter_ms,
                    reachable = e.reachable,
                    "next probe scheduled"
                );
            }
            EventKind::NetworkChanged => {
                info!(transition = reason, "network changed");
            }
            EventKind::RecheckTriggered => {
                info!("network settled, rechecking hub");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(reason, "subscriber problem");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
