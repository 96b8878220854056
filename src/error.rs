//! Error types used by the hubwatch runtime and its collaborators.
//!
//! - [`TransportError`]: a single HTTP call failed before producing a status.
//! - [`ProbeError`]: one probe attempt did not classify as reachable.
//! - [`ChannelError`]: a channel read/write failed; abandons that channel's step only.
//! - [`ConfigError`]: static configuration rejected at startup.
//! - [`BuildError`]: the controller builder was missing a collaborator.
//! - [`NotifyError`]: a network notification could not be queued.
//!
//! None of these ever escape the controller loop; they are published as events
//! and the next scheduled cycle retries naturally.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a single transport call.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The call exceeded its per-call timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// Connection could not be established (refused, DNS, unreachable network).
    #[error("connect failed: {reason}")]
    Connect {
        /// The underlying error message.
        reason: String,
    },

    /// Any other transport-level failure.
    #[error("transport failed: {reason}")]
    Other {
        /// The underlying error message.
        reason: String,
    },
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Timeout { .. } => "transport_timeout",
            TransportError::Connect { .. } => "transport_connect",
            TransportError::Other { .. } => "transport_other",
        }
    }
}

/// # Failure of one probe attempt.
///
/// Every variant counts as "not reachable" for that attempt.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The transport call itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The hub answered with a server-side error status (`>= 500`).
    #[error("server error status {code}")]
    Status {
        /// The HTTP status code returned.
        code: u16,
    },

    /// The transport succeeded but reported no status code.
    #[error("response carried no status code")]
    MissingStatus,
}

impl ProbeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use hubwatch::ProbeError;
    ///
    /// assert_eq!(ProbeError::Status { code: 503 }.as_label(), "probe_status");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeError::Transport(e) => e.as_label(),
            ProbeError::Status { .. } => "probe_status",
            ProbeError::MissingStatus => "probe_missing_status",
        }
    }
}

/// # Failure of a channel read or write.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The call to the relay failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The relay answered but the payload was malformed or lacked a field.
    #[error("malformed response: {reason}")]
    Protocol {
        /// What was wrong with the payload.
        reason: String,
    },

    /// The relay answered with an explicit error.
    #[error("rejected by relay: {reason}")]
    Rejected {
        /// Error message reported by the relay.
        reason: String,
    },
}

impl ChannelError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::Transport(e) => e.as_label(),
            ChannelError::Protocol { .. } => "channel_protocol",
            ChannelError::Rejected { .. } => "channel_rejected",
        }
    }
}

/// # Configuration rejected by [`Config::validate`](crate::Config::validate).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hub url is empty")]
    EmptyHubUrl,

    #[error("no channels configured")]
    NoChannels,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("up and down modes are both {mode}")]
    SameModes {
        /// The mode configured for both states.
        mode: crate::Mode,
    },
}

/// # Controller builder was incomplete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A required collaborator was never supplied.
    #[error("missing collaborator: {0}")]
    Missing(&'static str),

    /// The configuration failed validation.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Error returned by [`ControllerHandle::try_notify`](crate::ControllerHandle::try_notify)
/// and [`ControllerHandle::notify`](crate::ControllerHandle::notify).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// Notification queue is full (try again later or use async `notify`).
    #[error("notification queue full")]
    Full,

    /// Controller channel is closed (controller stopped).
    #[error("controller channel closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let t = TransportError::Timeout {
            timeout: Duration::from_secs(5),
        };
        assert_eq!(t.as_label(), "transport_timeout");
        assert_eq!(ProbeError::from(t.clone()).as_label(), "transport_timeout");
        assert_eq!(ProbeError::MissingStatus.as_label(), "probe_missing_status");
        assert_eq!(ChannelError::from(t).as_label(), "transport_timeout");
        assert_eq!(
            ChannelError::Rejected { reason: "x".into() }.as_label(),
            "channel_rejected"
        );
    }

    #[test]
    fn test_display() {
        let e = ProbeError::Status { code: 502 };
        assert_eq!(e.to_string(), "server error status 502");
        let e = ProbeError::from(TransportError::Connect {
            reason: "refused".into(),
        });
        assert_eq!(e.to_string(), "connect failed: refused");
    }
}
