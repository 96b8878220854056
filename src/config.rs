//! # Controller configuration.
//!
//! Provides [`Config`] centralized settings for the controller runtime. All values
//! are static for the lifetime of a controller; there is no hot reload.
//!
//! ## Sentinel values
//! - `max_backoff < poll_interval` → the cap is raised to `poll_interval`
//! - `jitter = JitterPolicy::None` → waits are exact (useful in tests)

use std::time::Duration;

use crate::channels::{ChannelId, Mode};
use crate::error::ConfigError;
use crate::policies::{BackoffPolicy, JitterPolicy};

/// Configuration for the controller.
///
/// ## Field semantics
/// - `hub_url`: endpoint probed for liveness
/// - `channels`: relay channels reconciled on every apply
/// - `poll_interval`: steady heartbeat while reachable, and the backoff floor
/// - `max_backoff`: backoff cap while unreachable
/// - `http_timeout`: per-call transport timeout
/// - `retry_delay`: pause between the two probe attempts
/// - `jitter`: random addition to each scheduled wait
/// - `debounce`: settle window for network notifications
/// - `startup_delay`: grace period before the first probe
/// - `up_mode` / `down_mode`: input modes for reachable / unreachable; `up_mode`
///   is also the powered mode whose output is forced on
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `notify_capacity`: queue size for network notifications (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    pub hub_url: String,
    pub channels: Vec<ChannelId>,

    pub poll_interval: Duration,
    pub max_backoff: Duration,
    pub http_timeout: Duration,
    pub retry_delay: Duration,
    pub jitter: JitterPolicy,

    pub debounce: Duration,
    pub startup_delay: Duration,

    pub up_mode: Mode,
    pub down_mode: Mode,

    pub bus_capacity: usize,
    pub notify_capacity: usize,
}

impl Config {
    /// Builds the backoff policy (factor 2, cap never below the floor).
    #[inline]
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            min: self.poll_interval,
            max: self.max_backoff.max(self.poll_interval),
            factor: 2.0,
            jitter: self.jitter,
        }
    }

    /// Input mode for a probe outcome.
    #[inline]
    pub fn mode_for(&self, reachable: bool) -> Mode {
        if reachable { self.up_mode } else { self.down_mode }
    }

    /// Rejects configurations the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hub_url.trim().is_empty() {
            return Err(ConfigError::EmptyHubUrl);
        }
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.up_mode == self.down_mode {
            return Err(ConfigError::SameModes { mode: self.up_mode });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `hub_url = http://homeassistant.local:8123/`, `channels = [0]`
    /// - `poll_interval = 30s`, `max_backoff = 180s`, `jitter = Additive(3s)`
    /// - `http_timeout = 5s`, `retry_delay = 300ms`
    /// - `debounce = 2s`, `startup_delay = 2s`
    /// - `up_mode = Detached`, `down_mode = Follow`
    fn default() -> Self {
        Self {
            hub_url: "http://homeassistant.local:8123/".to_string(),
            channels: vec![ChannelId(0)],
            poll_interval: Duration::from_secs(30),
            max_backoff: Duration::from_secs(180),
            http_timeout: Duration::from_secs(5),
            retry_delay: Duration::from_millis(300),
            jitter: JitterPolicy::Additive {
                ceiling: Duration::from_secs(3),
            },
            debounce: Duration::from_secs(2),
            startup_delay: Duration::from_secs(2),
            up_mode: Mode::Detached,
            down_mode: Mode::Follow,
            bus_capacity: 1024,
            notify_capacity: 64,
        }
    }
}
