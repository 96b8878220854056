//! # Backoff policy for reachability probes.
//!
//! [`BackoffPolicy`] controls how the delay between probes evolves while the hub is
//! unreachable. It is parameterized by:
//! - [`BackoffPolicy::min`] the steady heartbeat (used after every healthy probe);
//! - [`BackoffPolicy::max`] the maximum delay cap;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor per unhealthy probe;
//! - [`BackoffPolicy::jitter`] randomization added to the *scheduled* wait.
//!
//! [`Backoff`] is the running state. Jitter never feeds back into the stored delay,
//! so growth is deterministic even though the actual wait varies.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use hubwatch::{Backoff, BackoffPolicy, JitterPolicy};
//!
//! let policy = BackoffPolicy {
//!     min: Duration::from_secs(30),
//!     max: Duration::from_secs(180),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//! let mut backoff = Backoff::new(policy);
//!
//! assert_eq!(backoff.next_delay(true), Duration::from_secs(30));
//! assert_eq!(backoff.next_delay(false), Duration::from_secs(60));
//! assert_eq!(backoff.next_delay(false), Duration::from_secs(120));
//! assert_eq!(backoff.next_delay(false), Duration::from_secs(180));
//! assert_eq!(backoff.next_delay(false), Duration::from_secs(180));
//! assert_eq!(backoff.next_delay(true), Duration::from_secs(30));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Probe backoff policy.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Steady-state poll interval and the backoff floor.
    pub min: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor applied per unhealthy probe (`>= 1.0`).
    pub factor: f64,
    /// Jitter added to the scheduled wait.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `min = 30s`;
    /// - `max = 180s`;
    /// - `factor = 2.0`;
    /// - `jitter = Additive { ceiling: 3s }`.
    fn default() -> Self {
        Self {
            min: Duration::from_secs(30),
            max: Duration::from_secs(180),
            factor: 2.0,
            jitter: JitterPolicy::Additive {
                ceiling: Duration::from_secs(3),
            },
        }
    }
}

impl BackoffPolicy {
    /// Returns the cap, never below [`BackoffPolicy::min`].
    #[inline]
    pub fn ceiling(&self) -> Duration {
        self.max.max(self.min)
    }

    /// Grows `current` by `factor`, clamped to `[min, max]`.
    ///
    /// Non-finite or negative intermediate values clamp to the cap.
    pub fn grow(&self, current: Duration) -> Duration {
        let cap = self.ceiling();
        let grown = current.as_secs_f64() * self.factor;

        let next = if !grown.is_finite() || grown < 0.0 || grown > cap.as_secs_f64() {
            cap
        } else {
            Duration::from_secs_f64(grown)
        };
        next.max(self.min)
    }
}

/// Running backoff state.
///
/// Invariant: `policy.min <= current <= policy.ceiling()`.
#[derive(Clone, Debug)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl Backoff {
    /// Creates the state at the policy minimum.
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current: policy.min,
            policy,
        }
    }

    /// Computes the next base delay from the latest probe outcome and stores it.
    ///
    /// - reachable: resets to `min`;
    /// - unreachable: `min(current * factor, max)`.
    pub fn next_delay(&mut self, was_reachable: bool) -> Duration {
        self.current = if was_reachable {
            self.policy.min
        } else {
            self.policy.grow(self.current)
        };
        self.current
    }

    /// Resets the stored delay to `min` (debounced network event).
    pub fn reset(&mut self) {
        self.current = self.policy.min;
    }

    /// Currently stored base delay.
    #[inline]
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Draws a jitter sample to add on top of the base delay.
    #[inline]
    pub fn jitter(&self) -> Duration {
        self.policy.jitter.sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(min_ms: u64, max_ms: u64) -> BackoffPolicy {
        BackoffPolicy {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn test_starts_at_min() {
        let backoff = Backoff::new(policy(30_000, 180_000));
        assert_eq!(backoff.current(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_outcome_sequence() {
        let mut backoff = Backoff::new(policy(30_000, 180_000));
        let outcomes = [true, true, false, false, false, true];
        let delays: Vec<u128> = outcomes
            .iter()
            .map(|ok| backoff.next_delay(*ok).as_millis())
            .collect();

        assert_eq!(delays, vec![30_000, 30_000, 60_000, 120_000, 180_000, 30_000]);
    }

    #[test]
    fn test_stays_at_max_on_persistent_failure() {
        let mut backoff = Backoff::new(policy(1_000, 5_000));
        for _ in 0..20 {
            backoff.next_delay(false);
        }
        assert_eq!(backoff.current(), Duration::from_millis(5_000));
        assert_eq!(backoff.next_delay(false), Duration::from_millis(5_000));
    }

    #[test]
    fn test_reset_returns_to_min() {
        let mut backoff = Backoff::new(policy(1_000, 60_000));
        backoff.next_delay(false);
        backoff.next_delay(false);
        assert_eq!(backoff.current(), Duration::from_millis(4_000));

        backoff.reset();
        assert_eq!(backoff.current(), Duration::from_millis(1_000));
        assert_eq!(backoff.next_delay(false), Duration::from_millis(2_000));
    }

    #[test]
    fn test_max_below_min_clamps_to_min() {
        let mut backoff = Backoff::new(policy(10_000, 5_000));
        assert_eq!(backoff.next_delay(false), Duration::from_millis(10_000));
        assert_eq!(backoff.next_delay(false), Duration::from_millis(10_000));
    }

    #[test]
    fn test_non_finite_factor_clamps_to_max() {
        let mut p = policy(100, 10_000);
        p.factor = f64::INFINITY;
        let mut backoff = Backoff::new(p);
        assert_eq!(backoff.next_delay(false), Duration::from_millis(10_000));
    }

    #[test]
    fn test_jitter_does_not_alter_stored_delay() {
        let mut p = policy(1_000, 8_000);
        p.jitter = JitterPolicy::Additive {
            ceiling: Duration::from_millis(3_000),
        };
        let mut backoff = Backoff::new(p);

        for expected in [2_000u64, 4_000, 8_000, 8_000] {
            let base = backoff.next_delay(false);
            let jitter = backoff.jitter();
            assert_eq!(base, Duration::from_millis(expected));
            assert!(jitter <= Duration::from_millis(3_000), "jitter {jitter:?} above ceiling");
            assert_eq!(backoff.current(), Duration::from_millis(expected));
        }
    }
}
