//! # Jitter policy for scheduled probes.
//!
//! [`JitterPolicy`] adds randomness on top of the backoff delay so that many
//! independent relays probing the same hub do not fire in lockstep.
//!
//! - [`JitterPolicy::None`] no randomization, predictable waits
//! - [`JitterPolicy::Additive`] adds a random `[0, ceiling]` to the wait

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of scheduled waits.
///
/// Jitter is always *added* to the base delay and never stored back into the
/// backoff state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: wait exactly the backoff delay.
    ///
    /// Use when:
    /// - Only one relay probes the hub
    /// - Testing/debugging
    None,

    /// Additive jitter: wait = delay + random[0, ceiling].
    Additive {
        /// Upper bound of the random addition.
        ceiling: Duration,
    },
}

impl Default for JitterPolicy {
    /// Returns [`JitterPolicy::None`].
    fn default() -> Self {
        JitterPolicy::None
    }
}

impl JitterPolicy {
    /// Draws one jitter sample.
    pub fn sample(&self) -> Duration {
        match self {
            JitterPolicy::None => Duration::ZERO,
            JitterPolicy::Additive { ceiling } => {
                let ms = ceiling.as_millis().min(u128::from(u64::MAX)) as u64;
                if ms == 0 {
                    return Duration::ZERO;
                }
                let mut rng = rand::rng();
                Duration::from_millis(rng.random_range(0..=ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_exact() {
        assert_eq!(JitterPolicy::None.sample(), Duration::ZERO);
    }

    #[test]
    fn test_additive_bounds() {
        let policy = JitterPolicy::Additive {
            ceiling: Duration::from_millis(3000),
        };
        for _ in 0..200 {
            let d = policy.sample();
            assert!(d <= Duration::from_millis(3000), "{d:?} above ceiling");
        }
    }

    #[test]
    fn test_zero_ceiling() {
        let policy = JitterPolicy::Additive {
            ceiling: Duration::ZERO,
        };
        assert_eq!(policy.sample(), Duration::ZERO);
    }
}
