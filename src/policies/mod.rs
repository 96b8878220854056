//! Probe scheduling policies.
//!
//! This module groups the knobs that control **how long** the controller waits
//! between reachability probes.
//!
//! ## Contents
//! - [`BackoffPolicy`] how probe delays evolve (min / factor / max + jitter)
//! - [`Backoff`]       the running delay state owned by the controller
//! - [`JitterPolicy`]  randomization added on top of the stored delay
//!
//! ## Quick wiring
//! ```text
//! Config { poll_interval, max_backoff, jitter }
//!      └─► Config::backoff() ─► BackoffPolicy
//!           └─► core::scheduler::Scheduler uses:
//!                - Backoff::next_delay(reachable) for the stored delay
//!                - Backoff::jitter() for the extra wait
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → min=30s, factor=2.0, max=180s, jitter=Additive(3s).

mod backoff;
mod jitter;

pub use backoff::{Backoff, BackoffPolicy};
pub use jitter::JitterPolicy;
