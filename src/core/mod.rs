//! Runtime core: the controller actor and its parts.
//!
//! The public API from this module is [`Controller`] (built via
//! [`ControllerBuilder`]) and [`ControllerHandle`].
//!
//! Internal modules:
//! - [`controller`]: the single actor owning all state;
//! - [`probe`]: one reachability cycle with a bounded retry;
//! - [`applier`]: idempotent per-channel mode/output reconciliation;
//! - [`scheduler`]: backoff delay and the poll timer;
//! - [`debounce`]: network notification settle window;
//! - [`timer`]: single-slot cancellable timers;
//! - [`signals`]: OS signal handling for the binary.

mod applier;
mod builder;
mod controller;
mod debounce;
mod handle;
mod probe;
mod scheduler;
mod signals;
mod timer;

pub use builder::ControllerBuilder;
pub use controller::{Controller, Phase, Status};
pub use debounce::NetworkEvent;
pub use handle::ControllerHandle;
pub use probe::{MAX_ATTEMPTS, ProbeOutcome, classify};
pub use signals::{forward_hangups, wait_for_shutdown_signal};
