//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `ControllerActor`, `core::probe::probe`, `core::applier` channel
//!   tasks, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the controller's subscriber listener (fans out to
//!   `SubscriberSet`) and any receiver from `Controller::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
