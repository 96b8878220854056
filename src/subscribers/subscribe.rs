//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the
//! controller. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! A slow subscriber only delays itself: when its queue is full, further events
//! are dropped for it and a `SubscriberOverflow` event is published instead.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use hubwatch::{Event, EventKind, Subscribe};
//!
//! struct Outages;
//!
//! #[async_trait]
//! impl Subscribe for Outages {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::HubStateChanged && ev.reachable == Some(false) {
//!             // page someone...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "outages" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives controller events on its own worker task.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue length before events are dropped for this subscriber.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
