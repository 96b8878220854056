//! # Transport used by the reachability probe.
//!
//! [`TransportClient`] performs exactly **one** GET per call; retries are the
//! probe's business, not the transport's.
//!
//! The call returns:
//! - `Ok(Some(code))` when the endpoint answered with a status;
//! - `Ok(None)` when the call completed but no status was reported (protocol error);
//! - `Err(TransportError)` on timeout, connection failure, DNS failure, etc.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

#[cfg(feature = "http")]
pub(crate) mod http;
#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Single-attempt HTTP GET.
#[async_trait]
pub trait TransportClient: Send + Sync + 'static {
    /// Issues one GET to `url`, bounded by `timeout`.
    async fn get(&self, url: &str, timeout: Duration) -> Result<Option<u16>, TransportError>;
}
