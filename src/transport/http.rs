use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, redirect};

use super::TransportClient;
use crate::error::TransportError;

/// [`TransportClient`] backed by `reqwest`.
///
/// Redirects are never followed: a `302` from the hub is already proof that it
/// answers.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client with redirects disabled.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::Other {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

/// Maps a `reqwest` failure onto the transport taxonomy.
pub(crate) fn map_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { timeout }
    } else if err.is_connect() {
        TransportError::Connect {
            reason: err.to_string(),
        }
    } else {
        TransportError::Other {
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Option<u16>, TransportError> {
        let res = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_error(e, timeout))?;

        Ok(Some(res.status().as_u16()))
    }
}
