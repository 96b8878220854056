//! # Relay RPC channel store
//!
//! Talks to the relay's JSON-over-HTTP RPC endpoint (`<base>/rpc/<Method>`):
//!
//! | operation          | call                                                   |
//! |--------------------|--------------------------------------------------------|
//! | `input_mode`       | `Switch.GetConfig?id=N` → `{ "in_mode": "follow" }`    |
//! | `set_input_mode`   | `Switch.SetConfig?id=N&config={"in_mode":"detached"}`  |
//! | `output`           | `Switch.GetStatus?id=N` → `{ "output": true }`         |
//! | `set_output`       | `Switch.Set?id=N&on=true`                              |
//!
//! Non-2xx answers carry `{ "code": i64, "message": str }` and become
//! [`ChannelError::Rejected`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ChannelConfigStore, ChannelId, ChannelPowerStore, Mode};
use crate::error::ChannelError;
use crate::transport::HttpTransport;
use crate::transport::http::map_error;

#[derive(Deserialize)]
struct SwitchConfig {
    in_mode: String,
}

#[derive(Deserialize)]
struct SwitchStatus {
    output: bool,
}

#[derive(Deserialize)]
struct RpcFault {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Channel store backed by the relay RPC over HTTP.
#[derive(Clone, Debug)]
pub struct RpcChannels {
    client: Client,
    base: String,
    timeout: Duration,
}

impl RpcChannels {
    /// Creates a store for the relay at `base` (e.g. `http://127.0.0.1`).
    pub fn new(transport: &HttpTransport, base: impl Into<String>, timeout: Duration) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            client: transport.client().clone(),
            base,
            timeout,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, ChannelError> {
        let url = format!("{}/rpc/{}", self.base, method);
        let res = self
            .client
            .get(&url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_error(e, self.timeout))?;

        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|e| ChannelError::from(map_error(e, self.timeout)))?;

        if !status.is_success() {
            let reason = match serde_json::from_slice::<RpcFault>(&body) {
                Ok(fault) => format!("{method}: code={} {}", fault.code, fault.message),
                Err(_) => format!("{method}: http status {}", status.as_u16()),
            };
            return Err(ChannelError::Rejected { reason });
        }

        serde_json::from_slice(&body).map_err(|e| ChannelError::Protocol {
            reason: format!("{method}: {e}"),
        })
    }
}

fn id_param(id: ChannelId) -> (&'static str, String) {
    ("id", id.to_string())
}

#[async_trait]
impl ChannelConfigStore for RpcChannels {
    async fn input_mode(&self, id: ChannelId) -> Result<Option<Mode>, ChannelError> {
        let cfg: SwitchConfig = self.call("Switch.GetConfig", &[id_param(id)]).await?;
        Ok(cfg.in_mode.parse().ok())
    }

    async fn set_input_mode(&self, id: ChannelId, mode: Mode) -> Result<(), ChannelError> {
        let config = serde_json::json!({ "in_mode": mode.as_str() }).to_string();
        let _: serde_json::Value = self
            .call("Switch.SetConfig", &[id_param(id), ("config", config)])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelPowerStore for RpcChannels {
    async fn output(&self, id: ChannelId) -> Result<bool, ChannelError> {
        let status: SwitchStatus = self.call("Switch.GetStatus", &[id_param(id)]).await?;
        Ok(status.output)
    }

    async fn set_output(&self, id: ChannelId, on: bool) -> Result<(), ChannelError> {
        let _: serde_json::Value = self
            .call("Switch.Set", &[id_param(id), ("on", on.to_string())])
            .await?;
        Ok(())
    }
}
