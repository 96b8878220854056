//! # Relay channels and the stores that mutate them.
//!
//! A channel is one switched output of the relay. The controller never caches
//! channel state: every apply re-reads through [`ChannelConfigStore`] and
//! [`ChannelPowerStore`] and only writes when the observed value differs.
//!
//! ```text
//! ModeApplier ──► ChannelConfigStore::input_mode / set_input_mode
//!             └─► ChannelPowerStore::output / set_output
//! ```

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::ChannelError;

#[cfg(feature = "http")]
mod rpc;
#[cfg(feature = "http")]
pub use rpc::RpcChannels;

/// Identifier of a relay channel (zero-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u8> for ChannelId {
    fn from(id: u8) -> Self {
        ChannelId(id)
    }
}

/// How a channel's physical input drives its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Input is decoupled from the output; the output stays powered.
    Detached,
    /// Output follows the input switch position.
    Follow,
    /// Each input transition toggles the output.
    Flip,
}

impl Mode {
    /// Wire name used by the relay RPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Detached => "detached",
            Mode::Follow => "follow",
            Mode::Flip => "flip",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detached" => Ok(Mode::Detached),
            "follow" => Ok(Mode::Follow),
            "flip" => Ok(Mode::Flip),
            other => Err(ChannelError::Protocol {
                reason: format!("unknown input mode '{other}'"),
            }),
        }
    }
}

/// Reads and writes a channel's input mode.
#[async_trait]
pub trait ChannelConfigStore: Send + Sync + 'static {
    /// Current input mode of `id`.
    ///
    /// `None` when the relay reports a mode hubwatch does not manage (for
    /// example `momentary`); it always differs from the desired mode.
    async fn input_mode(&self, id: ChannelId) -> Result<Option<Mode>, ChannelError>;

    /// Sets the input mode of `id`.
    async fn set_input_mode(&self, id: ChannelId, mode: Mode) -> Result<(), ChannelError>;
}

/// Reads and writes a channel's output power.
#[async_trait]
pub trait ChannelPowerStore: Send + Sync + 'static {
    /// Whether `id` is currently powered.
    async fn output(&self, id: ChannelId) -> Result<bool, ChannelError>;

    /// Switches `id` on or off.
    async fn set_output(&self, id: ChannelId, on: bool) -> Result<(), ChannelError>;
}
