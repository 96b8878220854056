//! # hubwatch
//!
//! **Hubwatch** keeps a relay's channels in the right input mode depending on
//! whether a home-automation hub is reachable.
//!
//! While the hub answers, channels are *detached* from their physical switch and
//! forced on so the hub owns them. When the hub stops answering, channels fall
//! back to *follow* mode so the wall switch works again. Probing backs off while
//! the hub is down, and connectivity notifications trigger a debounced recheck.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   NetworkEvent (Connected/Disconnected)
//!        │ ControllerHandle::notify
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ControllerActor (single owner of all state)                      │
//! │  - Debouncer   (Debounce timer slot)                              │
//! │  - Scheduler   (Backoff + Poll timer slot)                        │
//! │  - ModeApplier (last_applied, per-channel steps)                  │
//! └──────┬──────────────────────────┬──────────────────────────┬──────┘
//!        │ spawn                    │ spawn per channel        │
//!        ▼                          ▼                          │
//!  ┌─────────────┐          ┌────────────────┐                 │
//!  │ Probe       │          │ ChannelStep    │                 │
//!  │ (≤2 GETs)   │          │ read ─► write  │                 │
//!  └─────┬───────┘          └───────┬────────┘                 │
//!        │ TransportClient          │ ChannelConfigStore       │
//!        ▼                          ▼ ChannelPowerStore        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: Config::bus_capacity)                 │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                          (per-sub queues)
//!                       ┌───────────┼───────────┐
//!                       ▼           ▼           ▼
//!                   LogWriter    custom        ...
//! ```
//!
//! ### Cycle
//! ```text
//! startup grace ─► probe ─► apply(mode_for(outcome)) ─► schedule(outcome) ─┐
//!                    ▲                                                     │
//!                    └──────── poll timer (delay + jitter) ◄───────────────┘
//!
//! notify(ev) ─► debounce window ─► reset backoff, cancel poll ─► probe
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                              |
//! |-------------------|-----------------------------------------------------------|-------------------------------------------------|
//! | **Controller**    | Probe, apply and schedule loop with debounced rechecks.   | [`Controller`], [`ControllerHandle`]            |
//! | **Policies**      | Probe delay growth and jitter.                            | [`BackoffPolicy`], [`JitterPolicy`]             |
//! | **Collaborators** | Pluggable hub transport and relay channel stores.         | [`TransportClient`], [`ChannelConfigStore`]     |
//! | **Subscriber API**| Hook into controller events (logging, custom sinks).      | [`Subscribe`]                                   |
//! | **Errors**        | Typed errors for transport, channels and configuration.   | [`TransportError`], [`ChannelError`]            |
//! | **Configuration** | Centralize runtime settings.                              | [`Config`]                                      |
//!
//! ## Optional features
//! - `http` (default): reqwest-backed [`HttpTransport`] and [`RpcChannels`].
//! - `logging` (default): exports the tracing-backed [`LogWriter`].
//! - `cli` (default): builds the `hubwatch` binary (pulls in `clap`, `anyhow`
//!   and `tracing-subscriber`; implies `http` and `logging`).
//!
//! ## Example
//! ```rust,no_run
//! # #[cfg(all(feature = "http", feature = "logging"))]
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use hubwatch::{Config, Controller, HttpTransport, LogWriter, NetworkEvent, RpcChannels};
//!
//! let cfg = Config::default();
//! let transport = HttpTransport::new()?;
//! let relay = Arc::new(RpcChannels::new(&transport, "http://127.0.0.1", Duration::from_secs(5)));
//!
//! let controller = Controller::builder(cfg)
//!     .with_transport(Arc::new(transport))
//!     .with_channels(relay.clone(), relay)
//!     .with_subscribers(vec![Arc::new(LogWriter::new())])
//!     .build()?;
//!
//! let handle = controller.handle();
//! let token = CancellationToken::new();
//! let run = tokio::spawn(controller.run(token.clone()));
//!
//! // The host network came back: recheck soon.
//! handle.notify(NetworkEvent::Connected).await?;
//!
//! token.cancel();
//! run.await?;
//! # Ok(())
//! # }
//! ```
mod channels;
mod config;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod transport;

// ---- Public re-exports ----

pub use channels::{ChannelConfigStore, ChannelId, ChannelPowerStore, Mode};
pub use config::Config;
pub use core::{
    Controller, ControllerBuilder, ControllerHandle, MAX_ATTEMPTS, NetworkEvent, Phase,
    ProbeOutcome, Status, classify, forward_hangups, wait_for_shutdown_signal,
};
pub use error::{BuildError, ChannelError, ConfigError, NotifyError, ProbeError, TransportError};
pub use events::{Event, EventKind};
pub use policies::{Backoff, BackoffPolicy, JitterPolicy};
pub use subscribers::{Subscribe, SubscriberSet};
pub use transport::TransportClient;

// Enable with: `--features http`
#[cfg(feature = "http")]
pub use channels::RpcChannels;
#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
