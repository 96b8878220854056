//! # OS signal handling for the `hubwatch` binary.
//!
//! - [`wait_for_shutdown_signal`] completes on a termination signal.
//! - [`forward_hangups`] turns `SIGHUP` into a [`NetworkEvent::Connected`]
//!   notification, so `kill -HUP` (or a NetworkManager dispatcher script) can
//!   request an immediate recheck.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT`, `SIGTERM`, `SIGQUIT`: shutdown
//! - `SIGHUP`: recheck
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]; no recheck signal

use tokio_util::sync::CancellationToken;

use crate::core::{debounce::NetworkEvent, handle::ControllerHandle};
#[cfg(unix)]
use crate::error::NotifyError;

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Forwards every `SIGHUP` to `handle` until `token` is cancelled.
#[cfg(unix)]
pub async fn forward_hangups(
    handle: ControllerHandle,
    token: CancellationToken,
) -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sighup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            _ = token.cancelled() => return Ok(()),
            got = sighup.recv() => {
                if got.is_none() {
                    return Ok(());
                }
                match handle.try_notify(NetworkEvent::Connected) {
                    // A full queue already holds a pending recheck.
                    Ok(()) | Err(NotifyError::Full) => {}
                    Err(NotifyError::Closed) => return Ok(()),
                }
            }
        }
    }
}

/// No hangup signal outside unix; waits for cancellation.
#[cfg(not(unix))]
pub async fn forward_hangups(
    _handle: ControllerHandle,
    token: CancellationToken,
) -> std::io::Result<()> {
    token.cancelled().await;
    Ok(())
}
