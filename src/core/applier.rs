//! # Idempotent mode application across channels.
//!
//! `apply(desired)` fans out one task per channel and returns immediately:
//!
//! ```text
//! apply(desired)
//!   ├─ write_modes = desired != last_applied
//!   ├─ ensure_on   = desired == powered mode
//!   ├─ for each channel: spawn ChannelStep
//!   │     ├─ write_modes: input_mode() ─► differs? ─► set_input_mode()
//!   │     │               (a mode outside `Mode` always differs)
//!   │     └─ ensure_on:   output()     ─► off?     ─► set_output(true)
//!   └─ last_applied = desired        (issued, not completed)
//! ```
//!
//! A failing read or write abandons that channel's step only and is published as
//! [`EventKind::ChannelFailed`]. Output is never forced off.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::channels::{ChannelConfigStore, ChannelId, ChannelPowerStore, Mode};
use crate::error::ChannelError;
use crate::events::{Bus, Event, EventKind};

pub(crate) struct ModeApplier {
    channels: Arc<[ChannelId]>,
    config: Arc<dyn ChannelConfigStore>,
    power: Arc<dyn ChannelPowerStore>,
    powered: Mode,
    last_applied: Option<Mode>,
    bus: Bus,
}

impl ModeApplier {
    pub fn new(
        channels: impl Into<Arc<[ChannelId]>>,
        config: Arc<dyn ChannelConfigStore>,
        power: Arc<dyn ChannelPowerStore>,
        powered: Mode,
        bus: Bus,
    ) -> Self {
        Self {
            channels: channels.into(),
            config,
            power,
            powered,
            last_applied: None,
            bus,
        }
    }

    /// Issues the per-channel reconcile steps for `desired`.
    ///
    /// The returned handles may be dropped; the steps keep running detached.
    pub fn apply(&mut self, desired: Mode) -> Vec<JoinHandle<()>> {
        let write_mode = self.last_applied != Some(desired);
        let ensure_on = desired == self.powered;

        let handles = self
            .channels
            .iter()
            .map(|&id| {
                let step = ChannelStep {
                    id,
                    desired,
                    write_mode,
                    ensure_on,
                    config: Arc::clone(&self.config),
                    power: Arc::clone(&self.power),
                    bus: self.bus.clone(),
                };
                tokio::spawn(step.run())
            })
            .collect();

        self.last_applied = Some(desired);
        self.bus.publish(
            Event::new(EventKind::ModeApplied)
                .with_mode(desired)
                .with_reason(if write_mode { "changed" } else { "unchanged" }),
        );
        handles
    }

    #[inline]
    pub fn last_applied(&self) -> Option<Mode> {
        self.last_applied
    }
}

struct ChannelStep {
    id: ChannelId,
    desired: Mode,
    write_mode: bool,
    ensure_on: bool,
    config: Arc<dyn ChannelConfigStore>,
    power: Arc<dyn ChannelPowerStore>,
    bus: Bus,
}

impl ChannelStep {
    async fn run(self) {
        if let Err(e) = self.reconcile().await {
            self.bus.publish(
                Event::new(EventKind::ChannelFailed)
                    .with_channel(self.id)
                    .with_mode(self.desired)
                    .with_reason(e.to_string()),
            );
        }
    }

    async fn reconcile(&self) -> Result<(), ChannelError> {
        if self.write_mode {
            let current = self.config.input_mode(self.id).await?;
            if current != Some(self.desired) {
                self.config.set_input_mode(self.id, self.desired).await?;
                self.bus.publish(
                    Event::new(EventKind::ChannelModeWritten)
                        .with_channel(self.id)
                        .with_mode(self.desired),
                );
            }
        }

        if self.ensure_on && !self.power.output(self.id).await? {
            self.power.set_output(self.id, true).await?;
            self.bus
                .publish(Event::new(EventKind::OutputForcedOn).with_channel(self.id));
        }
        Ok(())
    }
}
