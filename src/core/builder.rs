use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::{
    applier::ModeApplier,
    controller::{Controller, Phase, Status},
    probe::Probe,
};
use crate::{
    channels::{ChannelConfigStore, ChannelPowerStore},
    config::Config,
    error::BuildError,
    events::Bus,
    subscribers::Subscribe,
    transport::TransportClient,
};

/// Builder for constructing a [`Controller`] from its collaborators.
pub struct ControllerBuilder {
    cfg: Config,
    transport: Option<Arc<dyn TransportClient>>,
    config_store: Option<Arc<dyn ChannelConfigStore>>,
    power_store: Option<Arc<dyn ChannelPowerStore>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            transport: None,
            config_store: None,
            power_store: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the transport used by the reachability probe.
    pub fn with_transport(mut self, transport: Arc<dyn TransportClient>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the relay channel stores.
    ///
    /// Both may be the same object (see [`crate::RpcChannels`]).
    pub fn with_channels(
        mut self,
        config: Arc<dyn ChannelConfigStore>,
        power: Arc<dyn ChannelPowerStore>,
    ) -> Self {
        self.config_store = Some(config);
        self.power_store = Some(power);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and assembles the controller.
    ///
    /// Nothing is spawned here; tasks start in [`Controller::run`].
    pub fn build(self) -> Result<Controller, BuildError> {
        self.cfg.validate()?;
        let transport = self.transport.ok_or(BuildError::Missing("transport"))?;
        let (config_store, power_store) = self
            .config_store
            .zip(self.power_store)
            .ok_or(BuildError::Missing("channels"))?;

        let cfg = self.cfg;
        let bus = Bus::new(cfg.bus_capacity);
        let probe = Probe::new(
            transport,
            cfg.hub_url.as_str(),
            cfg.http_timeout,
            cfg.retry_delay,
            bus.clone(),
        );
        let applier = ModeApplier::new(
            cfg.channels.clone(),
            config_store,
            power_store,
            cfg.up_mode,
            bus.clone(),
        );
        let (notify_tx, notify_rx) = mpsc::channel(cfg.notify_capacity.max(1));
        let (status_tx, _) = watch::channel(Status {
            phase: Phase::Startup,
            last_applied: None,
            current_delay: cfg.poll_interval,
            probes: 0,
        });

        Ok(Controller {
            cfg,
            bus,
            subscribers: self.subscribers,
            probe,
            applier,
            notify_tx,
            notify_rx,
            status_tx,
        })
    }
}
