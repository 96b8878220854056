#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use hubwatch::{
    ChannelConfigStore, ChannelError, ChannelId, ChannelPowerStore, Config, Controller, Event,
    EventKind, JitterPolicy, Mode, TransportClient, TransportError,
};

/// Transport answering from a script of per-call replies.
pub struct ScriptedHub {
    replies: Mutex<VecDeque<Result<Option<u16>, TransportError>>>,
    fallback: Result<Option<u16>, TransportError>,
    latency: Duration,
    pub calls: AtomicU32,
}

pub fn refused() -> Result<Option<u16>, TransportError> {
    Err(TransportError::Connect {
        reason: "connection refused".into(),
    })
}

impl ScriptedHub {
    /// One entry per probe cycle: `true` answers 200 on the first attempt,
    /// `false` fails both attempts. After the script the hub stays `fallback_up`.
    pub fn cycles(outcomes: &[bool], fallback_up: bool) -> Arc<Self> {
        let mut replies = VecDeque::new();
        for &up in outcomes {
            if up {
                replies.push_back(Ok(Some(200)));
            } else {
                replies.push_back(refused());
                replies.push_back(Ok(Some(503)));
            }
        }
        Arc::new(Self {
            replies: Mutex::new(replies),
            fallback: if fallback_up { Ok(Some(200)) } else { refused() },
            latency: Duration::ZERO,
            calls: AtomicU32::new(0),
        })
    }

    /// Always up, but every call takes `latency`.
    pub fn slow(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Ok(Some(200)),
            latency,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportClient for ScriptedHub {
    async fn get(&self, _url: &str, _timeout: Duration) -> Result<Option<u16>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// In-memory relay that records every write.
#[derive(Default)]
pub struct Relay {
    pub modes: Mutex<HashMap<ChannelId, Mode>>,
    pub outputs: Mutex<HashMap<ChannelId, bool>>,
    pub mode_writes: Mutex<Vec<(ChannelId, Mode)>>,
    pub output_writes: Mutex<Vec<(ChannelId, bool)>>,
}

impl Relay {
    pub fn new(channels: &[(u8, Mode, bool)]) -> Arc<Self> {
        let relay = Relay::default();
        for &(id, mode, on) in channels {
            relay.modes.lock().unwrap().insert(ChannelId(id), mode);
            relay.outputs.lock().unwrap().insert(ChannelId(id), on);
        }
        Arc::new(relay)
    }

    pub fn mode(&self, id: u8) -> Mode {
        self.modes.lock().unwrap()[&ChannelId(id)]
    }

    pub fn output(&self, id: u8) -> bool {
        self.outputs.lock().unwrap()[&ChannelId(id)]
    }

    pub fn mode_writes(&self) -> Vec<(ChannelId, Mode)> {
        self.mode_writes.lock().unwrap().clone()
    }

    pub fn output_writes(&self) -> Vec<(ChannelId, bool)> {
        self.output_writes.lock().unwrap().clone()
    }

    fn missing(id: ChannelId) -> ChannelError {
        ChannelError::Protocol {
            reason: format!("unknown channel {id}"),
        }
    }
}

#[async_trait]
impl ChannelConfigStore for Relay {
    async fn input_mode(&self, id: ChannelId) -> Result<Option<Mode>, ChannelError> {
        let mode = self.modes.lock().unwrap().get(&id).copied();
        mode.map(Some).ok_or_else(|| Self::missing(id))
    }

    async fn set_input_mode(&self, id: ChannelId, mode: Mode) -> Result<(), ChannelError> {
        self.modes.lock().unwrap().insert(id, mode);
        self.mode_writes.lock().unwrap().push((id, mode));
        Ok(())
    }
}

#[async_trait]
impl ChannelPowerStore for Relay {
    async fn output(&self, id: ChannelId) -> Result<bool, ChannelError> {
        let on = self.outputs.lock().unwrap().get(&id).copied();
        on.ok_or_else(|| Self::missing(id))
    }

    async fn set_output(&self, id: ChannelId, on: bool) -> Result<(), ChannelError> {
        self.outputs.lock().unwrap().insert(id, on);
        self.output_writes.lock().unwrap().push((id, on));
        Ok(())
    }
}

/// Deterministic config: no jitter, no startup grace, 30s/180s backoff.
pub fn config() -> Config {
    Config {
        jitter: JitterPolicy::None,
        startup_delay: Duration::ZERO,
        ..Config::default()
    }
}

pub fn controller(cfg: Config, hub: Arc<ScriptedHub>, relay: Arc<Relay>) -> Controller {
    Controller::builder(cfg)
        .with_transport(hub)
        .with_channels(relay.clone(), relay)
        .build()
        .unwrap()
}

/// Receives events until one of `kind` arrives.
pub async fn next_of(rx: &mut broadcast::Receiver<Event>, kind: EventKind) -> Event {
    loop {
        let ev = rx.recv().await.unwrap();
        if ev.kind == kind {
            return ev;
        }
    }
}

/// Lets detached channel steps finish.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
