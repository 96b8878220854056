//! # Controller: the single actor owning all monitor state.
//!
//! [`Controller`] is the assembled, not-yet-running monitor. [`Controller::run`]
//! spawns the subscriber fan-out and drives a `ControllerActor` until the
//! cancellation token fires.
//!
//! ## State machine
//! ```text
//!            startup grace
//! Startup ─────────────────► probe ──┬─ Reachable   ─► Steady(Up)
//!                                    └─ Unreachable ─► Steady(Down)
//!
//! Steady(*) ── poll timer ──► probe ─► apply(mode_for(outcome)) ─► schedule(outcome)
//! Steady(*) ── settled NetworkEvent ─► reset backoff + cancel poll ─► probe
//! ```
//!
//! ## Event sources (handled strictly one at a time)
//! - timer firings (`Poll`, `Debounce`), via [`TimerSlot`]s owned by the actor
//! - probe completions, sent back by the spawned probe task
//! - network notifications, from [`ControllerHandle`]s
//!
//! ## Rules
//! - Transport calls never run on the actor task.
//! - At most one poll timer and one debounce timer exist at any instant.
//! - Only the outcome of the most recently started probe drives apply/schedule; an
//!   older probe still in flight when a recheck starts is superseded.
//! - The actor never stops on its own.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::channels::Mode;
use crate::config::Config;
use crate::core::{
    applier::ModeApplier,
    builder::ControllerBuilder,
    debounce::{Debouncer, NetworkEvent},
    handle::ControllerHandle,
    probe::{Probe, ProbeOutcome},
    scheduler::Scheduler,
    timer::{TimerFired, TimerKind, TimerSlot},
};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Where the state machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first probe to complete.
    Startup,
    /// Latest probe found the hub reachable.
    Up,
    /// Latest probe found the hub unreachable.
    Down,
}

/// Snapshot of the controller state, refreshed after every transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub phase: Phase,
    /// `None` until the first apply.
    pub last_applied: Option<Mode>,
    /// Stored backoff delay (without jitter).
    pub current_delay: Duration,
    /// Probe outcomes acted upon so far.
    pub probes: u64,
}

/// Assembled monitor, ready to [`run`](Controller::run).
pub struct Controller {
    pub(crate) cfg: Config,
    pub(crate) bus: Bus,
    pub(crate) subscribers: Vec<Arc<dyn Subscribe>>,
    pub(crate) probe: Probe,
    pub(crate) applier: ModeApplier,
    pub(crate) notify_tx: mpsc::Sender<NetworkEvent>,
    pub(crate) notify_rx: mpsc::Receiver<NetworkEvent>,
    pub(crate) status_tx: watch::Sender<Status>,
}

impl Controller {
    /// Starts building a controller from `cfg`.
    pub fn builder(cfg: Config) -> ControllerBuilder {
        ControllerBuilder::new(cfg)
    }

    /// Returns a handle for notifications and status queries.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle::new(
            self.notify_tx.clone(),
            self.status_tx.subscribe(),
            self.bus.clone(),
        )
    }

    /// Receiver observing every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs the monitor until `token` is cancelled.
    pub async fn run(self, token: CancellationToken) {
        let Controller {
            cfg,
            bus,
            subscribers,
            probe,
            applier,
            notify_tx,
            notify_rx,
            status_tx,
        } = self;
        drop(notify_tx);

        let set = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let listener = spawn_listener(&bus, Arc::clone(&set));

        let actor = ControllerActor::new(cfg, bus.clone(), probe, applier, notify_rx, status_tx);
        actor.run(token).await;

        // Let the listener forward ControllerStopped before the workers close.
        let _ = listener.await;
        if let Ok(set) = Arc::try_unwrap(set) {
            set.shutdown().await;
        }
    }
}

/// Forwards bus events to the subscriber set up to and including `ControllerStopped`.
fn spawn_listener(bus: &Bus, set: Arc<SubscriberSet>) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let stopped = ev.kind == EventKind::ControllerStopped;
                    set.emit(ev);
                    if stopped {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Single writer of all controller state.
struct ControllerActor {
    cfg: Config,
    bus: Bus,
    probe: Probe,
    applier: ModeApplier,
    scheduler: Scheduler,
    debouncer: Debouncer,

    timer_rx: mpsc::UnboundedReceiver<TimerFired>,
    probe_tx: mpsc::UnboundedSender<ProbeOutcome>,
    probe_rx: mpsc::UnboundedReceiver<ProbeOutcome>,
    notify_rx: mpsc::Receiver<NetworkEvent>,
    status_tx: watch::Sender<Status>,

    phase: Phase,
    started_cycle: u64,
    probes: u64,
}

impl ControllerActor {
    fn new(
        cfg: Config,
        bus: Bus,
        probe: Probe,
        applier: ModeApplier,
        notify_rx: mpsc::Receiver<NetworkEvent>,
        status_tx: watch::Sender<Status>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (probe_tx, probe_rx) = mpsc::unbounded_channel();

        let scheduler = Scheduler::new(
            cfg.backoff(),
            TimerSlot::new(TimerKind::Poll, timer_tx.clone()),
        );
        let debouncer = Debouncer::new(cfg.debounce, TimerSlot::new(TimerKind::Debounce, timer_tx));

        Self {
            cfg,
            bus,
            probe,
            applier,
            scheduler,
            debouncer,
            timer_rx,
            probe_tx,
            probe_rx,
            notify_rx,
            status_tx,
            phase: Phase::Startup,
            started_cycle: 0,
            probes: 0,
        }
    }

    async fn run(mut self, token: CancellationToken) {
        self.scheduler.arm_startup(self.cfg.startup_delay);
        self.bus.publish(
            Event::new(EventKind::ControllerStarted).with_delay(self.cfg.startup_delay),
        );
        self.publish_status();

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                Some(fired) = self.timer_rx.recv() => self.on_timer(fired),
                Some(outcome) = self.probe_rx.recv() => self.on_probe(outcome),
                Some(ev) = self.notify_rx.recv() => self.on_network(ev),
            }
        }

        self.bus.publish(Event::new(EventKind::ControllerStopped));
    }

    fn on_timer(&mut self, fired: TimerFired) {
        match fired.kind {
            TimerKind::Poll => {
                if self.scheduler.take_fired(fired.id) {
                    self.start_probe();
                }
            }
            TimerKind::Debounce => {
                if self.debouncer.settled(fired.id) {
                    self.scheduler.reset();
                    self.bus.publish(
                        Event::new(EventKind::RecheckTriggered)
                            .with_delay(self.scheduler.current()),
                    );
                    self.publish_status();
                    self.start_probe();
                }
            }
        }
    }

    fn on_network(&mut self, ev: NetworkEvent) {
        self.bus
            .publish(Event::new(EventKind::NetworkChanged).with_reason(ev.as_str()));
        self.debouncer.notify();
    }

    fn start_probe(&mut self) {
        self.started_cycle += 1;
        let cycle = self.started_cycle;
        self.bus
            .publish(Event::new(EventKind::ProbeStarting).with_cycle(cycle));

        let probe = self.probe.clone();
        let tx = self.probe_tx.clone();
        tokio::spawn(async move {
            let outcome = probe.run(cycle).await;
            let _ = tx.send(outcome);
        });
    }

    fn on_probe(&mut self, outcome: ProbeOutcome) {
        let completed = Event::new(EventKind::ProbeCompleted)
            .with_cycle(outcome.cycle)
            .with_reachable(outcome.reachable)
            .with_attempt(outcome.attempts);

        if outcome.cycle != self.started_cycle {
            self.bus.publish(completed.with_reason("superseded"));
            return;
        }
        self.bus.publish(completed);

        let phase = if outcome.reachable { Phase::Up } else { Phase::Down };
        if phase != self.phase {
            self.phase = phase;
            self.bus
                .publish(Event::new(EventKind::HubStateChanged).with_reachable(outcome.reachable));
        }

        // Channel steps run detached.
        let _ = self.applier.apply(self.cfg.mode_for(outcome.reachable));

        let scheduled = self.scheduler.schedule(outcome.reachable);
        self.bus.publish(
            Event::new(EventKind::BackoffScheduled)
                .with_delay(scheduled.delay)
                .with_jitter(scheduled.jitter)
                .with_reachable(outcome.reachable),
        );

        self.probes += 1;
        self.publish_status();
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(Status {
            phase: self.phase,
            last_applied: self.applier.last_applied(),
            current_delay: self.scheduler.current(),
            probes: self.probes,
        });
    }
}
