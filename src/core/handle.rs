//! # Cloneable handle to a running controller.
//!
//! The embedding system reports connectivity transitions through
//! [`ControllerHandle::notify`] and reads the latest [`Status`] snapshot.

use tokio::sync::{broadcast, mpsc, watch};

use crate::core::controller::Status;
use crate::core::debounce::NetworkEvent;
use crate::error::NotifyError;
use crate::events::{Bus, Event};

/// Handle for notifications and status queries.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<NetworkEvent>,
    status: watch::Receiver<Status>,
    bus: Bus,
}

impl ControllerHandle {
    pub(crate) fn new(
        tx: mpsc::Sender<NetworkEvent>,
        status: watch::Receiver<Status>,
        bus: Bus,
    ) -> Self {
        Self { tx, status, bus }
    }

    /// Queues a network notification, waiting for queue space.
    pub async fn notify(&self, ev: NetworkEvent) -> Result<(), NotifyError> {
        self.tx.send(ev).await.map_err(|_| NotifyError::Closed)
    }

    /// Queues a network notification without waiting.
    pub fn try_notify(&self, ev: NetworkEvent) -> Result<(), NotifyError> {
        self.tx.try_send(ev).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifyError::Full,
            mpsc::error::TrySendError::Closed(_) => NotifyError::Closed,
        })
    }

    /// Latest status snapshot.
    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    /// Receiver for status changes.
    pub fn watch_status(&self) -> watch::Receiver<Status> {
        self.status.clone()
    }

    /// Receiver observing every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}
