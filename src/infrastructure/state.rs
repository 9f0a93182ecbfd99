//! Shared application state

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::infrastructure::host_events::{HostEvent, HostEventSender};
use crate::infrastructure::world::InMemoryWorld;

/// The controller task is gone, nothing can answer
#[derive(Debug, thiserror::Error)]
#[error("Rate controller is not running")]
pub struct ControllerGone;

/// Shared application state
pub struct AppState {
    /// Channel into the controller task
    pub events: HostEventSender,
    /// The simulated host world the controller keeps in sync
    pub world: Arc<InMemoryWorld>,
}

impl AppState {
    pub fn new(events: HostEventSender, world: Arc<InMemoryWorld>) -> Self {
        Self { events, world }
    }

    pub fn notify(&self, event: HostEvent) -> Result<(), ControllerGone> {
        self.events.send(event).map_err(|_| ControllerGone)
    }

    /// Send an event carrying a reply channel and wait for the answer
    pub async fn ask<T>(&self, event: impl FnOnce(oneshot::Sender<T>) -> HostEvent) -> Result<T, ControllerGone> {
        let (reply, rx) = oneshot::channel();
        self.notify(event(reply))?;
        rx.await.map_err(|_| ControllerGone)
    }
}
