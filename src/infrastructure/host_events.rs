//! Host events - The single task that owns the rate controller
//!
//! Everything the host wants from the controller arrives as a [`HostEvent`]
//! on one channel, so controller calls never overlap. Events sent while the
//! controller is still loading simply wait in the channel.

use tokio::sync::{mpsc, oneshot};

use crate::application::dto::{CommandState, ControllerStatus, SyncReport};
use crate::application::services::RateController;
use crate::domain::value_objects::{EntityId, RateTable};

/// Which rate table a snapshot request wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableChoice {
    Baseline,
    Derived,
}

#[derive(Debug)]
pub enum HostEvent {
    ServerInitialized,
    ServerSave,
    EntitySpawned(EntityId),
    /// The show-data command
    Command { reply: oneshot::Sender<CommandState> },
    Status { reply: oneshot::Sender<ControllerStatus> },
    Snapshot {
        table: TableChoice,
        reply: oneshot::Sender<RateTable>,
    },
    /// Restore baseline rates and stop the controller task
    Unload { reply: oneshot::Sender<Option<SyncReport>> },
}

pub type HostEventSender = mpsc::UnboundedSender<HostEvent>;

/// Drain host events until `Unload` or until every sender is gone
pub async fn run_controller(mut controller: RateController, mut events: mpsc::UnboundedReceiver<HostEvent>) {
    tracing::info!("Rate controller started");

    while let Some(event) = events.recv().await {
        match event {
            HostEvent::ServerInitialized => {
                // Errors are already logged and leave the controller Failed
                if let Ok(report) = controller.start().await {
                    tracing::debug!(updated = report.updated, total = report.total, "Startup sync finished");
                }
            }
            HostEvent::ServerSave => {
                controller.on_save().await;
            }
            HostEvent::EntitySpawned(id) => {
                controller.on_entity_spawned(id);
            }
            HostEvent::Command { reply } => {
                let _ = reply.send(controller.show_data().await);
            }
            HostEvent::Status { reply } => {
                let _ = reply.send(controller.status());
            }
            HostEvent::Snapshot { table, reply } => {
                let book = controller.book();
                let table = match table {
                    TableChoice::Baseline => book.baseline(),
                    TableChoice::Derived => book.derived(),
                };
                let _ = reply.send(table.clone());
            }
            HostEvent::Unload { reply } => {
                let _ = reply.send(controller.shutdown());
                break;
            }
        }
    }

    tracing::info!(state = ?controller.state(), "Rate controller stopped");
}
