//! The synchronization channel.
//!
//! A background task subscribed to the event bus. Every published catalog
//! event triggers a full snapshot reload and re-merge, so all consumers of
//! the service converge on the backend's state without polling. A lagged
//! receiver is not fatal: missed events are compensated by the next full
//! reload.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use atelier_events::EventBus;

use crate::service::CatalogService;

/// Spawn the synchronization loop. The task runs until `cancel` fires or
/// the bus is dropped.
pub fn spawn(
    service: Arc<CatalogService>,
    bus: Arc<EventBus>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("synchronization channel stopping");
                    break;
                }
                event = rx.recv() => match event {
                    Ok(event) => {
                        tracing::debug!(kind = %event.kind, project_id = ?event.project_id, "catalog event, re-merging snapshot");
                        if let Err(err) = service.resync().await {
                            tracing::error!(error = %err, "snapshot re-merge failed");
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // The next full reload covers whatever was missed.
                        tracing::warn!(missed, "event receiver lagged, forcing re-merge");
                        if let Err(err) = service.resync().await {
                            tracing::error!(error = %err, "snapshot re-merge failed");
                        }
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event bus closed, synchronization channel stopping");
                        break;
                    }
                },
            }
        }
    })
}
