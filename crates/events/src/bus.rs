//! Broadcast bus for catalog change events, backed by a
//! `tokio::sync::broadcast` channel and shared via `Arc<EventBus>`.

use atelier_core::types::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

pub const PROJECT_CREATED: &str = "project.created";
pub const PROJECT_SAVED: &str = "project.saved";
pub const PROJECT_ARCHIVED: &str = "project.archived";
pub const PROJECT_RESTORED: &str = "project.restored";
pub const GALLERY_UPDATED: &str = "project.gallery-updated";
pub const COVER_UPDATED: &str = "project.cover-updated";

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// A change that happened to the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    /// Dot-separated event name, e.g. `"project.saved"`.
    pub kind: String,

    /// The project the change concerns, when there is a single one.
    pub project_id: Option<ProjectId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl CatalogEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            project_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for [`CatalogEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity. When the buffer is
    /// full the oldest un-consumed messages are dropped and slow receivers
    /// observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. With zero subscribers
    /// the event is silently dropped, which is fine: the backing store is
    /// the durable record, the bus only triggers re-merges.
    pub fn publish(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            CatalogEvent::new(PROJECT_SAVED)
                .with_project("1")
                .with_payload(serde_json::json!({"published": true})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, PROJECT_SAVED);
        assert_eq!(received.project_id.as_deref(), Some("1"));
        assert_eq!(received.payload["published"], true);
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(CatalogEvent::new(PROJECT_ARCHIVED).with_project("2"));

        assert_eq!(rx1.recv().await.unwrap().kind, PROJECT_ARCHIVED);
        assert_eq!(rx2.recv().await.unwrap().kind, PROJECT_ARCHIVED);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(CatalogEvent::new(PROJECT_RESTORED));
    }
}
