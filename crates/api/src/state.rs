use std::sync::Arc;

use atelier_events::EventBus;

use crate::config::ServerConfig;
use crate::service::CatalogService;
use crate::upload::ImageStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The catalog service holding the merged store and draft overlay.
    pub service: Arc<CatalogService>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Event bus feeding the synchronization channel.
    pub bus: Arc<EventBus>,
    /// Destination for uploaded gallery images.
    pub images: Arc<dyn ImageStore>,
}
