//! In-process catalog event bus.
//!
//! Every successful backend write publishes a [`CatalogEvent`]; the
//! synchronization channel subscribes and re-merges the backing store into
//! the catalog on each one. This is the push-driven change notification of
//! the system -- there is no polling.

pub mod bus;

pub use bus::{
    CatalogEvent, EventBus, COVER_UPDATED, GALLERY_UPDATED, PROJECT_ARCHIVED, PROJECT_CREATED,
    PROJECT_RESTORED, PROJECT_SAVED,
};
