//! Domain logic for the studio project catalog.
//!
//! Everything in this crate is pure and synchronous: the catalog store and
//! its merge rules, the draft overlay, gallery partitioning, the visibility
//! policy, and the bundled default dataset. Persistence and transport live
//! in `atelier-db` and `atelier-api`.

pub mod catalog;
pub mod defaults;
pub mod draft;
pub mod error;
pub mod project;
pub mod types;
pub mod visibility;
