//! Row models for the remote document collection.

pub mod project;

pub use project::ProjectRow;
