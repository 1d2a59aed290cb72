//! Ingestion entry point.
//!
//! `Manager::observe` is called for every metric sample. It deduplicates ids
//! through the `IdentifierSet` and routes first-sight ids to the supervisor
//! whose pattern matches first.

pub mod identifier_set;
pub mod manager;

pub use identifier_set::IdentifierSet;
pub use manager::Manager;
