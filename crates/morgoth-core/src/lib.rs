//! morgoth core: metric identifiers, supervisor patterns, the pattern matcher,
//! and the shared error type.
//!
//! This crate carries no runtime or I/O dependencies so the matching rules can
//! be reused by the dispatcher, config tooling, and tests alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MorgothError`/`Result` so a bad config
//! line never takes the ingestion process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;

/// Shared result type.
pub use error::{Result, MorgothError};
pub use metric::{resolve, MetricId, Pattern};
