//! Metric identifiers and the patterns that select them.
//!
//! - `id`: the opaque `MetricId` carried through the ingestion hot path.
//! - `pattern`: compiled supervisor patterns and the first-match resolver.

pub mod id;
pub mod pattern;

pub use id::MetricId;
pub use pattern::{resolve, Pattern};
