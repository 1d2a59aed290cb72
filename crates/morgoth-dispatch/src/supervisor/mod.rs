//! Supervisor interface and the immutable pattern registry.
//!
//! A supervisor is the monitoring policy bound to exactly one pattern. The
//! dispatcher only ever calls `track_new` on it; everything past that point
//! (windowing, detectors, alerting) is the supervisor's own business.

pub mod registry;
pub mod series;

use std::sync::Arc;

use morgoth_core::{MetricId, Pattern};

use crate::config::MetricConf;
use crate::sink::Writer;

pub use registry::Registry;
pub use series::SeriesSupervisor;

/// Monitoring policy for every metric its pattern owns.
pub trait Supervisor: Send + Sync {
    fn pattern(&self) -> &Pattern;

    /// Start monitoring `id`. Called at most once per id by the manager.
    ///
    /// Failures stay inside the supervisor (log them, report them through
    /// the sink); they are never surfaced to the ingestion caller.
    fn track_new(&self, id: &MetricId);
}

/// Builds one supervisor from its compiled pattern, its definition, and the
/// shared output sink.
pub type SupervisorFactory =
    dyn Fn(Pattern, &MetricConf, Arc<dyn Writer>) -> Arc<dyn Supervisor> + Send + Sync;

/// Factory for the built-in `SeriesSupervisor`.
pub fn series_factory(pattern: Pattern, conf: &MetricConf, writer: Arc<dyn Writer>) -> Arc<dyn Supervisor> {
    Arc::new(SeriesSupervisor::new(pattern, conf.detectors.clone(), writer))
}
