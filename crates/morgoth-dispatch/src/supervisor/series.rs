use std::sync::Arc;

use dashmap::DashSet;

use morgoth_core::{MetricId, Pattern};

use crate::config::DetectorConf;
use crate::sink::{Record, Writer};

/// Default supervisor: remembers the series it owns and announces each new
/// one on the output sink. Detectors are carried for the analysis stage.
pub struct SeriesSupervisor {
    pattern: Pattern,
    detectors: Vec<DetectorConf>,
    writer: Arc<dyn Writer>,
    series: DashSet<MetricId>,
}

impl SeriesSupervisor {
    pub fn new(pattern: Pattern, detectors: Vec<DetectorConf>, writer: Arc<dyn Writer>) -> Self {
        Self {
            pattern,
            detectors,
            writer,
            series: DashSet::new(),
        }
    }

    pub fn detectors(&self) -> &[DetectorConf] {
        &self.detectors
    }

    pub fn is_tracking(&self, id: &MetricId) -> bool {
        self.series.contains(id)
    }

    pub fn tracked_count(&self) -> usize {
        self.series.len()
    }
}

impl super::Supervisor for SeriesSupervisor {
    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn track_new(&self, id: &MetricId) {
        if !self.series.insert(id.clone()) {
            return;
        }

        let record = Record::SeriesTracked {
            metric: id.clone(),
            pattern: self.pattern.as_str().to_string(),
        };
        if let Err(e) = self.writer.write(&record) {
            tracing::warn!(metric = %id, pattern = %self.pattern, error = %e, "sink write failed");
        }
    }
}
