//! Ordered, immutable pattern-to-supervisor table.

use std::collections::HashSet;
use std::sync::Arc;

use morgoth_core::error::{MorgothError, Result};
use morgoth_core::{resolve, MetricId, Pattern};

use super::{Supervisor, SupervisorFactory};
use crate::config::MetricConf;
use crate::sink::Writer;

/// Ordered `(pattern, supervisor)` table.
///
/// Built once at startup and never mutated, so lookups take no locks. Slot
/// order is construction order, which is also match precedence.
pub struct Registry {
    patterns: Vec<Pattern>,
    supervisors: Vec<Arc<dyn Supervisor>>,
}

impl Registry {
    /// Fails with `DuplicatePattern` if two supervisors declare byte-identical
    /// patterns, since ownership would be ambiguous.
    pub fn new(supervisors: Vec<Arc<dyn Supervisor>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(supervisors.len());
        for s in &supervisors {
            if !seen.insert(s.pattern().as_str()) {
                return Err(MorgothError::DuplicatePattern(s.pattern().to_string()));
            }
        }

        let patterns = supervisors.iter().map(|s| s.pattern().clone()).collect();
        Ok(Self {
            patterns,
            supervisors,
        })
    }

    /// Compile every definition and build its supervisor, in config order.
    pub fn from_confs(
        confs: &[MetricConf],
        writer: Arc<dyn Writer>,
        factory: &SupervisorFactory,
    ) -> Result<Self> {
        let mut supervisors = Vec::with_capacity(confs.len());
        for conf in confs {
            let pattern = Pattern::parse(&conf.pattern)?;
            supervisors.push(factory(pattern, conf, Arc::clone(&writer)));
        }
        Self::new(supervisors)
    }

    /// Patterns in precedence order.
    pub fn all_patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Slot of the first pattern matching `id`.
    pub fn resolve(&self, id: &MetricId) -> Option<usize> {
        resolve(id, &self.patterns)
    }

    /// Supervisor in slot `idx` (as returned by `resolve`).
    pub fn get(&self, idx: usize) -> Option<&Arc<dyn Supervisor>> {
        self.supervisors.get(idx)
    }

    /// Supervisor declared with exactly this pattern text.
    pub fn lookup(&self, pattern: &str) -> Option<&Arc<dyn Supervisor>> {
        self.patterns
            .iter()
            .position(|p| p.as_str() == pattern)
            .and_then(|idx| self.supervisors.get(idx))
    }

    pub fn len(&self) -> usize {
        self.supervisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supervisors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::sink::NullWriter;
    use crate::supervisor::series_factory;

    fn confs(patterns: &[&str]) -> Vec<MetricConf> {
        patterns.iter().map(|p| MetricConf::with_pattern(*p)).collect()
    }

    #[test]
    fn keeps_construction_order() {
        let reg = Registry::from_confs(
            &confs(&["app.*.errors", "app.web.errors", "db.latency"]),
            Arc::new(NullWriter),
            &series_factory,
        )
        .unwrap();

        let order: Vec<&str> = reg.all_patterns().iter().map(|p| p.as_str()).collect();
        assert_eq!(order, ["app.*.errors", "app.web.errors", "db.latency"]);
        assert_eq!(reg.len(), 3);

        let idx = reg.resolve(&"app.web.errors".into()).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(reg.get(idx).unwrap().pattern().as_str(), "app.*.errors");
        assert_eq!(reg.lookup("db.latency").unwrap().pattern().as_str(), "db.latency");
        assert!(reg.lookup("db.*").is_none());
    }

    #[test]
    fn duplicate_pattern_is_fatal() {
        let err = Registry::from_confs(
            &confs(&["db.*", "app.**", "db.*"]),
            Arc::new(NullWriter),
            &series_factory,
        )
        .err()
        .unwrap();
        assert_eq!(err.kind().as_str(), "DUPLICATE_PATTERN");
    }

    #[test]
    fn structurally_equal_but_textually_different_is_allowed() {
        // `a.**.**.b` and `a.**.b` match the same ids but are not byte-identical.
        let reg = Registry::from_confs(
            &confs(&["a.**.**.b", "a.**.b"]),
            Arc::new(NullWriter),
            &series_factory,
        )
        .unwrap();
        assert_eq!(reg.resolve(&"a.x.b".into()), Some(0));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Registry::from_confs(&confs(&["app..x"]), Arc::new(NullWriter), &series_factory)
            .err()
            .unwrap();
        assert_eq!(err.kind().as_str(), "INVALID_PATTERN");
    }
}
