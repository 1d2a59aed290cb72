use std::sync::Arc;

use morgoth_core::error::Result;
use morgoth_core::{MetricId, Pattern};

use crate::config::MetricConf;
use crate::obs::{DispatchMetrics, ObservePath};
use crate::sink::Writer;
use crate::supervisor::{series_factory, Registry, SupervisorFactory};

use super::IdentifierSet;

/// Routes newly observed metric ids to their owning supervisor.
///
/// Per id: `Unknown -> Resolving -> Owned(slot) | Unmonitored`. Unmonitored
/// ids are not remembered and are re-resolved on every observation.
///
/// Everything is owned by the instance; several managers can coexist.
pub struct Manager {
    ids: IdentifierSet,
    registry: Registry,
    metrics: DispatchMetrics,
}

impl Manager {
    /// Build a manager with the built-in `SeriesSupervisor` for every definition.
    pub fn new(confs: &[MetricConf], writer: Arc<dyn Writer>) -> Result<Self> {
        Self::with_factory(confs, writer, &series_factory)
    }

    /// Build a manager whose supervisors come from `factory`.
    pub fn with_factory(
        confs: &[MetricConf],
        writer: Arc<dyn Writer>,
        factory: &SupervisorFactory,
    ) -> Result<Self> {
        let registry = Registry::from_confs(confs, writer, factory)?;
        tracing::info!(supervisors = registry.len(), "metric manager ready");
        Ok(Self::from_registry(registry))
    }

    pub fn from_registry(registry: Registry) -> Self {
        Self {
            ids: IdentifierSet::new(),
            registry,
            metrics: DispatchMetrics::default(),
        }
    }

    /// Feed one metric sample's id. Never fails from the caller's view.
    pub fn observe(&self, id: &MetricId) {
        self.observe_with(id.as_str(), || id.clone());
    }

    /// Like `observe`, but only allocates a `MetricId` on first sight.
    pub fn observe_str(&self, id: &str) {
        self.observe_with(id, || MetricId::from(id));
    }

    fn observe_with(&self, raw: &str, make_id: impl FnOnce() -> MetricId) {
        if self.ids.has(raw) {
            self.metrics.record(ObservePath::Known);
            return;
        }

        let id = make_id();
        let Some(slot) = self.registry.resolve(&id) else {
            self.metrics.record(ObservePath::Unmonitored);
            tracing::trace!(metric = %id, "no supervisor pattern matches");
            return;
        };
        let Some(supervisor) = self.registry.get(slot) else {
            tracing::error!(metric = %id, slot, "resolved slot has no supervisor");
            return;
        };

        let registered = self.ids.claim(&id, slot, || supervisor.track_new(&id));
        if registered {
            self.metrics.record(ObservePath::New);
            self.metrics
                .registered
                .inc(&[("pattern", supervisor.pattern().as_str())]);
            tracing::debug!(metric = %id, pattern = %supervisor.pattern(), "tracking new metric");
        } else {
            // Lost the first-sight race; the winner owns registration.
            self.metrics.record(ObservePath::Known);
        }
    }

    /// Pattern of the supervisor that owns `id`, if it has been routed.
    pub fn owner(&self, id: &MetricId) -> Option<&Pattern> {
        self.ids
            .owner(id)
            .and_then(|slot| self.registry.all_patterns().get(slot))
    }

    pub fn is_known(&self, id: &MetricId) -> bool {
        self.ids.has(id)
    }

    pub fn known_count(&self) -> usize {
        self.ids.len()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Prometheus text for the dispatcher counters plus set/registry sizes.
    pub fn render_metrics(&self) -> String {
        self.metrics.render(&[
            ("morgoth_known_series", self.known_count() as u64),
            ("morgoth_supervisors", self.registry.len() as u64),
        ])
    }
}
