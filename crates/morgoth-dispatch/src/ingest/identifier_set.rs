//! Deduplicating membership store over routed metric ids.

use std::borrow::Borrow;
use std::hash::Hash;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use morgoth_core::MetricId;

/// Every metric id the manager has routed, with the registry slot that owns it.
///
/// Grows monotonically. Reads take a shard read lock only, so the common
/// "already known" check never serializes callers on a single lock.
#[derive(Default)]
pub struct IdentifierSet {
    ids: DashMap<MetricId, usize>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self { ids: DashMap::new() }
    }

    pub fn has<Q>(&self, id: &Q) -> bool
    where
        MetricId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.contains_key(id)
    }

    /// Record `id` as owned by `owner`. No-op if already present; the first
    /// owner is kept.
    pub fn add(&self, id: MetricId, owner: usize) {
        self.ids.entry(id).or_insert(owner);
    }

    /// Registry slot owning `id`, if routed.
    pub fn owner<Q>(&self, id: &Q) -> Option<usize>
    where
        MetricId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(id).map(|r| *r.value())
    }

    /// Insert `id` if absent, then run `register`. Returns whether it ran.
    ///
    /// The id is claimed under the entry's shard lock, and the lock is
    /// released before `register` runs, so a slow supervisor never stalls
    /// lookups of other ids. A racing caller for the same id sees the claim
    /// and treats the id as owned while registration is still in flight.
    pub fn claim<F: FnOnce()>(&self, id: &MetricId, owner: usize, register: F) -> bool {
        match self.ids.entry(id.clone()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(slot) => {
                slot.insert(owner);
            }
        }
        register();
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
