//! Interval index
//!
//! [`RangeIndex`] binds a breakpoint store to a boundary policy and exposes the
//! three operations: `add`, `remove` and `lookup`. Arguments are validated
//! before the store is touched.

pub mod delete;
pub mod insert;
pub mod query;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::config::RangeIndexConfig;
use crate::core::{Coord, MemberSet, Snapshot, Span};
use crate::error::Result;
use crate::policy::Policy;
use crate::storage::{BreakpointStore, MemoryStore};

/// Interval-stabbing index over one breakpoint store
#[derive(Debug)]
pub struct RangeIndex<S = MemoryStore> {
    /// Ordered breakpoints
    store: S,
    /// Boundary policy, fixed at construction
    policy: Policy,
    /// Whether `remove` prunes boundary breakpoints
    prune_on_remove: bool,
    /// Operation counters
    counters: Counters,
}

#[derive(Debug, Default)]
struct Counters {
    adds: AtomicU64,
    removes: AtomicU64,
    lookups: AtomicU64,
    created: AtomicU64,
    pruned: AtomicU64,
}

impl RangeIndex<MemoryStore> {
    /// Create an empty in-memory index
    pub fn new(policy: Policy) -> Self {
        Self::with_store(MemoryStore::new(), policy)
    }

    /// Create an empty in-memory index from a configuration
    pub fn from_config(config: &RangeIndexConfig) -> Self {
        let mut index = Self::new(config.policy);
        index.prune_on_remove = config.prune_on_remove;
        index
    }
}

impl<S: BreakpointStore> RangeIndex<S> {
    /// Wrap an existing store
    ///
    /// The store must already be consistent with `policy`.
    pub fn with_store(store: S, policy: Policy) -> Self {
        Self {
            store,
            policy,
            prune_on_remove: true,
            counters: Counters::default(),
        }
    }

    /// Boundary policy of this index
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of breakpoints
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the index holds no breakpoints
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Add `member` over `[min, max]` (or `[min, max)` for half-open stores)
    pub fn add(&mut self, member: &str, min: f64, max: f64) -> Result<()> {
        let span = Span::new(min, max)?;
        self.add_span(member, span);
        Ok(())
    }

    /// Add `member` over an already-validated span
    pub fn add_span(&mut self, member: &str, span: Span) {
        let member: Arc<str> = Arc::from(member);
        let outcome = insert::insert_range(&mut self.store, self.policy, &member, span);
        self.counters.adds.fetch_add(1, Ordering::Relaxed);
        self.counters
            .created
            .fetch_add(outcome.created as u64, Ordering::Relaxed);
        debug!(
            member = %member,
            min = %span.min,
            max = %span.max,
            created = outcome.created,
            extended = outcome.extended,
            "added range"
        );
    }

    /// Remove `member` from `[min, max]` (or `[min, max)` for half-open stores)
    pub fn remove(&mut self, member: &str, min: f64, max: f64) -> Result<()> {
        let span = Span::new(min, max)?;
        self.remove_span(member, span);
        Ok(())
    }

    /// Remove `member` from an already-validated span
    pub fn remove_span(&mut self, member: &str, span: Span) {
        let outcome =
            delete::delete_range(&mut self.store, self.policy, member, span, self.prune_on_remove);
        self.counters.removes.fetch_add(1, Ordering::Relaxed);
        self.counters
            .pruned
            .fetch_add(outcome.pruned as u64, Ordering::Relaxed);
        debug!(
            member = member,
            min = %span.min,
            max = %span.max,
            shrunk = outcome.shrunk,
            pruned = outcome.pruned,
            "removed range"
        );
    }

    /// Members covering `value`
    pub fn lookup(&self, value: f64) -> Result<MemberSet> {
        Ok(self.lookup_at(Coord::new(value)?))
    }

    /// Members covering an already-validated coordinate
    pub fn lookup_at(&self, at: Coord) -> MemberSet {
        self.counters.lookups.fetch_add(1, Ordering::Relaxed);
        query::stab(&self.store, self.policy, at)
    }

    /// Coordinates of every breakpoint, ascending
    pub fn breakpoints(&self) -> Vec<f64> {
        self.store.iter().map(|(c, _)| c.value()).collect()
    }

    /// Every breakpoint with its members
    pub fn snapshot(&self) -> Snapshot {
        self.store
            .iter()
            .map(|(c, members)| (c.value(), members.to_vec()))
            .collect()
    }

    /// Drop every breakpoint, keeping the policy
    pub fn clear(&mut self) {
        self.store.clear();
        debug!(policy = %self.policy, "cleared index");
    }

    /// Current statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            policy: self.policy,
            breakpoints: self.store.len(),
            adds: self.counters.adds.load(Ordering::Relaxed),
            removes: self.counters.removes.load(Ordering::Relaxed),
            lookups: self.counters.lookups.load(Ordering::Relaxed),
            created: self.counters.created.load(Ordering::Relaxed),
            pruned: self.counters.pruned.load(Ordering::Relaxed),
        }
    }
}

impl Default for RangeIndex<MemoryStore> {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

/// Statistics about an index
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexStats {
    /// Boundary policy
    pub policy: Policy,
    /// Breakpoints currently stored
    pub breakpoints: usize,
    /// Completed `add` calls
    pub adds: u64,
    /// Completed `remove` calls
    pub removes: u64,
    /// Completed `lookup` calls
    pub lookups: u64,
    /// Breakpoints created by `add`
    pub created: u64,
    /// Breakpoints pruned by `remove`
    pub pruned: u64,
}
