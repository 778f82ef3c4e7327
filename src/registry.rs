//! Named stores
//!
//! A [`Registry`] owns any number of independent indexes keyed by store name.
//! Each index sits behind its own mutex, held across a whole `add`, `remove` or
//! `lookup`, so operations on one store are serialised while different stores
//! proceed in parallel. The name table is only locked long enough to resolve a
//! name to its index.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::config::RangeIndexConfig;
use crate::core::{Coord, MemberSet, Span};
use crate::error::{Error, Result};
use crate::interval::RangeIndex;
use crate::policy::Policy;

/// Shared handle to one store's index
pub type SharedIndex = Arc<Mutex<RangeIndex>>;

/// One named store
///
/// The policy is kept next to the handle so it can be checked without taking
/// the store's own lock.
struct Slot {
    policy: Policy,
    index: SharedIndex,
}

impl Slot {
    fn create(config: &RangeIndexConfig) -> Self {
        Self {
            policy: config.policy,
            index: Arc::new(Mutex::new(RangeIndex::from_config(config))),
        }
    }
}

/// Collection of named, independently locked indexes
pub struct Registry {
    /// Store name -> index
    stores: RwLock<AHashMap<String, Slot>>,
    /// Settings for stores created on demand
    config: RangeIndexConfig,
}

impl Registry {
    /// Create an empty registry with the default configuration
    pub fn new() -> Self {
        Self::with_config(RangeIndexConfig::default())
    }

    /// Create an empty registry with the given configuration
    pub fn with_config(config: RangeIndexConfig) -> Self {
        Self {
            stores: RwLock::new(AHashMap::with_capacity(config.initial_stores)),
            config,
        }
    }

    /// Configuration used for stores created on demand
    pub fn config(&self) -> &RangeIndexConfig {
        &self.config
    }

    /// Number of stores
    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    /// Whether the registry holds no stores
    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }

    /// Names of all stores, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Handle to an existing store
    pub fn get(&self, name: &str) -> Option<SharedIndex> {
        self.stores.read().get(name).map(|slot| slot.index.clone())
    }

    /// Handle to a store, creating it with the configured policy if absent
    pub fn open(&self, name: &str) -> SharedIndex {
        if let Some(index) = self.get(name) {
            return index;
        }
        let mut stores = self.stores.write();
        stores
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(store = name, policy = %self.config.policy, "creating store");
                Slot::create(&self.config)
            })
            .index
            .clone()
    }

    /// Handle to a store that must use `policy`
    ///
    /// Creates the store if absent. An existing store keeps the policy it was
    /// created with, so asking for a different one is an error.
    pub fn open_with_policy(&self, name: &str, policy: Policy) -> Result<SharedIndex> {
        let mut stores = self.stores.write();
        if let Some(slot) = stores.get(name) {
            if slot.policy != policy {
                warn!(store = name, existing = %slot.policy, requested = %policy, "policy mismatch");
                return Err(Error::PolicyMismatch {
                    store: name.to_string(),
                    existing: slot.policy,
                    requested: policy,
                });
            }
            return Ok(slot.index.clone());
        }
        debug!(store = name, %policy, "creating store");
        let slot = Slot::create(&RangeIndexConfig {
            policy,
            ..self.config.clone()
        });
        let index = slot.index.clone();
        stores.insert(name.to_string(), slot);
        Ok(index)
    }

    /// Tear down a store, returning `true` if it existed
    ///
    /// Holders of an outstanding handle keep a usable, detached index.
    pub fn drop_store(&self, name: &str) -> bool {
        let removed = self.stores.write().remove(name).is_some();
        if removed {
            debug!(store = name, "dropped store");
        }
        removed
    }

    /// Run `f` inside the store's exclusive section, creating the store if absent
    pub fn with_store<R>(&self, name: &str, f: impl FnOnce(&mut RangeIndex) -> R) -> R {
        let index = self.open(name);
        let mut guard = index.lock();
        f(&mut guard)
    }

    /// Like [`Registry::with_store`], giving up after `timeout`
    pub fn with_store_timeout<R>(
        &self,
        name: &str,
        timeout: Duration,
        f: impl FnOnce(&mut RangeIndex) -> R,
    ) -> Result<R> {
        let index = self.open(name);
        let Some(mut guard) = index.try_lock_for(timeout) else {
            warn!(store = name, ?timeout, "timed out waiting for store");
            return Err(Error::LockTimeout {
                store: name.to_string(),
                waited: timeout,
            });
        };
        Ok(f(&mut guard))
    }

    /// Add `member` over `[min, max]` in store `name`
    pub fn add(&self, name: &str, member: &str, min: f64, max: f64) -> Result<()> {
        let span = Span::new(min, max)?;
        self.add_span(name, member, span);
        Ok(())
    }

    /// Add `member` over a validated span in store `name`
    pub fn add_span(&self, name: &str, member: &str, span: Span) {
        self.with_store(name, |index| index.add_span(member, span));
    }

    /// Remove `member` from `[min, max]` in store `name`
    pub fn remove(&self, name: &str, member: &str, min: f64, max: f64) -> Result<()> {
        let span = Span::new(min, max)?;
        self.remove_span(name, member, span);
        Ok(())
    }

    /// Remove `member` from a validated span in store `name`
    ///
    /// Removing from a store that does not exist is a no-op.
    pub fn remove_span(&self, name: &str, member: &str, span: Span) {
        if let Some(index) = self.get(name) {
            index.lock().remove_span(member, span);
        }
    }

    /// Members of store `name` covering `value`
    pub fn lookup(&self, name: &str, value: f64) -> Result<MemberSet> {
        let at = Coord::new(value)?;
        Ok(self.lookup_at(name, at))
    }

    /// Members of store `name` covering a validated coordinate
    ///
    /// A store that does not exist covers nothing.
    pub fn lookup_at(&self, name: &str, at: Coord) -> MemberSet {
        match self.get(name) {
            Some(index) => index.lock().lookup_at(at),
            None => MemberSet::new(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("stores", &self.names())
            .field("config", &self.config)
            .finish()
    }
}
