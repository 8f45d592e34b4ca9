//! Per-type entity registry
//!
//! A `Registry<T>` maps runtime keys to shared `Arc<T>` handles. The map is
//! the only shared mutable structure in the engine and is never handed
//! out by reference: callers receive cloned handles.
//!
//! ## Locking
//!
//! Every operation takes one coarse re-entrant lock per registry. Registries
//! for different entity types never contend. The lock is re-entrant so a
//! pathway holding it through [`Registry::with_lock`] can run persistence
//! hooks that call back into `get`/`add`/`del` on the same thread.
//!
//! The map itself sits in a `RefCell` behind the lock, and no borrow of it
//! is ever held across a call into entity code (hooks, `Drop` impls).

mod set;

pub use set::RegistrySet;

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use keel_core::{entity_name, Entity};

type Entries<T> = FxHashMap<<T as keel_core::Identity>::Key, Arc<T>>;

/// Thread-safe keyed collection of live entities of one type
pub struct Registry<T: Entity> {
    entries: ReentrantMutex<RefCell<Entries<T>>>,
}

impl<T: Entity> Registry<T> {
    /// Create a new empty registry
    ///
    /// Most callers want [`Registry::instance`] or a [`RegistrySet`]; a
    /// standalone registry is useful for scoped or test setups.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new empty registry with room for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: ReentrantMutex::new(RefCell::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            ))),
        }
    }

    /// The process-wide registry for `T`
    ///
    /// Created lazily on first call; every later call returns the same
    /// registry until the process exits.
    pub fn instance() -> Arc<Self> {
        RegistrySet::global().registry::<T>()
    }

    /// Register `entity` under `key`
    ///
    /// Returns false without touching the registry if `key` is already
    /// present. An existing entry is never overwritten.
    pub fn add(&self, key: T::Key, entity: Arc<T>) -> bool {
        let guard = self.entries.lock();
        let (key, rejected) = match guard.borrow_mut().entry(key) {
            Entry::Occupied(slot) => (slot.key().clone(), Some(entity)),
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(entity);
                (key, None)
            }
        };

        // logging and the rejected handle's release happen outside the borrow
        match rejected {
            Some(_) => {
                trace!(entity = entity_name::<T>(), key = ?key, "add rejected: key present");
                false
            }
            None => {
                trace!(entity = entity_name::<T>(), key = ?key, "add");
                true
            }
        }
    }

    /// Handle registered under `key`, if any
    pub fn get(&self, key: &T::Key) -> Option<Arc<T>> {
        let guard = self.entries.lock();
        let entries = guard.borrow();
        entries.get(key).cloned()
    }

    /// Remove the entry under `key`
    ///
    /// No-op on a missing key. Returns the removed handle; the entity itself
    /// lives on while any other holder keeps a handle.
    pub fn del(&self, key: &T::Key) -> Option<Arc<T>> {
        let guard = self.entries.lock();
        let removed = guard.borrow_mut().remove(key);
        if removed.is_some() {
            trace!(entity = entity_name::<T>(), key = ?key, "del");
        }
        removed
    }

    /// Check if `key` is registered
    pub fn contains(&self, key: &T::Key) -> bool {
        let guard = self.entries.lock();
        let entries = guard.borrow();
        entries.contains_key(key)
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        let guard = self.entries.lock();
        let entries = guard.borrow();
        entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all registered keys
    pub fn keys(&self) -> Vec<T::Key> {
        let guard = self.entries.lock();
        let entries = guard.borrow();
        entries.keys().cloned().collect()
    }

    /// Snapshot of all registered handles
    pub fn handles(&self) -> Vec<Arc<T>> {
        let guard = self.entries.lock();
        let entries = guard.borrow();
        entries.values().cloned().collect()
    }

    /// Drop every entry
    ///
    /// Does not run any hooks. Handles are released after the lock is.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *self.entries.lock().borrow_mut());
        drop(drained);
    }

    /// Run `f` while holding this registry's lock
    ///
    /// Other threads block on every registry operation until `f` returns;
    /// the current thread may still call `add`/`get`/`del` from inside `f`.
    pub fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.entries.lock();
        f()
    }
}

impl<T: Entity> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entity", &entity_name::<T>())
            .field("len", &self.len())
            .finish()
    }
}
