//! MemoryCache: in-process cache backend
//!
//! Upsert semantics: `insert` and `update` both write the entry, `remove`
//! of a missing entry succeeds. A cache is allowed to be behind the store,
//! never ahead of it, so it does not police existence the way the store does.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use keel_core::{BackendError, Cache, DbForm};

/// In-memory cache keyed by `cache_key`
#[derive(Debug)]
pub struct MemoryCache<K> {
    entries: RwLock<FxHashMap<K, DbForm>>,
    available: AtomicBool,
}

impl<K> MemoryCache<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create a new empty, available cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability
    ///
    /// While unavailable every write fails with `BackendError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Current entry at `key`
    pub fn get(&self, key: &K) -> Option<DbForm> {
        self.entries.read().get(key).cloned()
    }

    /// Check if an entry exists at `key`
    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn upsert(&self, key: &K, entry: DbForm) -> Result<(), BackendError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("memory cache offline".to_string()));
        }
        trace!(key = ?key, bytes = entry.len(), "cache write");
        self.entries.write().insert(key.clone(), entry);
        Ok(())
    }
}

impl<K> Default for MemoryCache<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Cache<K> for MemoryCache<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
{
    fn insert(&self, key: &K, entry: DbForm) -> Result<(), BackendError> {
        self.upsert(key, entry)
    }

    fn update(&self, key: &K, entry: DbForm) -> Result<(), BackendError> {
        self.upsert(key, entry)
    }

    fn remove(&self, key: &K) -> Result<(), BackendError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("memory cache offline".to_string()));
        }
        trace!(key = ?key, "cache remove");
        self.entries.write().remove(key);
        Ok(())
    }
}
