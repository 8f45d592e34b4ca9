//! MemoryStore: in-process backing store
//!
//! Implements the `Store` trait using:
//! - `FxHashMap<K, DbForm>` for record storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicBool` availability flag to simulate an unreachable store
//!
//! # Semantics
//!
//! - **insert** rejects a key that already has a record (unique rows)
//! - **update** rejects a key without a record
//! - **delete** is idempotent: deleting a missing record succeeds

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use keel_core::{BackendError, DbForm, Store};

/// In-memory backing store keyed by `db_key`
#[derive(Debug)]
pub struct MemoryStore<K> {
    records: RwLock<FxHashMap<K, DbForm>>,
    available: AtomicBool,
}

impl<K> MemoryStore<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create a new empty, available store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(FxHashMap::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability
    ///
    /// While unavailable every write fails with `BackendError::Unavailable`.
    /// Reads are unaffected so tests can inspect state during an outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Current record at `key`
    pub fn get(&self, key: &K) -> Option<DbForm> {
        self.records.read().get(key).cloned()
    }

    /// Check if a record exists at `key`
    pub fn contains(&self, key: &K) -> bool {
        self.records.read().contains_key(key)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Unavailable("memory store offline".to_string()))
        }
    }
}

impl<K> Default for MemoryStore<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Store<K> for MemoryStore<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
{
    fn insert(&self, key: &K, record: DbForm) -> Result<(), BackendError> {
        self.check_available()?;
        let mut records = self.records.write();
        if records.contains_key(key) {
            return Err(BackendError::Duplicate(format!("{:?}", key)));
        }
        trace!(key = ?key, bytes = record.len(), "store insert");
        records.insert(key.clone(), record);
        Ok(())
    }

    fn update(&self, key: &K, record: DbForm) -> Result<(), BackendError> {
        self.check_available()?;
        let mut records = self.records.write();
        match records.get_mut(key) {
            Some(slot) => {
                trace!(key = ?key, bytes = record.len(), "store update");
                *slot = record;
                Ok(())
            }
            None => Err(BackendError::Missing(format!("{:?}", key))),
        }
    }

    fn delete(&self, key: &K) -> Result<(), BackendError> {
        self.check_available()?;
        trace!(key = ?key, "store delete");
        self.records.write().remove(key);
        Ok(())
    }
}
