//! Collaborator interfaces for persistence hooks
//!
//! The backing store driver and the cache backend are external services.
//! Hooks reach them only through these narrow traits, so an entity type can
//! be tested against the in-memory implementations and deployed against a
//! real driver without changing its hook code.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync).

use std::sync::Arc;

use crate::error::BackendError;
use crate::types::DbForm;

/// Backing store addressed by `db_key`
pub trait Store<K>: Send + Sync {
    /// Insert a new record
    ///
    /// # Errors
    ///
    /// Returns an error if a record already exists at `key` or the store
    /// cannot apply the write.
    fn insert(&self, key: &K, record: DbForm) -> Result<(), BackendError>;

    /// Overwrite an existing record
    ///
    /// # Errors
    ///
    /// Returns an error if no record exists at `key` or the store cannot
    /// apply the write.
    fn update(&self, key: &K, record: DbForm) -> Result<(), BackendError>;

    /// Delete the record at `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot apply the delete.
    fn delete(&self, key: &K) -> Result<(), BackendError>;
}

/// Cache backend addressed by `cache_key`
pub trait Cache<K>: Send + Sync {
    /// Insert an entry
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot apply the write.
    fn insert(&self, key: &K, entry: DbForm) -> Result<(), BackendError>;

    /// Overwrite an entry
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot apply the write.
    fn update(&self, key: &K, entry: DbForm) -> Result<(), BackendError>;

    /// Remove the entry at `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot apply the removal.
    fn remove(&self, key: &K) -> Result<(), BackendError>;
}

impl<K, S: Store<K> + ?Sized> Store<K> for Arc<S> {
    fn insert(&self, key: &K, record: DbForm) -> Result<(), BackendError> {
        (**self).insert(key, record)
    }

    fn update(&self, key: &K, record: DbForm) -> Result<(), BackendError> {
        (**self).update(key, record)
    }

    fn delete(&self, key: &K) -> Result<(), BackendError> {
        (**self).delete(key)
    }
}

impl<K, C: Cache<K> + ?Sized> Cache<K> for Arc<C> {
    fn insert(&self, key: &K, entry: DbForm) -> Result<(), BackendError> {
        (**self).insert(key, entry)
    }

    fn update(&self, key: &K, entry: DbForm) -> Result<(), BackendError> {
        (**self).update(key, entry)
    }

    fn remove(&self, key: &K) -> Result<(), BackendError> {
        (**self).remove(key)
    }
}
