//! Secondary indices for entity types
//!
//! A registry only answers lookups by runtime key. Entity types that need
//! other access paths (all accounts of an owner, all sessions of a user)
//! keep a `SecondaryIndex` and maintain it from `add_index` / `del_index`.

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::hash::Hash;

/// Secondary index: attribute → runtime keys
///
/// Thread-safe one-to-many mapping. Empty sets are dropped so the index
/// does not accumulate stale attributes.
pub struct SecondaryIndex<I, K> {
    index: RwLock<FxHashMap<I, FxHashSet<K>>>,
}

impl<I, K> SecondaryIndex<I, K>
where
    I: Eq + Hash,
    K: Eq + Hash + Clone,
{
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            index: RwLock::new(FxHashMap::default()),
        }
    }

    /// Add key under attribute
    ///
    /// Returns false if the key was already indexed under this attribute.
    pub fn insert(&self, attr: I, key: K) -> bool {
        self.index.write().entry(attr).or_default().insert(key)
    }

    /// Remove key from attribute
    ///
    /// Returns false if the key was not indexed under this attribute.
    pub fn remove(&self, attr: &I, key: &K) -> bool {
        let mut index = self.index.write();
        let Some(keys) = index.get_mut(attr) else {
            return false;
        };
        let removed = keys.remove(key);
        if keys.is_empty() {
            index.remove(attr);
        }
        removed
    }

    /// All keys indexed under an attribute
    pub fn get(&self, attr: &I) -> Vec<K> {
        self.index
            .read()
            .get(attr)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Check whether a key is indexed under an attribute
    pub fn contains(&self, attr: &I, key: &K) -> bool {
        self.index
            .read()
            .get(attr)
            .is_some_and(|keys| keys.contains(key))
    }

    /// Number of distinct attributes
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }
}

impl<I, K> Default for SecondaryIndex<I, K>
where
    I: Eq + Hash,
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, K> fmt::Debug for SecondaryIndex<I, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondaryIndex")
            .field("attributes", &self.index.read().len())
            .finish()
    }
}
