//! Registry-of-registries keyed by entity type
//!
//! A `RegistrySet` holds at most one `Registry<T>` per entity type `T`,
//! created on first request. Applications that prefer explicit context
//! build their own set and pass it around; `Registry::<T>::instance()`
//! goes through the process-wide set returned by [`RegistrySet::global`].
//!
//! Registries are never removed from a set, so a handle obtained once stays
//! the registry for that type for the set's lifetime.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::info;

use keel_core::{entity_name, Entity};

use super::Registry;
use crate::config::SyncConfig;

/// Process-wide registry set backing `Registry::instance`
static GLOBAL_REGISTRIES: Lazy<RegistrySet> = Lazy::new(RegistrySet::new);

/// One lazily created registry per entity type
pub struct RegistrySet {
    registries: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    initial_capacity: usize,
}

impl RegistrySet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self {
            registries: DashMap::new(),
            initial_capacity: 0,
        }
    }

    /// Create a new empty set whose registries are pre-sized per `config`
    pub fn with_config(config: &SyncConfig) -> Self {
        Self {
            registries: DashMap::new(),
            initial_capacity: config.initial_capacity,
        }
    }

    /// The process-wide set
    pub fn global() -> &'static RegistrySet {
        &GLOBAL_REGISTRIES
    }

    /// The registry for `T`, created on first call
    pub fn registry<T: Entity>(&self) -> Arc<Registry<T>> {
        let type_id = TypeId::of::<T>();

        // Use entry API for atomic get-or-insert
        let slot = self
            .registries
            .entry(type_id)
            .or_insert_with(|| {
                info!(
                    entity = entity_name::<T>(),
                    capacity = self.initial_capacity,
                    "Created entity registry"
                );
                Arc::new(Registry::<T>::with_capacity(self.initial_capacity))
                    as Arc<dyn Any + Send + Sync>
            })
            .value()
            .clone();

        // The TypeId key guarantees the slot holds a Registry<T>
        slot.downcast::<Registry<T>>().unwrap_or_else(|_| {
            unreachable!("registry slot for {} holds another type", entity_name::<T>())
        })
    }

    /// Check if a registry for `T` has been created
    pub fn contains<T: Entity>(&self) -> bool {
        self.registries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registries created so far
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Check if no registry has been created yet
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}

impl Default for RegistrySet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistrySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrySet")
            .field("registry_count", &self.registries.len())
            .field("initial_capacity", &self.initial_capacity)
            .finish()
    }
}
