//! Write-through pathways
//!
//! A `Synchronizer<T>` runs the create/update/delete pathways of one entity
//! type against its registry, calling persistence hooks in a fixed order:
//!
//! | Pathway | Order |
//! |---------|-------|
//! | create  | collision check → `db_insert` → `cache_insert` → `add_index` → registry add |
//! | update  | membership + key check → `db_update` → `cache_update` |
//! | delete  | `cache_remove` → `db_delete` → `del_index` → registry del |
//! | adopt   | collision check → `add_index` → registry add |
//! | evict   | `del_index` → registry del |
//!
//! The cache is never written before the store accepts the record, and an
//! entity leaves the registry only after both the cache and the store have
//! dropped it.
//!
//! Each pathway holds the registry lock for its whole duration, so pathways
//! on the same entity type are linearized. Hooks run on the calling thread
//! and may re-enter the registry.
//!
//! A failing step stops the pathway and is reported with its [`Stage`].
//! Steps that already succeeded are not rolled back and nothing is retried;
//! compensation policy belongs to the caller.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use keel_core::{entity_name, Entity, HookResult};

use crate::config::SyncConfig;
use crate::error::{Stage, SyncError, SyncResult};
use crate::registry::Registry;

/// Write-through driver for one entity type
pub struct Synchronizer<T: Entity> {
    registry: Arc<Registry<T>>,
    config: SyncConfig,
}

impl<T: Entity> Synchronizer<T> {
    /// Bind a synchronizer to `registry`
    pub fn new(registry: Arc<Registry<T>>, config: SyncConfig) -> Self {
        Self { registry, config }
    }

    /// Bind a synchronizer to the process-wide registry for `T`
    pub fn global(config: SyncConfig) -> Self {
        Self::new(Registry::instance(), config)
    }

    /// The registry this synchronizer maintains
    pub fn registry(&self) -> &Arc<Registry<T>> {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Registered handle under `key`
    pub fn get(&self, key: &T::Key) -> Option<Arc<T>> {
        self.registry.get(key)
    }

    /// Persist and register a new entity
    ///
    /// # Errors
    ///
    /// - `Collision` if an entity is already registered under `entity.key()`;
    ///   no hook runs.
    /// - `Hook` with the failing stage. A failed `db_insert` means neither
    ///   the cache nor the indices were touched. The entity is registered
    ///   only if every step succeeded.
    pub fn create(&self, entity: Arc<T>) -> SyncResult<Arc<T>> {
        let key = entity.key();
        self.registry.with_lock(|| {
            self.ensure_vacant(&key)?;

            self.run_hook(Stage::DbInsert, &key, || entity.db_insert())?;
            if self.config.write_cache {
                self.run_hook(Stage::CacheInsert, &key, || entity.cache_insert())?;
            }
            self.run_hook(Stage::AddIndex, &key, || entity.add_index())?;

            // a hook may have re-entered and claimed the key
            if !self.registry.add(key.clone(), Arc::clone(&entity)) {
                return Err(self.collision(&key));
            }
            debug!(entity = entity_name::<T>(), key = ?key, "Created entity");
            Ok(entity)
        })
    }

    /// Write the current state of a registered entity through to the store
    /// and cache
    ///
    /// # Errors
    ///
    /// - `NotRegistered` if nothing is registered under `key`.
    /// - `KeyChanged` if the entity's `key()` drifted from `key`; it must be
    ///   deleted and re-created under its new key instead.
    /// - `Hook` with the failing stage.
    pub fn update(&self, key: &T::Key) -> SyncResult<Arc<T>> {
        self.registry.with_lock(|| {
            let entity = self.registered(key)?;
            self.write_update(key, &entity)?;
            Ok(entity)
        })
    }

    /// Mutate a registered entity, then write it through
    ///
    /// `mutate` runs under the registry lock, so no other pathway on this
    /// entity type interleaves between the mutation and the write.
    ///
    /// # Errors
    ///
    /// Same as [`Synchronizer::update`]. On `NotRegistered`, `mutate` does
    /// not run.
    pub fn update_with<F>(&self, key: &T::Key, mutate: F) -> SyncResult<Arc<T>>
    where
        F: FnOnce(&T),
    {
        self.registry.with_lock(|| {
            let entity = self.registered(key)?;
            mutate(entity.as_ref());
            self.write_update(key, &entity)?;
            Ok(entity)
        })
    }

    /// Remove an entity from the cache, the store and the registry
    ///
    /// Returns `Ok(None)` if nothing is registered under `key`.
    ///
    /// # Errors
    ///
    /// `Hook` with the failing stage. The entity stays registered unless
    /// every step succeeded.
    pub fn delete(&self, key: &T::Key) -> SyncResult<Option<Arc<T>>> {
        self.registry.with_lock(|| {
            let Some(entity) = self.registry.get(key) else {
                debug!(entity = entity_name::<T>(), key = ?key, "Delete of unregistered key");
                return Ok(None);
            };

            if self.config.write_cache {
                self.run_hook(Stage::CacheRemove, key, || entity.cache_remove())?;
            }
            self.run_hook(Stage::DbDelete, key, || entity.db_delete())?;
            self.run_hook(Stage::DelIndex, key, || entity.del_index())?;

            self.registry.del(key);
            debug!(entity = entity_name::<T>(), key = ?key, "Deleted entity");
            Ok(Some(entity))
        })
    }

    /// Register an entity that already exists in the store
    ///
    /// For loaders that hydrate records after a registry miss: indices are
    /// maintained, the store and cache are not written.
    ///
    /// # Errors
    ///
    /// `Collision` if the key is taken, `Hook` if `add_index` fails.
    pub fn adopt(&self, entity: Arc<T>) -> SyncResult<Arc<T>> {
        let key = entity.key();
        self.registry.with_lock(|| {
            self.ensure_vacant(&key)?;
            self.run_hook(Stage::AddIndex, &key, || entity.add_index())?;
            if !self.registry.add(key.clone(), Arc::clone(&entity)) {
                return Err(self.collision(&key));
            }
            debug!(entity = entity_name::<T>(), key = ?key, "Adopted entity");
            Ok(entity)
        })
    }

    /// Drop an entity from memory, leaving store and cache untouched
    ///
    /// Returns `Ok(None)` if nothing is registered under `key`.
    ///
    /// # Errors
    ///
    /// `Hook` if `del_index` fails; the entity then stays registered.
    pub fn evict(&self, key: &T::Key) -> SyncResult<Option<Arc<T>>> {
        self.registry.with_lock(|| {
            let Some(entity) = self.registry.get(key) else {
                return Ok(None);
            };
            self.run_hook(Stage::DelIndex, key, || entity.del_index())?;
            self.registry.del(key);
            debug!(entity = entity_name::<T>(), key = ?key, "Evicted entity");
            Ok(Some(entity))
        })
    }

    fn write_update(&self, key: &T::Key, entity: &T) -> SyncResult<()> {
        let current = entity.key();
        if &current != key {
            warn!(
                entity = entity_name::<T>(),
                registered = ?key,
                current = ?current,
                "Rejected update: key changed while registered"
            );
            return Err(SyncError::KeyChanged {
                entity: entity_name::<T>(),
                registered: format!("{:?}", key),
                current: format!("{:?}", current),
            });
        }

        self.run_hook(Stage::DbUpdate, key, || entity.db_update())?;
        if self.config.write_cache {
            self.run_hook(Stage::CacheUpdate, key, || entity.cache_update())?;
        }
        debug!(entity = entity_name::<T>(), key = ?key, "Updated entity");
        Ok(())
    }

    fn registered(&self, key: &T::Key) -> SyncResult<Arc<T>> {
        self.registry.get(key).ok_or_else(|| SyncError::NotRegistered {
            entity: entity_name::<T>(),
            key: format!("{:?}", key),
        })
    }

    fn ensure_vacant(&self, key: &T::Key) -> SyncResult<()> {
        if self.registry.contains(key) {
            return Err(self.collision(key));
        }
        Ok(())
    }

    fn collision(&self, key: &T::Key) -> SyncError {
        debug!(entity = entity_name::<T>(), key = ?key, "Key already registered");
        SyncError::Collision {
            entity: entity_name::<T>(),
            key: format!("{:?}", key),
        }
    }

    fn run_hook(
        &self,
        stage: Stage,
        key: &T::Key,
        hook: impl FnOnce() -> HookResult,
    ) -> SyncResult<()> {
        let started = Instant::now();
        let result = hook();
        let elapsed = started.elapsed();

        if let Some(threshold) = self.config.slow_hook_threshold() {
            if elapsed >= threshold {
                warn!(
                    entity = entity_name::<T>(),
                    key = ?key,
                    stage = %stage,
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "Slow persistence hook"
                );
            }
        }

        result.map_err(|source| {
            warn!(
                entity = entity_name::<T>(),
                key = ?key,
                stage = %stage,
                error = %source,
                "Persistence hook failed"
            );
            SyncError::Hook {
                entity: entity_name::<T>(),
                key: format!("{:?}", key),
                stage,
                source,
            }
        })
    }
}

impl<T: Entity> std::fmt::Debug for Synchronizer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("entity", &entity_name::<T>())
            .field("registered", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}
