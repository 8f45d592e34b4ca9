//! Keel - Entity registry and write-through persistence
//!
//! Keel keeps exactly one live in-memory instance per entity key, shared by
//! every holder, and writes changes through to a durable store and an
//! optional cache in a fixed order.
//!
//! # Quick Start
//!
//! ```ignore
//! use keel::{Registry, SyncConfig, Synchronizer};
//!
//! // Process-wide registry for `Account`
//! let sync = Synchronizer::<Account>::global(SyncConfig::default());
//!
//! // db_insert -> cache_insert -> add_index -> registered
//! let acct = sync.create(Account::new(1, "ada"))?;
//!
//! // Any other holder sees the same instance
//! let same = Registry::<Account>::instance().get(&1).unwrap();
//! ```
//!
//! # Architecture
//!
//! - `keel-core`: entity contracts (`Identity`, `Serialization`,
//!   `PersistenceHooks`), codecs, collaborator traits and the factory
//! - `keel-storage`: in-memory `Store` and `Cache` implementations
//! - `keel-engine`: per-type registries and the write-through `Synchronizer`

pub use keel_core::{
    codec, entity_name, new_instance, BackendError, Cache, CodecError, DbForm, Entity, EntityId,
    Factory, HookError, HookResult, Identity, PersistenceHooks, PrefixedKey, SecondaryIndex,
    Serialization, Store, WireForm,
};
pub use keel_engine::{
    ConfigError, Registry, RegistrySet, Stage, SyncConfig, SyncError, SyncResult, Synchronizer,
    CONFIG_FILE_NAME,
};
pub use keel_storage::{MemoryCache, MemoryStore};
