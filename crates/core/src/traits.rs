//! Entity capability contracts
//!
//! Every entity type that participates in a registry implements the three
//! capability traits below and then opts in with [`Entity`]. A type missing
//! any key type or hook does not compile against the registry, so contract
//! violations never surface at runtime.
//!
//! ## Example
//!
//! ```rust,ignore
//! impl Identity for Account {
//!     type Key = u64;
//!     type DbKey = u64;
//!     type CacheKey = PrefixedKey;
//!
//!     fn key(&self) -> u64 { self.id }
//!     fn db_key(&self) -> u64 { self.id }
//!     fn cache_key(&self) -> PrefixedKey { PrefixedKey::new("account", self.id) }
//! }
//!
//! impl Serialization for Account {
//!     fn db_serialize(&self) -> Result<DbForm, CodecError> { codec::to_db_form(&self.row()) }
//!     fn io_serialize(&self) -> Result<WireForm, CodecError> { codec::to_wire_form(&self.view()) }
//! }
//!
//! impl PersistenceHooks for Account { /* eight hooks */ }
//!
//! impl Entity for Account {
//!     const IDENTIFIER: Option<&'static str> = Some("account");
//! }
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{CodecError, HookResult};
use crate::types::{DbForm, WireForm};

/// Identity contract
///
/// Three possibly distinct identities address an entity in memory, in the
/// backing store and in the cache.
///
/// All three accessors must be pure reads and must stay stable while the
/// entity is registered. Changing `key` requires deregistering first; the
/// synchronizer rejects updates whose `key()` drifted from the registry key.
pub trait Identity {
    /// Runtime identity, unique among live instances in one registry
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    /// Identity used to address the backing-store record
    type DbKey: Clone + Debug + Send + Sync + 'static;
    /// Identity used to address the cache entry
    type CacheKey: Clone + Debug + Send + Sync + 'static;

    /// Registry lookup identity
    fn key(&self) -> Self::Key;

    /// Backing-store identity
    fn db_key(&self) -> Self::DbKey;

    /// Cache identity
    fn cache_key(&self) -> Self::CacheKey;
}

/// Serialization contract
///
/// Two independent one-way conversions. Both must be deterministic for a
/// given entity state. Hydration is the job of whoever loads records back.
pub trait Serialization {
    /// Exact representation written to the backing store
    fn db_serialize(&self) -> Result<DbForm, CodecError>;

    /// Representation sent over the network boundary
    ///
    /// May omit internal fields present in the db form.
    fn io_serialize(&self) -> Result<WireForm, CodecError>;
}

/// Persistence hooks
///
/// Write-through operations against the backing store and the cache, plus
/// maintenance of any in-memory indices the type keeps beyond the registry.
/// Each hook reports failure through its return value and should avoid
/// partially applying its effect.
///
/// Hooks may run while the owning registry's lock is held by the calling
/// thread. They may re-enter that registry (`get`, `add`, `del`) from the
/// same thread.
pub trait PersistenceHooks {
    /// Add this entity to the type's secondary indices
    fn add_index(&self) -> HookResult;

    /// Remove this entity from the type's secondary indices
    fn del_index(&self) -> HookResult;

    /// Insert the backing-store record at `db_key`
    fn db_insert(&self) -> HookResult;

    /// Overwrite the backing-store record at `db_key`
    fn db_update(&self) -> HookResult;

    /// Delete the backing-store record at `db_key`
    fn db_delete(&self) -> HookResult;

    /// Insert the cache entry at `cache_key`
    fn cache_insert(&self) -> HookResult;

    /// Overwrite the cache entry at `cache_key`
    fn cache_update(&self) -> HookResult;

    /// Remove the cache entry at `cache_key`
    fn cache_remove(&self) -> HookResult;
}

/// A type that can live in a registry
///
/// Handles are shared as `Arc<Self>`, so any field mutation after
/// registration goes through the type's own interior mutability.
pub trait Entity: Identity + Serialization + PersistenceHooks + Send + Sync + 'static {
    /// Optional static tag used in diagnostics
    const IDENTIFIER: Option<&'static str> = None;
}

/// Diagnostic name of an entity type
///
/// Returns the static identifier when the type assigns one, otherwise the
/// Rust type name.
pub fn entity_name<T: Entity>() -> &'static str {
    T::IDENTIFIER.unwrap_or_else(std::any::type_name::<T>)
}
