//! Core contracts for Keel
//!
//! This crate defines what an entity type must provide to live in a registry:
//! - Identity: runtime, db and cache keys
//! - Serialization: db form and wire form
//! - PersistenceHooks: index, store and cache write-through
//! - Entity: the opt-in marker, with an optional static identifier
//! - Factory: default-constructed shared handles
//! - Store / Cache: collaborator interfaces hooks write through
//! - SecondaryIndex: helper for indices beyond the registry
//! - Errors: CodecError, BackendError, HookError

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod codec;
pub mod error;
pub mod factory;
pub mod index;
pub mod traits;
pub mod types;

pub use backend::{Cache, Store};
pub use error::{BackendError, CodecError, HookError, HookResult};
pub use factory::{new_instance, Factory};
pub use index::SecondaryIndex;
pub use traits::{entity_name, Entity, Identity, PersistenceHooks, Serialization};
pub use types::{DbForm, EntityId, PrefixedKey, WireForm};
