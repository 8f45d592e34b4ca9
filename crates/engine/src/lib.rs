//! Registries and write-through synchronization for Keel
//!
//! This crate provides:
//! - Registry: thread-safe per-type map from runtime key to shared handle
//! - RegistrySet: one lazily created registry per entity type, with a
//!   process-wide instance behind `Registry::instance()`
//! - Synchronizer: create/update/delete pathways that keep registry,
//!   store and cache in step
//! - SyncConfig: `keel.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod registry;
pub mod sync;

pub use config::{SyncConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, Stage, SyncError, SyncResult};
pub use registry::{Registry, RegistrySet};
pub use sync::Synchronizer;
