//! Error types for registries and write-through pathways
//!
//! Registry primitives (`add`, `get`, `del`) never fail: collisions and
//! misses come back as `false` / `None`. The errors here belong to the
//! multi-step pathways driven by `Synchronizer` and to config loading.

use std::fmt;
use std::path::PathBuf;

use keel_core::HookError;
use thiserror::Error;

/// Result type alias for synchronizer operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Step of a write-through pathway
///
/// Names the hook that failed. Earlier steps of the pathway have already
/// taken effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `db_insert` on create
    DbInsert,
    /// `cache_insert` on create
    CacheInsert,
    /// `add_index` on create or adopt
    AddIndex,
    /// `db_update` on update
    DbUpdate,
    /// `cache_update` on update
    CacheUpdate,
    /// `cache_remove` on delete
    CacheRemove,
    /// `db_delete` on delete
    DbDelete,
    /// `del_index` on delete or evict
    DelIndex,
}

impl Stage {
    /// Hook name of this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::DbInsert => "db_insert",
            Stage::CacheInsert => "cache_insert",
            Stage::AddIndex => "add_index",
            Stage::DbUpdate => "db_update",
            Stage::CacheUpdate => "cache_update",
            Stage::CacheRemove => "cache_remove",
            Stage::DbDelete => "db_delete",
            Stage::DelIndex => "del_index",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a write-through pathway
#[derive(Debug, Error)]
pub enum SyncError {
    /// An entity is already registered under the key
    #[error("{entity}: key {key} already registered")]
    Collision {
        /// Entity type name
        entity: &'static str,
        /// Debug rendering of the key
        key: String,
    },

    /// No entity is registered under the key
    #[error("{entity}: key {key} not registered")]
    NotRegistered {
        /// Entity type name
        entity: &'static str,
        /// Debug rendering of the key
        key: String,
    },

    /// The entity's `key()` no longer matches the key it is registered under
    #[error("{entity}: registered under {registered} but key() now returns {current}")]
    KeyChanged {
        /// Entity type name
        entity: &'static str,
        /// Key the registry holds the entity under
        registered: String,
        /// Key the entity currently reports
        current: String,
    },

    /// A persistence hook reported failure
    #[error("{entity}: {stage} failed for key {key}: {source}")]
    Hook {
        /// Entity type name
        entity: &'static str,
        /// Debug rendering of the key
        key: String,
        /// Pathway step that failed
        stage: Stage,
        /// Failure reported by the hook
        #[source]
        source: HookError,
    },
}

impl SyncError {
    /// Failed stage, if this is a hook failure
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SyncError::Hook { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Check if this is a key collision
    pub fn is_collision(&self) -> bool {
        matches!(self, SyncError::Collision { .. })
    }
}

/// Failure while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Failed to access config file '{}': {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config content is not valid TOML for `SyncConfig`
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Config could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}
