//! Error types for entity contracts
//!
//! This module defines the errors an entity type reports from its
//! persistence hooks, and the errors its collaborators (backing store,
//! cache, codecs) report back to it.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type returned by every persistence hook
pub type HookResult = std::result::Result<(), HookError>;

/// Encoding failure while producing a db or wire form
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Value could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<rmp_serde::encode::Error> for CodecError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        CodecError::Encode(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for CodecError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        CodecError::Decode(e.to_string())
    }
}

/// Failure reported by a backing store or cache collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A record already exists at the addressed key
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// No record exists at the addressed key
    #[error("Missing record: {0}")]
    Missing(String),

    /// The collaborator cannot be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Any other collaborator-specific failure
    #[error("Backend error: {0}")]
    Other(String),
}

/// Failure reported by a persistence hook
///
/// Hooks return one of these instead of panicking. Recovery is up to the
/// caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HookError {
    /// Backing store rejected the write
    #[error("Store error: {0}")]
    Store(BackendError),

    /// Cache rejected the write
    #[error("Cache error: {0}")]
    Cache(BackendError),

    /// A secondary index could not be maintained
    #[error("Index error: {0}")]
    Index(String),

    /// The entity could not be serialized
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<BackendError> for HookError {
    /// Collaborator failures default to the store side; cache hooks wrap
    /// with [`HookError::cache`].
    fn from(e: BackendError) -> Self {
        HookError::Store(e)
    }
}

impl HookError {
    /// Wrap a store collaborator failure
    pub fn store(e: BackendError) -> Self {
        HookError::Store(e)
    }

    /// Wrap a cache collaborator failure
    pub fn cache(e: BackendError) -> Self {
        HookError::Cache(e)
    }

    /// Create an index failure
    pub fn index(msg: impl Into<String>) -> Self {
        HookError::Index(msg.into())
    }
}
