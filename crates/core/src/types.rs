//! Core types shared by entity types
//!
//! This module defines:
//! - DbForm / WireForm: serialized representations for the store and the network
//! - EntityId: ready-made UUID identity usable as any of the three key types
//! - PrefixedKey: `"{prefix}:{id}"` addressing, the usual shape of cache keys

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Representation written to the backing store
pub type DbForm = Vec<u8>;

/// Representation handed to the network boundary
pub type WireForm = Vec<u8>;

/// Unique identifier for an entity
///
/// An EntityId is a wrapper around a UUID v4. Entity types that have no
/// natural identity of their own can use it for `key`, `db_key` or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Create a new random EntityId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an EntityId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse an EntityId from a string representation
    ///
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this EntityId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key namespaced by an entity-type prefix
///
/// Format: "prefix:id"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrefixedKey {
    /// Entity-type namespace (e.g. "account")
    pub prefix: String,
    /// Identity within the namespace
    pub id: String,
}

impl PrefixedKey {
    /// Create a new prefixed key
    pub fn new(prefix: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            prefix: prefix.into(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for PrefixedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.id)
    }
}
