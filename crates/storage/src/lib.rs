//! In-memory collaborators for Keel
//!
//! This crate implements the collaborator traits persistence hooks write
//! through:
//! - MemoryStore: `Store` with unique-insert semantics
//! - MemoryCache: `Cache` with upsert semantics
//!
//! Both support outage simulation so failure pathways can be exercised
//! without a real driver.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod store;

pub use cache::MemoryCache;
pub use store::MemoryStore;
