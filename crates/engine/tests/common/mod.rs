//! Shared test entity: an account backed by the in-memory collaborators

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use keel_core::{
    codec, Cache, CodecError, DbForm, Entity, HookError, HookResult, Identity, PersistenceHooks,
    PrefixedKey, SecondaryIndex, Serialization, Store, WireForm,
};
use keel_storage::{MemoryCache, MemoryStore};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Collaborators shared by every account of one test
#[derive(Debug, Default)]
pub struct Backend {
    pub store: MemoryStore<u64>,
    pub cache: MemoryCache<PrefixedKey>,
    pub by_owner: SecondaryIndex<String, u64>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl Backend {
    pub fn new() -> Arc<Self> {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }
}

/// Stored record; the wire view drops `note`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: u64,
    pub owner: String,
    pub balance: i64,
    pub note: String,
}

#[derive(Debug, Serialize)]
struct AccountView<'a> {
    id: u64,
    owner: &'a str,
    balance: i64,
}

#[derive(Debug, Default)]
pub struct Account {
    id: AtomicU64,
    owner: String,
    balance: Mutex<i64>,
    note: Mutex<String>,
    backend: Arc<Backend>,
}

impl Account {
    pub fn new(id: u64, owner: &str, balance: i64, backend: &Arc<Backend>) -> Arc<Self> {
        Arc::new(Self {
            id: AtomicU64::new(id),
            owner: owner.to_string(),
            balance: Mutex::new(balance),
            note: Mutex::new(String::new()),
            backend: Arc::clone(backend),
        })
    }

    /// Rebuild an account from its stored record
    pub fn hydrate(bytes: &[u8], backend: &Arc<Backend>) -> Result<Arc<Self>, CodecError> {
        let row: AccountRow = codec::from_db_form(bytes)?;
        Ok(Arc::new(Self {
            id: AtomicU64::new(row.id),
            owner: row.owner,
            balance: Mutex::new(row.balance),
            note: Mutex::new(row.note),
            backend: Arc::clone(backend),
        }))
    }

    pub fn balance(&self) -> i64 {
        *self.balance.lock()
    }

    pub fn deposit(&self, amount: i64) {
        *self.balance.lock() += amount;
    }

    pub fn set_note(&self, note: &str) {
        *self.note.lock() = note.to_string();
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Change the runtime key in place (not allowed while registered)
    pub fn rekey(&self, id: u64) {
        self.id.store(id, Ordering::SeqCst);
    }

    fn row(&self) -> AccountRow {
        AccountRow {
            id: self.key(),
            owner: self.owner.clone(),
            balance: self.balance(),
            note: self.note.lock().clone(),
        }
    }

    fn record(&self, hook: &'static str) {
        self.backend.calls.lock().push(hook);
    }
}

impl Identity for Account {
    type Key = u64;
    type DbKey = u64;
    type CacheKey = PrefixedKey;

    fn key(&self) -> u64 {
        self.id.load(Ordering::SeqCst)
    }

    fn db_key(&self) -> u64 {
        self.key()
    }

    fn cache_key(&self) -> PrefixedKey {
        PrefixedKey::new("account", self.key())
    }
}

impl Serialization for Account {
    fn db_serialize(&self) -> Result<DbForm, CodecError> {
        codec::to_db_form(&self.row())
    }

    fn io_serialize(&self) -> Result<WireForm, CodecError> {
        codec::to_wire_form(&AccountView {
            id: self.key(),
            owner: &self.owner,
            balance: self.balance(),
        })
    }
}

impl PersistenceHooks for Account {
    fn add_index(&self) -> HookResult {
        self.record("add_index");
        if !self.backend.by_owner.insert(self.owner.clone(), self.key()) {
            return Err(HookError::index(format!("account {} already indexed", self.key())));
        }
        Ok(())
    }

    fn del_index(&self) -> HookResult {
        self.record("del_index");
        self.backend.by_owner.remove(&self.owner, &self.key());
        Ok(())
    }

    fn db_insert(&self) -> HookResult {
        self.record("db_insert");
        self.backend
            .store
            .insert(&self.db_key(), self.db_serialize()?)
            .map_err(HookError::store)
    }

    fn db_update(&self) -> HookResult {
        self.record("db_update");
        self.backend
            .store
            .update(&self.db_key(), self.db_serialize()?)
            .map_err(HookError::store)
    }

    fn db_delete(&self) -> HookResult {
        self.record("db_delete");
        self.backend
            .store
            .delete(&self.db_key())
            .map_err(HookError::store)
    }

    fn cache_insert(&self) -> HookResult {
        self.record("cache_insert");
        self.backend
            .cache
            .insert(&self.cache_key(), self.db_serialize()?)
            .map_err(HookError::cache)
    }

    fn cache_update(&self) -> HookResult {
        self.record("cache_update");
        self.backend
            .cache
            .update(&self.cache_key(), self.db_serialize()?)
            .map_err(HookError::cache)
    }

    fn cache_remove(&self) -> HookResult {
        self.record("cache_remove");
        self.backend
            .cache
            .remove(&self.cache_key())
            .map_err(HookError::cache)
    }
}

impl Entity for Account {
    const IDENTIFIER: Option<&'static str> = Some("account");
}
