//! StateStore: redb-backed state persistence for appgrid.
//!
//! One `StateStore` implements every collaborator port of the lifecycle
//! facade. Reads outside a transaction use a fresh redb read snapshot;
//! writes always go through the `WriteTransaction` handed out by
//! [`TransactionManager::begin_tx`], so everything a facade operation
//! touches commits or aborts together. The store supports both on-disk
//! and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use appgrid_core::StoreResult;
use appgrid_core::ports::TransactionManager;
use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, TableHandle, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;

/// Transaction handle threaded through every port call.
pub type Txn = WriteTransaction;

/// Shape shared by every table: `&str` key, JSON bytes value.
pub(crate) type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| $crate::error::StateError::$variant(e.to_string())
    };
}
pub(crate) use map_err;

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        for def in [APPLICATIONS, APPLICATION_HISTORY, CRONS, NODES, APP_NODE_INDEX, CONFIGS] {
            txn.open_table(def).map_err(|e| StateError::table(def, e))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Read one record from a committed snapshot.
    pub(crate) fn read<T: DeserializeOwned>(
        &self,
        def: JsonTable,
        key: &str,
    ) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(def).map_err(|e| StateError::table(def, e))?;
        read_json(def, &table, key)
    }

    /// Read every record whose key starts with `prefix` from a committed snapshot.
    pub(crate) fn read_prefix<T: DeserializeOwned>(
        &self,
        def: JsonTable,
        prefix: &str,
    ) -> StateResult<Vec<(String, T)>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(def).map_err(|e| StateError::table(def, e))?;
        scan_json(def, &table, prefix)
    }
}

impl TransactionManager<Txn> for StateStore {
    fn begin_tx(&self) -> StoreResult<Txn> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        Ok(txn)
    }

    fn commit(&self, tx: Txn) -> StoreResult<()> {
        tx.commit().map_err(map_err!(Transaction))?;
        debug!("transaction committed");
        Ok(())
    }

    fn rollback(&self, tx: Txn) -> StoreResult<()> {
        tx.abort().map_err(map_err!(Transaction))?;
        debug!("transaction rolled back");
        Ok(())
    }
}

// ── Table helpers ───────────────────────────────────────────────────

pub(crate) fn encode<T: Serialize>(value: &T) -> StateResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(map_err!(Encode))
}

pub(crate) fn decode<T: DeserializeOwned>(def: JsonTable, bytes: &[u8]) -> StateResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StateError::Decode {
        table: def.name().to_string(),
        reason: e.to_string(),
    })
}

fn read_json<T: DeserializeOwned>(
    def: JsonTable,
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> StateResult<Option<T>> {
    match table.get(key).map_err(|e| StateError::read(def, key, e))? {
        Some(guard) => Ok(Some(decode(def, guard.value())?)),
        None => Ok(None),
    }
}

fn scan_json<T: DeserializeOwned>(
    def: JsonTable,
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    prefix: &str,
) -> StateResult<Vec<(String, T)>> {
    let mut results = Vec::new();
    for entry in table.iter().map_err(|e| StateError::read(def, prefix, e))? {
        let (key, value) = entry.map_err(|e| StateError::read(def, prefix, e))?;
        if key.value().starts_with(prefix) {
            results.push((key.value().to_string(), decode(def, value.value())?));
        }
    }
    Ok(results)
}

/// Read one record through an open write transaction.
pub(crate) fn tx_get<T: DeserializeOwned>(
    tx: &Txn,
    def: JsonTable,
    key: &str,
) -> StateResult<Option<T>> {
    let table = tx.open_table(def).map_err(|e| StateError::table(def, e))?;
    read_json(def, &table, key)
}

/// Prefix scan through an open write transaction.
pub(crate) fn tx_scan<T: DeserializeOwned>(
    tx: &Txn,
    def: JsonTable,
    prefix: &str,
) -> StateResult<Vec<(String, T)>> {
    let table = tx.open_table(def).map_err(|e| StateError::table(def, e))?;
    scan_json(def, &table, prefix)
}

/// Insert or overwrite one record through an open write transaction.
pub(crate) fn tx_put<T: Serialize>(
    tx: &Txn,
    def: JsonTable,
    key: &str,
    value: &T,
) -> StateResult<()> {
    let bytes = encode(value)?;
    let mut table = tx.open_table(def).map_err(|e| StateError::table(def, e))?;
    table
        .insert(key, bytes.as_slice())
        .map_err(|e| StateError::write(def, key, e))?;
    Ok(())
}

/// Remove one record through an open write transaction. Returns true if it existed.
pub(crate) fn tx_remove(tx: &Txn, def: JsonTable, key: &str) -> StateResult<bool> {
    let mut table = tx.open_table(def).map_err(|e| StateError::table(def, e))?;
    let existed = table
        .remove(key)
        .map_err(|e| StateError::write(def, key, e))?
        .is_some();
    Ok(existed)
}

/// Current Unix epoch in seconds.
pub(crate) fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
