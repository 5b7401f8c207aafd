//! Error types for the appgrid state store.

use std::fmt::Display;

use appgrid_core::StoreError;
use redb::TableHandle;
use thiserror::Error;

/// Result type alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Failures of the redb file or of the JSON records stored in it.
///
/// Table-level variants carry the table name and, where there is one,
/// the record key, so a backend error surfaced by the facade points at
/// the record involved.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("cannot open state store: {0}")]
    Open(String),

    /// Begin, commit or abort of a redb transaction failed.
    #[error("state transaction failed: {0}")]
    Transaction(String),

    #[error("cannot open table {table}: {reason}")]
    Table { table: String, reason: String },

    #[error("cannot read {table}[{key}]: {reason}")]
    Read {
        table: String,
        key: String,
        reason: String,
    },

    #[error("cannot write {table}[{key}]: {reason}")]
    Write {
        table: String,
        key: String,
        reason: String,
    },

    /// A record could not be encoded as JSON before writing.
    #[error("cannot encode record: {0}")]
    Encode(String),

    /// A stored record is not valid JSON for its type.
    #[error("corrupt record in {table}: {reason}")]
    Decode { table: String, reason: String },
}

impl StateError {
    pub(crate) fn table(def: impl TableHandle, e: impl Display) -> Self {
        Self::Table {
            table: def.name().to_string(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn read(def: impl TableHandle, key: &str, e: impl Display) -> Self {
        Self::Read {
            table: def.name().to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn write(def: impl TableHandle, key: &str, e: impl Display) -> Self {
        Self::Write {
            table: def.name().to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        }
    }
}

impl From<StateError> for StoreError {
    fn from(e: StateError) -> Self {
        StoreError::Backend(e.to_string())
    }
}
