//! Error type shared by every collaborator port.

use thiserror::Error;

use crate::selector::SelectorError;
use crate::types::ResourceKind;

/// Result type alias for collaborator port operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a collaborator store can report to the facade.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {key} not found")]
    NotFound { kind: ResourceKind, key: String },

    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: ResourceKind, key: String },

    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(kind: ResourceKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn already_exists(kind: ResourceKind, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
