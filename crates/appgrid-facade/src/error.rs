//! Error types for the lifecycle facade.

use appgrid_core::{ResourceKind, StoreError};
use thiserror::Error;

/// Result type alias for facade operations.
pub type FacadeResult<T> = Result<T, FacadeError>;

/// Failures surfaced to facade callers.
///
/// Any of these returned from a mutating operation means its transaction
/// was rolled back and nothing it wrote is visible.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("application {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("failed to begin transaction: {0}")]
    Begin(#[source] StoreError),

    #[error("failed to commit transaction: {0}")]
    Commit(#[source] StoreError),

    #[error("failed to {op} {kind} {namespace}/{name}: {source}")]
    Store {
        op: &'static str,
        kind: ResourceKind,
        namespace: String,
        name: String,
        source: StoreError,
    },
}

impl FacadeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Wrap a collaborator error with the step and entity it concerned.
pub(crate) fn store_err<'a>(
    op: &'static str,
    kind: ResourceKind,
    namespace: &'a str,
    name: &'a str,
) -> impl FnOnce(StoreError) -> FacadeError + 'a {
    move |source| FacadeError::Store {
        op,
        kind,
        namespace: namespace.to_string(),
        name: name.to_string(),
        source,
    }
}
