//! Dirty-data diagnostics.
//!
//! Cleanup that runs after a committed operation cannot fail the
//! operation. Whatever it leaves behind is reported as [`DirtyData`]:
//! always as a `warn!` event on the `appgrid::dirty_data` target, and to
//! an optional [`DirtyDataSink`] for anything that wants to act on it.

use std::sync::Mutex;

use appgrid_core::ResourceKind;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A resource that should have been removed but was not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyData {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    pub error: String,
}

impl DirtyData {
    pub(crate) fn emit(&self) {
        warn!(
            target: "appgrid::dirty_data",
            kind = %self.kind,
            namespace = %self.namespace,
            name = %self.name,
            error = %self.error,
            "dirty data left behind"
        );
    }
}

/// Receives dirty-data records for operational follow-up.
pub trait DirtyDataSink: Send + Sync {
    fn record(&self, item: DirtyData);
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    items: Mutex<Vec<DirtyData>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn items(&self) -> Vec<DirtyData> {
        self.items.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl DirtyDataSink for MemorySink {
    fn record(&self, item: DirtyData) {
        if let Ok(mut items) = self.items.lock() {
            items.push(item);
        }
    }
}
