//! Post-commit cleanup of generated configurations.
//!
//! When an application stops referencing a generated configuration, that
//! configuration has no other owner and is deleted. This runs after the
//! owning transaction committed, one short transaction per deletion, and
//! never fails the caller: anything it cannot delete becomes dirty data.

use std::collections::HashSet;

use appgrid_core::{Application, Configuration, GeneratedConfigClassifier, ResourceKind};
use tracing::debug;

use crate::diagnostics::DirtyData;
use crate::error::{FacadeError, FacadeResult, store_err};
use crate::facade::Facade;

/// Generated configurations referenced by `old_app` that are absent from
/// `keep`, in volume order without repeats.
pub fn orphaned_generated_configs<'a>(
    classifier: &GeneratedConfigClassifier,
    keep: &[Configuration],
    old_app: &'a Application,
) -> Vec<&'a str> {
    let keep: HashSet<&str> = keep.iter().map(|c| c.name.as_str()).collect();
    let mut seen = HashSet::new();
    old_app
        .config_names()
        .filter(|name| !keep.contains(name) && classifier.is_generated(name))
        .filter(|name| seen.insert(*name))
        .collect()
}

impl<Tx> Facade<Tx> {
    /// Delete the generated configurations `old_app` referenced that are
    /// not in `keep`. Returns what could not be deleted.
    ///
    /// Deleting a configuration that is already gone is a no-op, so this is
    /// safe to run again with the same inputs.
    pub fn clean_generated_configs(
        &self,
        namespace: &str,
        keep: &[Configuration],
        old_app: &Application,
    ) -> Vec<DirtyData> {
        let mut dirty = Vec::new();
        for name in orphaned_generated_configs(&self.classifier, keep, old_app) {
            match self.delete_config(namespace, name) {
                Ok(existed) => debug!(namespace, name, existed, "generated config removed"),
                Err(e) => {
                    let item = DirtyData {
                        kind: ResourceKind::Config,
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                        error: e.to_string(),
                    };
                    item.emit();
                    if let Some(sink) = &self.dirty_data {
                        sink.record(item.clone());
                    }
                    dirty.push(item);
                }
            }
        }
        dirty
    }

    fn delete_config(&self, namespace: &str, name: &str) -> FacadeResult<bool> {
        let mut guard = self.begin()?;
        let existed = self
            .stores
            .config
            .delete(guard.tx(), namespace, name)
            .map_err(store_err("delete", ResourceKind::Config, namespace, name))?;
        guard.commit().map_err(FacadeError::Commit)?;
        Ok(existed)
    }
}
