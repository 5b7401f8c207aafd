//! Versioned application records.
//!
//! The latest version of every application lives in `APPLICATIONS`;
//! every version (latest included) is kept in `APPLICATION_HISTORY`
//! until the application is deleted. Versions are decimal counters
//! starting at 1.

use appgrid_core::ports::ApplicationRepository;
use appgrid_core::{
    Application, ResourceKind, StoreError, StoreResult, history_key, object_key,
};
use tracing::debug;

use crate::store::{StateStore, Txn, epoch_secs, tx_get, tx_put, tx_remove, tx_scan};
use crate::tables::{APPLICATION_HISTORY, APPLICATIONS};

impl ApplicationRepository<Txn> for StateStore {
    fn get(
        &self,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> StoreResult<Option<Application>> {
        let app = match version {
            None => self.read(APPLICATIONS, &object_key(namespace, name))?,
            Some(v) => self.read(APPLICATION_HISTORY, &history_key(namespace, name, v))?,
        };
        Ok(app)
    }

    fn create_with_base(
        &self,
        tx: &mut Txn,
        namespace: &str,
        mut app: Application,
        base: Option<&Application>,
    ) -> StoreResult<Application> {
        app.namespace = namespace.to_string();
        let key = app.table_key();
        if tx_get::<Application>(tx, APPLICATIONS, &key)?.is_some() {
            return Err(StoreError::already_exists(ResourceKind::Application, key));
        }

        if let Some(base) = base {
            inherit_from_base(&mut app, base);
        }

        let now = epoch_secs();
        app.version = "1".to_string();
        app.created_at = now;
        app.updated_at = now;

        tx_put(tx, APPLICATIONS, &key, &app)?;
        tx_put(tx, APPLICATION_HISTORY, &app.history_key(), &app)?;
        debug!(%key, version = %app.version, based = base.is_some(), "application created");
        Ok(app)
    }

    fn update(
        &self,
        tx: &mut Txn,
        namespace: &str,
        mut app: Application,
    ) -> StoreResult<Application> {
        app.namespace = namespace.to_string();
        let key = app.table_key();
        let Some(current) = tx_get::<Application>(tx, APPLICATIONS, &key)? else {
            return Err(StoreError::not_found(ResourceKind::Application, key));
        };

        let next = current.version.parse::<u64>().unwrap_or(0) + 1;
        app.version = next.to_string();
        app.created_at = current.created_at;
        app.updated_at = epoch_secs();

        tx_put(tx, APPLICATIONS, &key, &app)?;
        tx_put(tx, APPLICATION_HISTORY, &app.history_key(), &app)?;
        debug!(%key, version = %app.version, "application updated");
        Ok(app)
    }

    fn delete(
        &self,
        tx: &mut Txn,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> StoreResult<()> {
        let key = object_key(namespace, name);
        let history_prefix = format!("{key}:");

        match version {
            None => {
                let existed = tx_remove(tx, APPLICATIONS, &key)?;
                let versions: Vec<(String, Application)> =
                    tx_scan(tx, APPLICATION_HISTORY, &history_prefix)?;
                for (history, _) in &versions {
                    tx_remove(tx, APPLICATION_HISTORY, history)?;
                }
                debug!(%key, existed, versions = versions.len(), "application deleted");
            }
            Some(v) => {
                tx_remove(tx, APPLICATION_HISTORY, &history_key(namespace, name, v))?;
                let latest = tx_get::<Application>(tx, APPLICATIONS, &key)?;
                if latest.is_some_and(|app| app.version == v) {
                    // Promote the newest surviving version, if any.
                    let remaining: Vec<(String, Application)> =
                        tx_scan(tx, APPLICATION_HISTORY, &history_prefix)?;
                    let newest = remaining
                        .into_iter()
                        .map(|(_, app)| app)
                        .max_by_key(|app| app.version.parse::<u64>().unwrap_or(0));
                    match newest {
                        Some(app) => tx_put(tx, APPLICATIONS, &key, &app)?,
                        None => {
                            tx_remove(tx, APPLICATIONS, &key)?;
                        }
                    }
                }
                debug!(%key, version = v, "application version deleted");
            }
        }
        Ok(())
    }
}

/// Fill the fields a new application leaves empty from its base.
///
/// Selector and cron fields are never inherited: they describe where and
/// when this application runs, not what it is.
fn inherit_from_base(app: &mut Application, base: &Application) {
    for (k, v) in &base.labels {
        app.labels.entry(k.clone()).or_insert_with(|| v.clone());
    }
    if app.description.is_empty() {
        app.description = base.description.clone();
    }
    if app.services.is_empty() {
        app.services = base.services.clone();
    }
    if app.volumes.is_empty() {
        app.volumes = base.volumes.clone();
    }
}
