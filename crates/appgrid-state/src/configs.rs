//! Configuration objects.

use appgrid_core::ports::ConfigRepository;
use appgrid_core::{Configuration, StoreResult, object_key};
use tracing::debug;

use crate::store::{StateStore, Txn, epoch_secs, tx_get, tx_put, tx_remove};
use crate::tables::CONFIGS;

impl ConfigRepository<Txn> for StateStore {
    fn get(&self, namespace: &str, name: &str) -> StoreResult<Option<Configuration>> {
        Ok(self.read(CONFIGS, &object_key(namespace, name))?)
    }

    fn upsert(
        &self,
        tx: &mut Txn,
        namespace: &str,
        config: &Configuration,
    ) -> StoreResult<Configuration> {
        let key = object_key(namespace, &config.name);
        let now = epoch_secs();
        let (version, created_at) = match tx_get::<Configuration>(tx, CONFIGS, &key)? {
            Some(current) => (current.version + 1, current.created_at),
            None => (1, now),
        };
        let config = Configuration {
            namespace: namespace.to_string(),
            version,
            created_at,
            updated_at: now,
            ..config.clone()
        };
        tx_put(tx, CONFIGS, &key, &config)?;
        debug!(%key, version, "config stored");
        Ok(config)
    }

    fn delete(&self, tx: &mut Txn, namespace: &str, name: &str) -> StoreResult<bool> {
        let key = object_key(namespace, name);
        let existed = tx_remove(tx, CONFIGS, &key)?;
        debug!(%key, existed, "config deleted");
        Ok(existed)
    }
}
