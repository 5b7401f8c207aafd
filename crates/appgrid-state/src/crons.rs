//! Cron schedule records.

use appgrid_core::ports::CronRepository;
use appgrid_core::{Cron, ResourceKind, StoreError, StoreResult, object_key};
use tracing::debug;

use crate::store::{StateStore, Txn, epoch_secs, tx_get, tx_put, tx_remove};
use crate::tables::CRONS;

impl CronRepository<Txn> for StateStore {
    fn get(&self, name: &str, namespace: &str) -> StoreResult<Option<Cron>> {
        Ok(self.read(CRONS, &object_key(namespace, name))?)
    }

    fn create(&self, tx: &mut Txn, cron: &Cron) -> StoreResult<Cron> {
        let key = cron.table_key();
        if tx_get::<Cron>(tx, CRONS, &key)?.is_some() {
            return Err(StoreError::already_exists(ResourceKind::Cron, key));
        }
        let now = epoch_secs();
        let cron = Cron {
            created_at: now,
            updated_at: now,
            ..cron.clone()
        };
        tx_put(tx, CRONS, &key, &cron)?;
        debug!(%key, selector = %cron.selector, "cron created");
        Ok(cron)
    }

    fn update(&self, tx: &mut Txn, cron: &Cron) -> StoreResult<Cron> {
        let key = cron.table_key();
        let now = epoch_secs();
        let created_at = tx_get::<Cron>(tx, CRONS, &key)?.map_or(now, |c| c.created_at);
        let cron = Cron {
            created_at,
            updated_at: now,
            ..cron.clone()
        };
        tx_put(tx, CRONS, &key, &cron)?;
        debug!(%key, selector = %cron.selector, "cron stored");
        Ok(cron)
    }

    fn delete(&self, tx: &mut Txn, name: &str, namespace: &str) -> StoreResult<bool> {
        let key = object_key(namespace, name);
        let existed = tx_remove(tx, CRONS, &key)?;
        debug!(%key, existed, "cron deleted");
        Ok(existed)
    }
}
