//! Application → node index.
//!
//! Each entry holds the sorted, de-duplicated node ids an application is
//! currently assigned to. Refreshing replaces the entry wholesale; an
//! empty node set removes it.

use appgrid_core::ports::IndexRepository;
use appgrid_core::{NodeId, StoreResult, object_key};
use tracing::debug;

use crate::store::{StateStore, Txn, tx_put, tx_remove};
use crate::tables::APP_NODE_INDEX;

impl IndexRepository<Txn> for StateStore {
    fn refresh_nodes_index_by_app(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app_name: &str,
        nodes: &[NodeId],
    ) -> StoreResult<()> {
        let key = object_key(namespace, app_name);
        let mut nodes = nodes.to_vec();
        nodes.sort();
        nodes.dedup();

        if nodes.is_empty() {
            tx_remove(tx, APP_NODE_INDEX, &key)?;
        } else {
            tx_put(tx, APP_NODE_INDEX, &key, &nodes)?;
        }
        debug!(%key, ?nodes, "node index refreshed");
        Ok(())
    }

    fn list_nodes_by_app(&self, namespace: &str, app_name: &str) -> StoreResult<Vec<NodeId>> {
        let nodes: Option<Vec<NodeId>> =
            self.read(APP_NODE_INDEX, &object_key(namespace, app_name))?;
        Ok(nodes.unwrap_or_default())
    }

    fn list_apps_by_node(&self, namespace: &str, node: &str) -> StoreResult<Vec<String>> {
        let prefix = format!("{namespace}/");
        let entries: Vec<(String, Vec<NodeId>)> = self.read_prefix(APP_NODE_INDEX, &prefix)?;
        Ok(entries
            .into_iter()
            .filter(|(_, nodes)| nodes.iter().any(|n| n == node))
            .filter_map(|(key, _)| key.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }
}
