//! Nodes and the application versions desired on them.
//!
//! Which nodes an application lands on is decided by its label
//! selector alone; an empty selector lands nowhere. Removal follows the
//! nodes that actually hold the application, so relabelling a node after
//! placement never strands an assignment.

use appgrid_core::ports::NodeRepository;
use appgrid_core::{Application, NodeId, NodeInfo, Selector, StoreResult, object_key};
use tracing::debug;

use crate::store::{StateStore, Txn, epoch_secs, tx_get, tx_put, tx_scan};
use crate::tables::NODES;

fn namespace_nodes(tx: &Txn, namespace: &str) -> StoreResult<Vec<NodeInfo>> {
    let nodes: Vec<(String, NodeInfo)> = tx_scan(tx, NODES, &format!("{namespace}/"))?;
    Ok(nodes.into_iter().map(|(_, node)| node).collect())
}

impl NodeRepository<Txn> for StateStore {
    fn get_node(&self, namespace: &str, name: &str) -> StoreResult<Option<NodeInfo>> {
        Ok(self.read(NODES, &object_key(namespace, name))?)
    }

    fn list_nodes(&self, namespace: &str) -> StoreResult<Vec<NodeInfo>> {
        let nodes: Vec<(String, NodeInfo)> = self.read_prefix(NODES, &format!("{namespace}/"))?;
        Ok(nodes.into_iter().map(|(_, node)| node).collect())
    }

    /// Register a node or replace its labels. Application assignments of
    /// an already registered node are owned by the placement calls below
    /// and survive re-registration.
    fn put_node(&self, tx: &mut Txn, node: &NodeInfo) -> StoreResult<()> {
        let key = node.table_key();
        let app_versions = match tx_get::<NodeInfo>(tx, NODES, &key)? {
            Some(current) => current.app_versions,
            None => node.app_versions.clone(),
        };
        let node = NodeInfo {
            app_versions,
            updated_at: epoch_secs(),
            ..node.clone()
        };
        tx_put(tx, NODES, &key, &node)?;
        debug!(%key, apps = node.app_versions.len(), "node stored");
        Ok(())
    }

    /// Set `app`'s version on every node its selector matches and drop it
    /// from nodes that hold it but no longer match.
    fn update_node_app_version(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app: &Application,
    ) -> StoreResult<Vec<NodeId>> {
        let selector = Selector::parse(&app.selector)?;
        let now = epoch_secs();
        let mut names = Vec::new();
        let mut dropped = Vec::new();
        for mut node in namespace_nodes(tx, namespace)? {
            let matched = !selector.is_empty() && selector.matches(&node.labels);
            if matched {
                node.app_versions.insert(app.name.clone(), app.version.clone());
            } else if node.app_versions.remove(&app.name).is_some() {
                dropped.push(node.name.clone());
            } else {
                continue;
            }
            node.updated_at = now;
            tx_put(tx, NODES, &node.table_key(), &node)?;
            if matched {
                names.push(node.name);
            }
        }
        debug!(
            namespace,
            app = %app.name,
            version = %app.version,
            nodes = ?names,
            ?dropped,
            "application version set on nodes"
        );
        Ok(names)
    }

    /// Remove `app` from every node holding it, whatever its selector.
    fn delete_node_app_version(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app: &Application,
    ) -> StoreResult<Vec<NodeId>> {
        let now = epoch_secs();
        let mut names = Vec::new();
        for mut node in namespace_nodes(tx, namespace)? {
            if node.app_versions.remove(&app.name).is_none() {
                continue;
            }
            node.updated_at = now;
            tx_put(tx, NODES, &node.table_key(), &node)?;
            names.push(node.name);
        }
        debug!(namespace, app = %app.name, nodes = ?names, "application removed from nodes");
        Ok(names)
    }
}
