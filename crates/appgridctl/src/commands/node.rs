use std::path::Path;

use appgrid_core::ports::{IndexRepository, NodeRepository, TransactionManager};
use appgrid_core::{AppgridConfig, NodeInfo};

use super::{open_store, print_json, read_json};

pub fn put(config: &AppgridConfig, manifest: &Path) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let node: NodeInfo = read_json(manifest)?;

    let mut tx = store.begin_tx()?;
    store.put_node(&mut tx, &node)?;
    store.commit(tx)?;

    print_json(&store.get_node(&node.namespace, &node.name)?)
}

pub fn list(config: &AppgridConfig, namespace: &str) -> anyhow::Result<()> {
    let store = open_store(config)?;
    print_json(&store.list_nodes(namespace)?)
}

pub fn index(config: &AppgridConfig, namespace: &str, app: &str) -> anyhow::Result<()> {
    let store = open_store(config)?;
    print_json(&store.list_nodes_by_app(namespace, app)?)
}
