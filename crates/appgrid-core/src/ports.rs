//! Collaborator ports used by the lifecycle facade.
//!
//! Every mutating method takes the transaction handle `Tx` explicitly;
//! nothing is carried in ambient state. Reads that the facade performs
//! outside a transaction (`get`, listings) use the store's own read
//! snapshot.
//!
//! Implementations must not open a second write transaction while a
//! handle is live: all writes of one logical operation go through the
//! handle they were given.

use crate::error::StoreResult;
use crate::types::{Application, Configuration, Cron, NodeId, NodeInfo};

/// Begins, commits and rolls back transaction handles.
///
/// `commit` and `rollback` consume the handle, so each handle is closed
/// at most once.
pub trait TransactionManager<Tx>: Send + Sync {
    fn begin_tx(&self) -> StoreResult<Tx>;
    fn commit(&self, tx: Tx) -> StoreResult<()>;
    fn rollback(&self, tx: Tx) -> StoreResult<()>;
}

/// Versioned application records keyed by `(namespace, name, version)`.
pub trait ApplicationRepository<Tx>: Send + Sync {
    /// Fetch a version of an application; `None` selects the latest.
    fn get(&self, namespace: &str, name: &str, version: Option<&str>)
    -> StoreResult<Option<Application>>;

    /// Create the first version of an application. When `base` is given,
    /// fields the new application leaves empty are derived from it.
    fn create_with_base(
        &self,
        tx: &mut Tx,
        namespace: &str,
        app: Application,
        base: Option<&Application>,
    ) -> StoreResult<Application>;

    /// Persist a new version of an existing application.
    fn update(&self, tx: &mut Tx, namespace: &str, app: Application) -> StoreResult<Application>;

    /// Delete one version, or every version when `version` is `None`.
    fn delete(
        &self,
        tx: &mut Tx,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> StoreResult<()>;
}

/// Cron schedule records keyed by `(namespace, name)`.
pub trait CronRepository<Tx>: Send + Sync {
    fn get(&self, name: &str, namespace: &str) -> StoreResult<Option<Cron>>;

    /// Create a cron record; fails if one already exists.
    fn create(&self, tx: &mut Tx, cron: &Cron) -> StoreResult<Cron>;

    /// Create or overwrite a cron record.
    fn update(&self, tx: &mut Tx, cron: &Cron) -> StoreResult<Cron>;

    /// Delete a cron record. Returns whether it existed.
    fn delete(&self, tx: &mut Tx, name: &str, namespace: &str) -> StoreResult<bool>;
}

/// Nodes and the application versions desired on them.
pub trait NodeRepository<Tx>: Send + Sync {
    fn get_node(&self, namespace: &str, name: &str) -> StoreResult<Option<NodeInfo>>;

    fn list_nodes(&self, namespace: &str) -> StoreResult<Vec<NodeInfo>>;

    /// Register a node or replace its labels. Assignments already recorded
    /// on the node are kept.
    fn put_node(&self, tx: &mut Tx, node: &NodeInfo) -> StoreResult<()>;

    /// Record `app`'s current version on every node its selector matches
    /// and remove it from nodes that hold it without matching. Returns the
    /// matched node ids.
    fn update_node_app_version(
        &self,
        tx: &mut Tx,
        namespace: &str,
        app: &Application,
    ) -> StoreResult<Vec<NodeId>>;

    /// Remove `app` from every node currently holding it, regardless of
    /// its selector. Returns the affected node ids.
    fn delete_node_app_version(
        &self,
        tx: &mut Tx,
        namespace: &str,
        app: &Application,
    ) -> StoreResult<Vec<NodeId>>;
}

/// Derived application → node index.
pub trait IndexRepository<Tx>: Send + Sync {
    /// Replace the node set indexed for `app_name` with exactly `nodes`.
    fn refresh_nodes_index_by_app(
        &self,
        tx: &mut Tx,
        namespace: &str,
        app_name: &str,
        nodes: &[NodeId],
    ) -> StoreResult<()>;

    fn list_nodes_by_app(&self, namespace: &str, app_name: &str) -> StoreResult<Vec<NodeId>>;

    fn list_apps_by_node(&self, namespace: &str, node: &str) -> StoreResult<Vec<String>>;
}

/// Configuration objects keyed by `(namespace, name)`.
pub trait ConfigRepository<Tx>: Send + Sync {
    fn get(&self, namespace: &str, name: &str) -> StoreResult<Option<Configuration>>;

    /// Create or overwrite a configuration.
    fn upsert(&self, tx: &mut Tx, namespace: &str, config: &Configuration)
    -> StoreResult<Configuration>;

    /// Delete a configuration. Deleting an absent configuration returns
    /// `Ok(false)`.
    fn delete(&self, tx: &mut Tx, namespace: &str, name: &str) -> StoreResult<bool>;
}
