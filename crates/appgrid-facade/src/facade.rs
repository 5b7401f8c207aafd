//! Application lifecycle facade.
//!
//! Creating, updating or deleting an application touches up to four
//! stores: generated configurations, the application's cron record, the
//! application record itself, and the node placement/index pair. Each
//! operation runs all of those writes inside one transaction, so either
//! every store reflects the change or none does.
//!
//! Two invariants are maintained across stores:
//! - an application has a cron record iff its `cron_status` is `Wait`,
//!   and while waiting its selector lives on the cron record only;
//! - the node index for an application is recomputed from its persisted
//!   selector and version on every mutation.
//!
//! Generated configurations orphaned by an update or delete are removed
//! after the owning transaction commits (see [`crate::reconcile`]).

use std::sync::Arc;

use appgrid_core::ports::{
    ApplicationRepository, ConfigRepository, CronRepository, IndexRepository, NodeRepository,
    TransactionManager,
};
use appgrid_core::{
    Application, Configuration, Cron, CronStatus, GeneratedConfigClassifier, NodeId, ResourceKind,
};
use tracing::{debug, info, warn};

use crate::diagnostics::DirtyDataSink;
use crate::error::{FacadeError, FacadeResult, store_err};
use crate::tx::TxGuard;

/// The collaborators a [`Facade`] drives, all sharing one transaction type.
pub struct Stores<Tx> {
    pub tx: Arc<dyn TransactionManager<Tx>>,
    pub app: Arc<dyn ApplicationRepository<Tx>>,
    pub cron: Arc<dyn CronRepository<Tx>>,
    pub node: Arc<dyn NodeRepository<Tx>>,
    pub index: Arc<dyn IndexRepository<Tx>>,
    pub config: Arc<dyn ConfigRepository<Tx>>,
}

impl<Tx> Stores<Tx> {
    /// Use one backend for every collaborator.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: TransactionManager<Tx>
            + ApplicationRepository<Tx>
            + CronRepository<Tx>
            + NodeRepository<Tx>
            + IndexRepository<Tx>
            + ConfigRepository<Tx>
            + 'static,
    {
        Self {
            tx: store.clone(),
            app: store.clone(),
            cron: store.clone(),
            node: store.clone(),
            index: store.clone(),
            config: store,
        }
    }
}

impl<Tx> Clone for Stores<Tx> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            app: self.app.clone(),
            cron: self.cron.clone(),
            node: self.node.clone(),
            index: self.index.clone(),
            config: self.config.clone(),
        }
    }
}

/// Orchestrates application lifecycle operations across stores.
pub struct Facade<Tx> {
    pub(crate) stores: Stores<Tx>,
    pub(crate) classifier: GeneratedConfigClassifier,
    pub(crate) dirty_data: Option<Arc<dyn DirtyDataSink>>,
}

impl<Tx> Facade<Tx> {
    /// Create a facade with the default generated-config prefixes.
    pub fn new(stores: Stores<Tx>) -> Self {
        Self {
            stores,
            classifier: GeneratedConfigClassifier::default(),
            dirty_data: None,
        }
    }

    /// Replace the classifier deciding which configurations are generated.
    pub fn with_classifier(mut self, classifier: GeneratedConfigClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Also deliver dirty-data diagnostics to `sink`.
    pub fn with_dirty_data_sink(mut self, sink: Arc<dyn DirtyDataSink>) -> Self {
        self.dirty_data = Some(sink);
        self
    }

    pub fn stores(&self) -> &Stores<Tx> {
        &self.stores
    }

    pub fn classifier(&self) -> &GeneratedConfigClassifier {
        &self.classifier
    }

    pub(crate) fn begin(&self) -> FacadeResult<TxGuard<'_, Tx>> {
        TxGuard::begin(self.stores.tx.as_ref()).map_err(FacadeError::Begin)
    }

    /// Fetch an application with its effective selector.
    ///
    /// A waiting application's selector is read from its cron record. If
    /// that lookup fails the stored application is returned as is.
    pub fn get_app(
        &self,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> FacadeResult<Application> {
        let found = match self.stores.app.get(namespace, name, version) {
            Ok(found) => found,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(store_err("get", ResourceKind::Application, namespace, name)(e)),
        };
        let Some(mut app) = found else {
            return Err(FacadeError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        };

        if app.is_waiting() {
            match self.stores.cron.get(name, namespace) {
                Ok(Some(cron)) => app.selector = cron.selector,
                Ok(None) => warn!(namespace, name, "waiting application has no cron record"),
                Err(e) => warn!(namespace, name, error = %e, "cron lookup failed"),
            }
        }
        Ok(app)
    }

    /// Create an application together with its generated configurations,
    /// its cron record (when waiting) and its node placement.
    pub fn create_app(
        &self,
        namespace: &str,
        base: Option<&Application>,
        mut app: Application,
        configs: &[Configuration],
    ) -> FacadeResult<Application> {
        app.namespace = namespace.to_string();
        let mut guard = self.begin()?;
        let tx = guard.tx();

        self.upsert_generated_configs(tx, namespace, configs)?;

        if app.is_waiting() {
            self.stores
                .cron
                .create(tx, &Cron::for_app(&app))
                .map_err(store_err("create", ResourceKind::Cron, namespace, &app.name))?;
            app.selector.clear();
        }

        let name = app.name.clone();
        let app = self
            .stores
            .app
            .create_with_base(tx, namespace, app, base)
            .map_err(store_err("create", ResourceKind::Application, namespace, &name))?;

        self.update_node_and_app_index(tx, namespace, &app)?;

        guard.commit().map_err(FacadeError::Commit)?;
        info!(namespace, name = %app.name, version = %app.version, "application created");
        Ok(app)
    }

    /// Move an application from `old_app` to `app`, keeping its cron
    /// record, node placement and generated configurations in step.
    pub fn update_app(
        &self,
        namespace: &str,
        old_app: &Application,
        mut app: Application,
        configs: &[Configuration],
    ) -> FacadeResult<Application> {
        app.namespace = namespace.to_string();
        let mut guard = self.begin()?;
        let tx = guard.tx();

        self.upsert_generated_configs(tx, namespace, configs)?;

        if app.is_waiting() {
            self.stores
                .cron
                .update(tx, &Cron::for_app(&app))
                .map_err(store_err("update", ResourceKind::Cron, namespace, &app.name))?;
            app.selector.clear();
        }
        if old_app.is_waiting() {
            match app.cron_status {
                CronStatus::NotSet => {
                    self.stores
                        .cron
                        .delete(tx, &app.name, namespace)
                        .map_err(store_err("delete", ResourceKind::Cron, namespace, &app.name))?;
                }
                // TODO: decide whether Wait -> Scheduled should drop the cron
                // record; today it is left for the cron engine to retire.
                CronStatus::Scheduled => {
                    debug!(namespace, name = %app.name, "cron record kept on wait -> scheduled")
                }
                CronStatus::Wait => {}
            }
        }

        let name = app.name.clone();
        let app = self
            .stores
            .app
            .update(tx, namespace, app)
            .map_err(store_err("update", ResourceKind::Application, namespace, &name))?;

        if old_app.selector != app.selector {
            self.delete_node_and_app_index(tx, namespace, old_app)?;
        }
        self.update_node_and_app_index(tx, namespace, &app)?;

        guard.commit().map_err(FacadeError::Commit)?;
        info!(namespace, name = %app.name, version = %app.version, "application updated");

        self.clean_generated_configs(namespace, configs, old_app);
        Ok(app)
    }

    /// Delete an application, its cron record and its node placement,
    /// then reclaim the generated configurations it referenced.
    pub fn delete_app(&self, namespace: &str, name: &str, app: &Application) -> FacadeResult<()> {
        let mut guard = self.begin()?;
        let tx = guard.tx();

        if app.is_waiting() {
            self.stores
                .cron
                .delete(tx, name, namespace)
                .map_err(store_err("delete", ResourceKind::Cron, namespace, name))?;
        }

        self.stores
            .app
            .delete(tx, namespace, name, None)
            .map_err(store_err("delete", ResourceKind::Application, namespace, name))?;

        self.delete_node_and_app_index(tx, namespace, app)?;

        guard.commit().map_err(FacadeError::Commit)?;
        info!(namespace, name, "application deleted");

        self.clean_generated_configs(namespace, &[], app);
        Ok(())
    }

    /// Place `app` on the nodes its selector matches and make the index
    /// hold exactly those nodes.
    pub fn update_node_and_app_index(
        &self,
        tx: &mut Tx,
        namespace: &str,
        app: &Application,
    ) -> FacadeResult<Vec<NodeId>> {
        let nodes = self
            .stores
            .node
            .update_node_app_version(tx, namespace, app)
            .map_err(store_err("place", ResourceKind::Node, namespace, &app.name))?;
        self.stores
            .index
            .refresh_nodes_index_by_app(tx, namespace, &app.name, &nodes)
            .map_err(store_err("refresh", ResourceKind::Index, namespace, &app.name))?;
        debug!(namespace, app = %app.name, ?nodes, "node index updated");
        Ok(nodes)
    }

    /// Remove `app` from every node holding it and empty its index.
    pub fn delete_node_and_app_index(
        &self,
        tx: &mut Tx,
        namespace: &str,
        app: &Application,
    ) -> FacadeResult<Vec<NodeId>> {
        let nodes = self
            .stores
            .node
            .delete_node_app_version(tx, namespace, app)
            .map_err(store_err("unplace", ResourceKind::Node, namespace, &app.name))?;
        self.stores
            .index
            .refresh_nodes_index_by_app(tx, namespace, &app.name, &[])
            .map_err(store_err("refresh", ResourceKind::Index, namespace, &app.name))?;
        debug!(namespace, app = %app.name, ?nodes, "node index cleared");
        Ok(nodes)
    }

    fn upsert_generated_configs(
        &self,
        tx: &mut Tx,
        namespace: &str,
        configs: &[Configuration],
    ) -> FacadeResult<()> {
        for cfg in configs {
            self.stores
                .config
                .upsert(tx, namespace, cfg)
                .map_err(store_err("upsert", ResourceKind::Config, namespace, &cfg.name))?;
        }
        Ok(())
    }
}
