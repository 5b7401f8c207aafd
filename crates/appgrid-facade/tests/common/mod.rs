//! Shared fixtures for facade integration tests.
//!
//! [`Faulty`] wraps a real in-memory [`StateStore`] and can be told to
//! fail or panic at one named step, while counting how transactions end.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use appgrid_core::ports::{
    ApplicationRepository, ConfigRepository, CronRepository, IndexRepository, NodeRepository,
    TransactionManager,
};
use appgrid_core::{
    Application, AppType, Configuration, Cron, CronStatus, NodeId, NodeInfo, StoreError,
    StoreResult, Volume,
};
use appgrid_facade::{Facade, Stores};
use appgrid_state::{StateStore, Txn};

pub const NS: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
    ConfigUpsert,
    ConfigDelete,
    CronCreate,
    CronUpdate,
    CronDelete,
    AppCreate,
    AppUpdate,
    AppDelete,
    NodeUpdate,
    NodeDelete,
    IndexRefresh,
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultMode {
    Error,
    Panic,
}

pub struct Faulty {
    pub inner: StateStore,
    fault: Mutex<Option<(FaultPoint, FaultMode)>>,
    fault_target: Mutex<Option<String>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl Faulty {
    pub fn new() -> Self {
        Self {
            inner: StateStore::open_in_memory().unwrap(),
            fault: Mutex::new(None),
            fault_target: Mutex::new(None),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        }
    }

    pub fn fail_at(&self, point: FaultPoint, mode: FaultMode) {
        *self.fault.lock().unwrap() = Some((point, mode));
        *self.fault_target.lock().unwrap() = None;
    }

    /// Like [`Faulty::fail_at`], but only for calls on the resource `name`.
    pub fn fail_at_for(&self, point: FaultPoint, mode: FaultMode, name: &str) {
        *self.fault.lock().unwrap() = Some((point, mode));
        *self.fault_target.lock().unwrap() = Some(name.to_string());
    }

    pub fn heal(&self) {
        *self.fault.lock().unwrap() = None;
        *self.fault_target.lock().unwrap() = None;
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub fn reset_counters(&self) {
        self.commits.store(0, Ordering::SeqCst);
        self.rollbacks.store(0, Ordering::SeqCst);
    }

    fn check(&self, point: FaultPoint) -> StoreResult<()> {
        self.check_for(point, None)
    }

    fn check_for(&self, point: FaultPoint, name: Option<&str>) -> StoreResult<()> {
        let target = self.fault_target.lock().unwrap().clone();
        if target.is_some() && target.as_deref() != name {
            return Ok(());
        }
        let fault = *self.fault.lock().unwrap();
        match fault {
            Some((p, FaultMode::Error)) if p == point => {
                Err(StoreError::Backend(format!("injected fault at {point:?}")))
            }
            Some((p, FaultMode::Panic)) if p == point => panic!("injected panic at {point:?}"),
            _ => Ok(()),
        }
    }
}

impl TransactionManager<Txn> for Faulty {
    fn begin_tx(&self) -> StoreResult<Txn> {
        self.inner.begin_tx()
    }

    fn commit(&self, tx: Txn) -> StoreResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.check(FaultPoint::Commit) {
            // A failed commit leaves nothing behind.
            TransactionManager::rollback(&self.inner, tx)?;
            return Err(e);
        }
        TransactionManager::commit(&self.inner, tx)
    }

    fn rollback(&self, tx: Txn) -> StoreResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        TransactionManager::rollback(&self.inner, tx)
    }
}

impl ApplicationRepository<Txn> for Faulty {
    fn get(
        &self,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> StoreResult<Option<Application>> {
        ApplicationRepository::get(&self.inner, namespace, name, version)
    }

    fn create_with_base(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app: Application,
        base: Option<&Application>,
    ) -> StoreResult<Application> {
        self.check(FaultPoint::AppCreate)?;
        self.inner.create_with_base(tx, namespace, app, base)
    }

    fn update(&self, tx: &mut Txn, namespace: &str, app: Application) -> StoreResult<Application> {
        self.check(FaultPoint::AppUpdate)?;
        ApplicationRepository::update(&self.inner, tx, namespace, app)
    }

    fn delete(
        &self,
        tx: &mut Txn,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> StoreResult<()> {
        self.check(FaultPoint::AppDelete)?;
        ApplicationRepository::delete(&self.inner, tx, namespace, name, version)
    }
}

impl CronRepository<Txn> for Faulty {
    fn get(&self, name: &str, namespace: &str) -> StoreResult<Option<Cron>> {
        CronRepository::get(&self.inner, name, namespace)
    }

    fn create(&self, tx: &mut Txn, cron: &Cron) -> StoreResult<Cron> {
        self.check(FaultPoint::CronCreate)?;
        CronRepository::create(&self.inner, tx, cron)
    }

    fn update(&self, tx: &mut Txn, cron: &Cron) -> StoreResult<Cron> {
        self.check(FaultPoint::CronUpdate)?;
        CronRepository::update(&self.inner, tx, cron)
    }

    fn delete(&self, tx: &mut Txn, name: &str, namespace: &str) -> StoreResult<bool> {
        self.check(FaultPoint::CronDelete)?;
        CronRepository::delete(&self.inner, tx, name, namespace)
    }
}

impl NodeRepository<Txn> for Faulty {
    fn get_node(&self, namespace: &str, name: &str) -> StoreResult<Option<NodeInfo>> {
        self.inner.get_node(namespace, name)
    }

    fn list_nodes(&self, namespace: &str) -> StoreResult<Vec<NodeInfo>> {
        self.inner.list_nodes(namespace)
    }

    fn put_node(&self, tx: &mut Txn, node: &NodeInfo) -> StoreResult<()> {
        self.inner.put_node(tx, node)
    }

    fn update_node_app_version(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app: &Application,
    ) -> StoreResult<Vec<NodeId>> {
        self.check(FaultPoint::NodeUpdate)?;
        self.inner.update_node_app_version(tx, namespace, app)
    }

    fn delete_node_app_version(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app: &Application,
    ) -> StoreResult<Vec<NodeId>> {
        self.check(FaultPoint::NodeDelete)?;
        self.inner.delete_node_app_version(tx, namespace, app)
    }
}

impl IndexRepository<Txn> for Faulty {
    fn refresh_nodes_index_by_app(
        &self,
        tx: &mut Txn,
        namespace: &str,
        app_name: &str,
        nodes: &[NodeId],
    ) -> StoreResult<()> {
        self.check(FaultPoint::IndexRefresh)?;
        self.inner.refresh_nodes_index_by_app(tx, namespace, app_name, nodes)
    }

    fn list_nodes_by_app(&self, namespace: &str, app_name: &str) -> StoreResult<Vec<NodeId>> {
        self.inner.list_nodes_by_app(namespace, app_name)
    }

    fn list_apps_by_node(&self, namespace: &str, node: &str) -> StoreResult<Vec<String>> {
        self.inner.list_apps_by_node(namespace, node)
    }
}

impl ConfigRepository<Txn> for Faulty {
    fn get(&self, namespace: &str, name: &str) -> StoreResult<Option<Configuration>> {
        ConfigRepository::get(&self.inner, namespace, name)
    }

    fn upsert(
        &self,
        tx: &mut Txn,
        namespace: &str,
        config: &Configuration,
    ) -> StoreResult<Configuration> {
        self.check(FaultPoint::ConfigUpsert)?;
        self.inner.upsert(tx, namespace, config)
    }

    fn delete(&self, tx: &mut Txn, namespace: &str, name: &str) -> StoreResult<bool> {
        self.check_for(FaultPoint::ConfigDelete, Some(name))?;
        ConfigRepository::delete(&self.inner, tx, namespace, name)
    }
}

/// A facade over a fresh store seeded with nodes n1, n2 (`env=prod`)
/// and n3 (`env=staging`).
pub fn harness() -> (Arc<Faulty>, Facade<Txn>) {
    let store = Arc::new(Faulty::new());
    seed_nodes(&store.inner);
    let facade = Facade::new(Stores::from_shared(store.clone()));
    (store, facade)
}

pub fn seed_nodes(store: &StateStore) {
    let mut tx = store.begin_tx().unwrap();
    for (name, env) in [("n1", "prod"), ("n2", "prod"), ("n3", "staging")] {
        let node = NodeInfo {
            namespace: NS.to_string(),
            name: name.to_string(),
            labels: HashMap::from([("env".to_string(), env.to_string())]),
            ..Default::default()
        };
        store.put_node(&mut tx, &node).unwrap();
    }
    TransactionManager::commit(store, tx).unwrap();
}

/// Re-register `name` with a new `env` label and no assignment state.
pub fn relabel(store: &Faulty, name: &str, env: &str) {
    let node = NodeInfo {
        namespace: NS.to_string(),
        name: name.to_string(),
        labels: HashMap::from([("env".to_string(), env.to_string())]),
        ..Default::default()
    };
    let inner = &store.inner;
    let mut tx = inner.begin_tx().unwrap();
    inner.put_node(&mut tx, &node).unwrap();
    TransactionManager::commit(inner, tx).unwrap();
}

pub fn function_app(name: &str, selector: &str, configs: &[&str]) -> Application {
    Application {
        namespace: NS.to_string(),
        name: name.to_string(),
        app_type: AppType::Function,
        selector: selector.to_string(),
        volumes: configs
            .iter()
            .enumerate()
            .map(|(i, c)| Volume::config(&format!("vol-{i}"), c))
            .collect(),
        ..Default::default()
    }
}

pub fn waiting(mut app: Application, cron_time: u64) -> Application {
    app.cron_status = CronStatus::Wait;
    app.cron_time = Some(cron_time);
    app
}

pub fn config(name: &str) -> Configuration {
    Configuration {
        namespace: NS.to_string(),
        name: name.to_string(),
        data: BTreeMap::from([("index.py".to_string(), format!("# {name}"))]),
        ..Default::default()
    }
}

/// Everything a facade operation on `app` could have written.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    pub app: Option<Application>,
    pub cron: Option<Cron>,
    pub nodes: Vec<NodeInfo>,
    pub index: Vec<NodeId>,
    pub configs: Vec<Option<Configuration>>,
}

pub fn snapshot(store: &Faulty, app: &str, configs: &[&str]) -> Snapshot {
    let inner = &store.inner;
    Snapshot {
        app: ApplicationRepository::get(inner, NS, app, None).unwrap(),
        cron: CronRepository::get(inner, app, NS).unwrap(),
        nodes: inner.list_nodes(NS).unwrap(),
        index: inner.list_nodes_by_app(NS, app).unwrap(),
        configs: configs
            .iter()
            .map(|c| ConfigRepository::get(inner, NS, c).unwrap())
            .collect(),
    }
}

pub fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| n.to_string()).collect()
}
