//! Domain types for appgrid.
//!
//! These types represent applications, their cron schedules, the nodes
//! they are deployed to, and the configuration objects they mount. All
//! types are serializable to/from JSON for storage and for the CLI.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Unique identifier for a node within a namespace.
pub type NodeId = String;

// ── Application ───────────────────────────────────────────────────

/// A versioned application definition, identified by
/// `(namespace, name, version)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Application {
    pub namespace: String,
    pub name: String,
    /// Assigned by the application store; empty until first persisted.
    pub version: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
    pub labels: HashMap<String, String>,
    pub description: String,
    /// Node-targeting label selector. Empty while the application waits
    /// on its cron schedule; the cron record holds it instead.
    pub selector: String,
    pub cron_status: CronStatus,
    /// Unix timestamp (seconds) at which a waiting application fires.
    pub cron_time: Option<u64>,
    pub services: Vec<Service>,
    pub volumes: Vec<Volume>,
    /// Unix timestamp (seconds) when the first version was created.
    pub created_at: u64,
    /// Unix timestamp (seconds) of the latest version.
    pub updated_at: u64,
}

/// Workload flavour of an application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    #[default]
    Container,
    Function,
}

/// Lifecycle state of an application's scheduled-execution intent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CronStatus {
    #[default]
    NotSet,
    Wait,
    Scheduled,
}

/// A service (container or function runtime) inside an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub image: String,
    /// Function handlers served by this service (function apps only).
    pub functions: Vec<String>,
}

/// A named volume mounted by the application's services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Volume {
    pub name: String,
    pub source: VolumeSource,
}

/// Where a volume's content comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VolumeSource {
    Config { name: String },
    Secret { name: String },
    HostPath { path: String },
    EmptyDir,
}

impl Volume {
    /// Volume backed by the named configuration.
    pub fn config(name: &str, config_name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: VolumeSource::Config {
                name: config_name.to_string(),
            },
        }
    }

    /// Name of the referenced configuration, if this volume has one.
    pub fn config_name(&self) -> Option<&str> {
        match &self.source {
            VolumeSource::Config { name } => Some(name),
            _ => None,
        }
    }
}

impl Application {
    /// Build the composite key for the applications table.
    pub fn table_key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }

    /// Build the composite key for the application history table.
    pub fn history_key(&self) -> String {
        history_key(&self.namespace, &self.name, &self.version)
    }

    /// Whether the authoritative selector lives in a cron record.
    pub fn is_waiting(&self) -> bool {
        self.cron_status == CronStatus::Wait
    }

    /// Names of every configuration referenced by a volume, in volume order.
    pub fn config_names(&self) -> impl Iterator<Item = &str> {
        self.volumes.iter().filter_map(Volume::config_name)
    }
}

// ── Cron ──────────────────────────────────────────────────────────

/// Cron schedule for an application in [`CronStatus::Wait`].
///
/// One-to-one with its owning application, keyed by `(namespace, name)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Cron {
    pub namespace: String,
    pub name: String,
    pub selector: String,
    pub cron_time: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Cron {
    /// Derive the cron record that carries a waiting application's selector.
    pub fn for_app(app: &Application) -> Self {
        Self {
            namespace: app.namespace.clone(),
            name: app.name.clone(),
            selector: app.selector.clone(),
            cron_time: app.cron_time,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Build the composite key for the crons table.
    pub fn table_key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }
}

// ── Configuration ─────────────────────────────────────────────────

/// A configuration object mounted into applications through volumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Configuration {
    pub namespace: String,
    pub name: String,
    pub labels: HashMap<String, String>,
    pub data: BTreeMap<String, String>,
    /// Incremented by the configuration store on every upsert.
    pub version: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Configuration {
    /// Build the composite key for the configs table.
    pub fn table_key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }
}

// ── Node ──────────────────────────────────────────────────────────

/// A node that applications can be deployed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NodeInfo {
    pub namespace: String,
    pub name: NodeId,
    /// Labels matched against application selectors.
    pub labels: HashMap<String, String>,
    /// Desired application set: application name → version.
    pub app_versions: BTreeMap<String, String>,
    pub updated_at: u64,
}

impl NodeInfo {
    /// Build the composite key for the nodes table.
    pub fn table_key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }
}

// ── Resource kinds ────────────────────────────────────────────────

/// Kind of stored resource, used to label errors and diagnostics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Application,
    Cron,
    Node,
    Index,
    Config,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Application => "application",
            ResourceKind::Cron => "cron",
            ResourceKind::Node => "node",
            ResourceKind::Index => "index",
            ResourceKind::Config => "config",
        };
        f.write_str(s)
    }
}

/// `{namespace}/{name}` key shared by every namespaced table.
pub fn object_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// `{namespace}/{name}:{version}` key for versioned history rows.
pub fn history_key(namespace: &str, name: &str, version: &str) -> String {
    format!("{namespace}/{name}:{version}")
}
