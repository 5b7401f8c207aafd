//! redb table definitions for the appgrid state store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized domain types).
//! Composite keys follow the pattern `{namespace}/{name}`, with
//! `{namespace}/{name}:{version}` for application history.

use redb::TableDefinition;

/// Latest application version keyed by `{namespace}/{name}`.
pub const APPLICATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("applications");

/// Every retained application version keyed by `{namespace}/{name}:{version}`.
pub const APPLICATION_HISTORY: TableDefinition<&str, &[u8]> =
    TableDefinition::new("application_history");

/// Cron schedules keyed by `{namespace}/{name}`.
pub const CRONS: TableDefinition<&str, &[u8]> = TableDefinition::new("crons");

/// Node info keyed by `{namespace}/{name}`.
pub const NODES: TableDefinition<&str, &[u8]> = TableDefinition::new("nodes");

/// Sorted node id lists keyed by `{namespace}/{app_name}`.
pub const APP_NODE_INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("app_node_index");

/// Configurations keyed by `{namespace}/{name}`.
pub const CONFIGS: TableDefinition<&str, &[u8]> = TableDefinition::new("configs");
