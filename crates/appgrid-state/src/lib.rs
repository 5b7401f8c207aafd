//! appgrid-state: embedded state store for appgrid.
//!
//! Backed by [redb](https://docs.rs/redb), implements every collaborator
//! port the lifecycle facade drives: applications (with version history),
//! crons, nodes, the application → node index, and configurations.
//!
//! # Architecture
//!
//! All domain types are JSON-serialized into redb's `&[u8]` value columns.
//! Composite keys (`{namespace}/{name}`, `{namespace}/{name}:{version}`)
//! enable prefix scans for related records.
//!
//! The transaction handle is redb's own [`redb::WriteTransaction`]: redb
//! admits one writer at a time, so a facade operation holds the writer
//! from `begin_tx` until commit or rollback. Dropping an unfinished handle
//! aborts it.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).

pub mod applications;
pub mod configs;
pub mod crons;
pub mod error;
pub mod index;
pub mod nodes;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use store::{StateStore, Txn};
