//! appgrid-core: shared building blocks for appgrid.
//!
//! - [`types`]: applications, crons, configurations, nodes
//! - [`selector`]: equality-based label selectors
//! - [`classifier`]: generated-configuration ownership by name prefix
//! - [`ports`]: collaborator traits the lifecycle facade drives
//! - [`config`]: `appgrid.toml` parsing

pub mod classifier;
pub mod config;
pub mod error;
pub mod ports;
pub mod selector;
pub mod types;

pub use classifier::GeneratedConfigClassifier;
pub use config::AppgridConfig;
pub use error::{StoreError, StoreResult};
pub use selector::{Selector, SelectorError};
pub use types::*;
