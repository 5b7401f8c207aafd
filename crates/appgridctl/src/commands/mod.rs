pub mod app;
pub mod node;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use appgrid_core::AppgridConfig;
use appgrid_facade::{Facade, Stores};
use appgrid_state::{StateStore, Txn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn open_store(config: &AppgridConfig) -> anyhow::Result<Arc<StateStore>> {
    let path = &config.store.path;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let store = StateStore::open(path).with_context(|| format!("opening {}", path.display()))?;
    debug!(path = %path.display(), "state store opened");
    Ok(Arc::new(store))
}

pub fn facade(config: &AppgridConfig, store: Arc<StateStore>) -> Facade<Txn> {
    Facade::new(Stores::from_shared(store)).with_classifier(config.classifier())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
