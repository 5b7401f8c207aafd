use std::path::Path;

use anyhow::Context;
use appgrid_core::{AppgridConfig, Application, Configuration};

use super::{facade, open_store, print_json, read_json};

pub fn get(
    config: &AppgridConfig,
    namespace: &str,
    name: &str,
    version: Option<&str>,
) -> anyhow::Result<()> {
    let facade = facade(config, open_store(config)?);
    print_json(&facade.get_app(namespace, name, version)?)
}

pub fn create(
    config: &AppgridConfig,
    namespace: &str,
    manifest: &Path,
    base: Option<&str>,
    configs: Option<&Path>,
) -> anyhow::Result<()> {
    let facade = facade(config, open_store(config)?);
    let app: Application = read_json(manifest)?;
    let configs = read_configs(configs)?;

    let base = match base {
        Some(reference) => {
            let (ns, name) = reference
                .split_once('/')
                .with_context(|| format!("base must be namespace/name, got {reference:?}"))?;
            Some(facade.get_app(ns, name, None)?)
        }
        None => None,
    };

    let created = facade.create_app(namespace, base.as_ref(), app, &configs)?;
    print_json(&created)
}

pub fn update(
    config: &AppgridConfig,
    namespace: &str,
    manifest: &Path,
    configs: Option<&Path>,
) -> anyhow::Result<()> {
    let facade = facade(config, open_store(config)?);
    let app: Application = read_json(manifest)?;
    let configs = read_configs(configs)?;

    let old = facade.get_app(namespace, &app.name, None)?;
    let updated = facade.update_app(namespace, &old, app, &configs)?;
    print_json(&updated)
}

pub fn delete(config: &AppgridConfig, namespace: &str, name: &str) -> anyhow::Result<()> {
    let facade = facade(config, open_store(config)?);
    let app = facade.get_app(namespace, name, None)?;
    facade.delete_app(namespace, name, &app)?;
    println!("deleted {namespace}/{name}");
    Ok(())
}

fn read_configs(path: Option<&Path>) -> anyhow::Result<Vec<Configuration>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}
