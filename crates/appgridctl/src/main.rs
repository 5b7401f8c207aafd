//! appgridctl: operate on an appgrid store from the command line.
//!
//! ```text
//! appgridctl node put node.json
//! appgridctl create default app.json --configs configs.json
//! appgridctl get default my-app
//! appgridctl index default my-app
//! ```

use std::path::PathBuf;

use anyhow::Context;
use appgrid_core::AppgridConfig;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "appgridctl",
    about = "appgrid: application lifecycle control",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to appgrid.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the store path from the config file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an application with its effective selector
    Get {
        namespace: String,
        name: String,
        /// Pinned version (default: latest)
        #[arg(long)]
        version: Option<String>,
    },
    /// Create an application from a JSON manifest
    Create {
        namespace: String,
        manifest: PathBuf,
        /// Template application, as `namespace/name`
        #[arg(long)]
        base: Option<String>,
        /// JSON array of generated configurations
        #[arg(long)]
        configs: Option<PathBuf>,
    },
    /// Replace an application with a new JSON manifest
    Update {
        namespace: String,
        manifest: PathBuf,
        /// JSON array of generated configurations
        #[arg(long)]
        configs: Option<PathBuf>,
    },
    /// Delete an application and everything derived from it
    Delete { namespace: String, name: String },
    /// Register and inspect nodes
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// List the nodes an application is assigned to
    Index { namespace: String, app: String },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand)]
enum NodeAction {
    /// Register or replace a node from a JSON manifest
    Put { manifest: PathBuf },
    /// List nodes in a namespace
    List { namespace: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppgridConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppgridConfig::default(),
    };
    if let Some(store) = cli.store {
        config.store.path = store;
    }
    init_tracing(&config)?;

    match cli.command {
        Commands::Get {
            namespace,
            name,
            version,
        } => commands::app::get(&config, &namespace, &name, version.as_deref()),
        Commands::Create {
            namespace,
            manifest,
            base,
            configs,
        } => commands::app::create(
            &config,
            &namespace,
            &manifest,
            base.as_deref(),
            configs.as_deref(),
        ),
        Commands::Update {
            namespace,
            manifest,
            configs,
        } => commands::app::update(&config, &namespace, &manifest, configs.as_deref()),
        Commands::Delete { namespace, name } => commands::app::delete(&config, &namespace, &name),
        Commands::Node { action } => match action {
            NodeAction::Put { manifest } => commands::node::put(&config, &manifest),
            NodeAction::List { namespace } => commands::node::list(&config, &namespace),
        },
        Commands::Index { namespace, app } => commands::node::index(&config, &namespace, &app),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins
/// over the configured filter.
fn init_tracing(config: &AppgridConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log.filter))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
