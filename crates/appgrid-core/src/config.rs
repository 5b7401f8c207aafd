//! appgrid.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classifier::{
    FUNCTION_CONFIG_PREFIX, FUNCTION_PROGRAM_CONFIG_PREFIX, GeneratedConfigClassifier,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppgridConfig {
    pub store: StoreConfig,
    pub generated_configs: GeneratedConfigsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// redb database file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedConfigsConfig {
    /// Name prefixes that mark a configuration as generated for a
    /// function application.
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` overrides it.
    pub filter: String,
    pub json: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("appgrid.redb"),
        }
    }
}

impl Default for GeneratedConfigsConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![
                FUNCTION_CONFIG_PREFIX.to_string(),
                FUNCTION_PROGRAM_CONFIG_PREFIX.to_string(),
            ],
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl AppgridConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppgridConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Classifier built from the configured generated-config prefixes.
    pub fn classifier(&self) -> GeneratedConfigClassifier {
        GeneratedConfigClassifier::new(self.generated_configs.prefixes.iter().cloned())
    }
}
