//! Ownership classification for generated configurations.
//!
//! Function applications get configuration objects created on their
//! behalf (handler code bundles, runtime settings). Those objects are
//! told apart from user-authored configurations purely by a reserved
//! name prefix.

use serde::{Deserialize, Serialize};

/// Prefix of configurations holding generated function settings.
pub const FUNCTION_CONFIG_PREFIX: &str = "baetyl-function-config";

/// Prefix of configurations holding generated function program bundles.
pub const FUNCTION_PROGRAM_CONFIG_PREFIX: &str = "baetyl-function-program-config";

/// Decides whether a configuration name marks it as generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedConfigClassifier {
    prefixes: Vec<String>,
}

impl GeneratedConfigClassifier {
    /// Classifier over an explicit prefix set. Empty prefixes are dropped,
    /// since they would claim every configuration.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// True when `name` carries one of the reserved prefixes.
    pub fn is_generated(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

impl Default for GeneratedConfigClassifier {
    fn default() -> Self {
        Self::new([FUNCTION_CONFIG_PREFIX, FUNCTION_PROGRAM_CONFIG_PREFIX])
    }
}
