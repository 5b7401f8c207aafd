//! Equality-based label selectors.
//!
//! A selector is a comma-separated list of requirements, all of which
//! must hold for a node to match:
//!
//! ```text
//! env=prod,tier!=edge,gpu,!maintenance
//! ```
//!
//! Supported requirement forms are `key=value`, `key==value`,
//! `key!=value`, `key` (label present) and `!key` (label absent).
//! The empty selector matches no node.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([-a-z0-9.]*[a-z0-9])?/)?[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$")
        .expect("label key pattern compiles")
});

static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?)?$")
        .expect("label value pattern compiles")
});

/// Errors produced while parsing a selector expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid selector {expr:?}: {reason}")]
pub struct SelectorError {
    pub expr: String,
    pub reason: String,
}

/// A single label requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Equals { key: String, value: String },
    NotEquals { key: String, value: String },
    Exists(String),
    NotExists(String),
}

impl Requirement {
    fn matches(&self, labels: &HashMap<String, String>) -> bool {
        match self {
            Requirement::Equals { key, value } => labels.get(key).is_some_and(|v| v == value),
            // A missing label satisfies `!=`, as with Kubernetes selectors.
            Requirement::NotEquals { key, value } => labels.get(key).is_none_or(|v| v != value),
            Requirement::Exists(key) => labels.contains_key(key),
            Requirement::NotExists(key) => !labels.contains_key(key),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Equals { key, value } => write!(f, "{key}={value}"),
            Requirement::NotEquals { key, value } => write!(f, "{key}!={value}"),
            Requirement::Exists(key) => write!(f, "{key}"),
            Requirement::NotExists(key) => write!(f, "!{key}"),
        }
    }
}

/// A parsed label selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// Parse a selector expression. Surrounding whitespace is ignored.
    pub fn parse(expr: &str) -> Result<Self, SelectorError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let invalid = |reason: String| SelectorError {
            expr: expr.to_string(),
            reason,
        };

        let mut requirements = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid("empty requirement".to_string()));
            }

            let req = if let Some((key, value)) = part.split_once("!=") {
                Requirement::NotEquals {
                    key: key.trim().to_string(),
                    value: value.trim().to_string(),
                }
            } else if let Some((key, value)) = part.split_once("==") {
                Requirement::Equals {
                    key: key.trim().to_string(),
                    value: value.trim().to_string(),
                }
            } else if let Some((key, value)) = part.split_once('=') {
                Requirement::Equals {
                    key: key.trim().to_string(),
                    value: value.trim().to_string(),
                }
            } else if let Some(key) = part.strip_prefix('!') {
                Requirement::NotExists(key.trim().to_string())
            } else {
                Requirement::Exists(part.to_string())
            };

            let (key, value) = match &req {
                Requirement::Equals { key, value } | Requirement::NotEquals { key, value } => {
                    (key.as_str(), Some(value.as_str()))
                }
                Requirement::Exists(key) | Requirement::NotExists(key) => (key.as_str(), None),
            };
            if !KEY_RE.is_match(key) {
                return Err(invalid(format!("bad label key {key:?}")));
            }
            if let Some(value) = value.filter(|v| !VALUE_RE.is_match(v)) {
                return Err(invalid(format!("bad label value {value:?}")));
            }

            requirements.push(req);
        }

        Ok(Self { requirements })
    }

    /// True when the selector has no requirements.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Whether a node carrying `labels` is targeted by this selector.
    ///
    /// The empty selector targets nothing.
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        !self.is_empty() && self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.requirements.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}
