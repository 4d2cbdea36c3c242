//! Engine configuration
//!
//! One immutable value threaded through every traversal. It carries the
//! identifier field name, the wildcard token, the traversal depth bound and the
//! policy switches for identifier optionality and unknown keys.

use std::fs;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::{Path, PathResult, DEFAULT_WILDCARD};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("invalid config JSON: {0}")]
    Malformed(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How document validation treats keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Undeclared keys are reported as issues
    #[default]
    Reject,
    /// Undeclared keys are ignored
    Allow,
}

fn default_id_field() -> String {
    "_id".to_string()
}

fn default_wildcard() -> String {
    DEFAULT_WILDCARD.to_string()
}

fn default_max_depth() -> usize {
    64
}

/// Configuration shared by validation, deletion, narrowing and models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Name of the identifier field (default `_id`)
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Wildcard token in path strings (default `<idx>`)
    #[serde(default = "default_wildcard")]
    pub wildcard: String,

    /// Maximum nesting depth any traversal descends (default 64)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Accept an Optional-wrapped identifier field (default false)
    #[serde(default)]
    pub allow_optional_id: bool,

    /// Unknown key policy for full-document validation.
    /// Narrowed update payloads always reject unknown keys.
    #[serde(default)]
    pub unknown_keys: UnknownKeys,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            wildcard: default_wildcard(),
            max_depth: default_max_depth(),
            allow_optional_id: false,
            unknown_keys: UnknownKeys::Reject,
        }
    }
}

impl SchemaConfig {
    /// Loads and validates a JSON config file.
    pub fn load(path: &FsPath) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: SchemaConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the path language relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.wildcard.is_empty() || self.wildcard.contains('.') {
            return Err(ConfigError::Invalid(format!(
                "wildcard token '{}' must be non-empty and contain no '.'",
                self.wildcard
            )));
        }
        if self.wildcard.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Invalid(format!(
                "wildcard token '{}' cannot be numeric",
                self.wildcard
            )));
        }
        if self.id_field.is_empty() || self.id_field.contains('.') {
            return Err(ConfigError::Invalid(format!(
                "id_field '{}' must be a single non-empty segment",
                self.id_field
            )));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be > 0".into()));
        }
        Ok(())
    }

    /// Parses a path string with this config's wildcard token.
    pub fn parse_path(&self, raw: &str) -> PathResult<Path> {
        Path::parse(raw, &self.wildcard)
    }

    /// Path of the identifier field.
    pub fn id_path(&self) -> Path {
        Path::root().child(self.id_field.clone())
    }

    /// Same config with a different unknown key policy.
    pub fn with_unknown_keys(&self, unknown_keys: UnknownKeys) -> Self {
        Self {
            unknown_keys,
            ..self.clone()
        }
    }
}
