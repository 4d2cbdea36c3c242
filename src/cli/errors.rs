//! CLI-specific error types
//!
//! Library errors keep their own codes; the CLI adds codes for its I/O.

use std::fmt;
use std::io;

use serde_json::{json, Value as Json};

use crate::config::ConfigError;
use crate::document::ValueError;
use crate::model::ModelError;
use crate::path::PathError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// stdin/stdout failure or unparsable input
    IoError,
    /// Configuration file error
    ConfigError,
    /// Error raised by a model operation
    Model(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "DOC_CLI_IO_ERROR",
            Self::ConfigError => "DOC_CLI_CONFIG_ERROR",
            Self::Model(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    /// Structured issues, rendered into the error envelope
    issues: Vec<Json>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            issues: Vec::new(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured issues
    pub fn issues(&self) -> &[Json] {
        &self.issues
    }

    /// Build from a model error, rendering issue paths with `wildcard`.
    pub fn from_model(err: ModelError, wildcard: &str) -> Self {
        let issues = match &err {
            ModelError::Definition(e) => render_issues(e.issues(), wildcard),
            ModelError::Validation(e) => render_issues(e.issues(), wildcard),
            _ => Vec::new(),
        };
        Self {
            code: CliErrorCode::Model(err.code()),
            message: err.to_string(),
            issues,
        }
    }
}

fn render_issues(issues: &[crate::schema::ValidationIssue], wildcard: &str) -> Vec<Json> {
    issues
        .iter()
        .map(|issue| json!({"path": issue.path.render(wildcard), "reason": issue.reason}))
        .collect()
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ValueError> for CliError {
    fn from(e: ValueError) -> Self {
        Self::io_error(format!("Invalid document: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(e: PathError) -> Self {
        Self::new(CliErrorCode::Model("DOC_INVALID_PATH"), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
