//! Schema error types
//!
//! Error codes:
//! - DOC_SCHEMA_DEFINITION_INVALID (FATAL): a schema contains a disallowed node
//! - DOC_VALIDATION_FAILED (REJECT): a document does not satisfy its schema
//!
//! Both errors carry the complete, ordered issue list of one traversal.

use std::fmt;

use thiserror::Error;

use crate::path::Path;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, caller may correct and retry
    Reject,
    /// The model cannot be constructed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema contains a structurally disallowed node
    SchemaDefinitionInvalid,
    /// Document violates its schema
    ValidationFailed,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaDefinitionInvalid => "DOC_SCHEMA_DEFINITION_INVALID",
            SchemaErrorCode::ValidationFailed => "DOC_VALIDATION_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SchemaDefinitionInvalid => Severity::Fatal,
            SchemaErrorCode::ValidationFailed => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One offending node: where, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: Path,
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(path: Path, reason: impl Into<String>) -> Self {
        Self {
            path,
            reason: reason.into(),
        }
    }

    pub fn missing_field(path: Path) -> Self {
        Self::new(path, "required field is missing")
    }

    pub fn unknown_field(path: Path) -> Self {
        Self::new(path, "field is not declared in the schema")
    }

    pub fn type_mismatch(path: Path, expected: &str, actual: &str) -> Self {
        Self::new(path, format!("expected {}, got {}", expected, actual))
    }

    pub fn required_removal(path: Path) -> Self {
        Self::new(path, "required field cannot be removed")
    }

    pub fn too_deep(path: Path, max_depth: usize) -> Self {
        Self::new(path, format!("nesting exceeds maximum depth {}", max_depth))
    }

    /// `path: reason` with an explicit wildcard token
    pub fn render(&self, wildcard: &str) -> String {
        let path = self.path.render(wildcard);
        if path.is_empty() {
            format!("$root: {}", self.reason)
        } else {
            format!("{}: {}", path, self.reason)
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(crate::path::DEFAULT_WILDCARD))
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A schema contains nodes that cannot be stored. Raised once, at model
/// definition time, with every offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "[FATAL] DOC_SCHEMA_DEFINITION_INVALID: schema for model '{model}' has {} invalid node(s): {}",
    .issues.len(),
    summarize(.issues)
)]
pub struct SchemaDefinitionError {
    pub model: String,
    pub issues: Vec<ValidationIssue>,
}

impl SchemaDefinitionError {
    pub fn new(model: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Self {
            model: model.into(),
            issues,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        SchemaErrorCode::SchemaDefinitionInvalid
    }

    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

/// A document failed validation against its (possibly narrowed) schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "[REJECT] DOC_VALIDATION_FAILED: document for model '{model}' failed validation with {} issue(s): {}",
    .issues.len(),
    summarize(.issues)
)]
pub struct ValidationError {
    pub model: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(model: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Self {
            model: model.into(),
            issues,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        SchemaErrorCode::ValidationFailed
    }

    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issue at exactly `path`, if any
    pub fn issue_at(&self, path: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|issue| issue.path.to_string() == path)
    }
}

/// Result type for definition checks
pub type DefinitionResult<T> = Result<T, SchemaDefinitionError>;

/// Result type for document validation
pub type ValidationResult<T> = Result<T, ValidationError>;
