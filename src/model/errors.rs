//! Model error types
//!
//! Error codes:
//! - DOC_SCHEMA_DEFINITION_INVALID (FATAL)
//! - DOC_VALIDATION_FAILED (REJECT)
//! - DOC_INVALID_PATH (REJECT)
//! - DOC_MALFORMED_MODEL (FATAL)
//! - DOC_DUPLICATE_MODEL (REJECT)
//! - DOC_UNKNOWN_MODEL (REJECT)

use thiserror::Error;

use crate::path::PathError;
use crate::schema::{SchemaDefinitionError, Severity, ValidationError};

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by models and the model registry
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error(transparent)]
    Definition(#[from] SchemaDefinitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("[REJECT] DOC_INVALID_PATH: {0}")]
    Path(#[from] PathError),

    /// Unreadable or unparsable model file
    #[error("[FATAL] DOC_MALFORMED_MODEL: malformed model file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Model names are unique within a registry
    #[error("[REJECT] DOC_DUPLICATE_MODEL: model '{0}' is already registered")]
    Duplicate(String),

    #[error("[REJECT] DOC_UNKNOWN_MODEL: model '{0}' not found")]
    Unknown(String),
}

impl ModelError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Definition(e) => e.code().code(),
            Self::Validation(e) => e.code().code(),
            Self::Path(_) => "DOC_INVALID_PATH",
            Self::Malformed { .. } => "DOC_MALFORMED_MODEL",
            Self::Duplicate(_) => "DOC_DUPLICATE_MODEL",
            Self::Unknown(_) => "DOC_UNKNOWN_MODEL",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Definition(_) | Self::Malformed { .. } => Severity::Fatal,
            Self::Validation(_) | Self::Path(_) | Self::Duplicate(_) | Self::Unknown(_) => {
                Severity::Reject
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
