//! Schema subsystem
//!
//! Schemas are built once, when a model is defined, and never mutated
//! afterwards. Narrowing produces new trees.
//!
//! # Components
//!
//! - `kind`: leaf kinds and the disallowed-kind sets
//! - `types`: the schema tree and its wrapper layers
//! - `definition`: definition-time checks (identifier rules, disallowed kinds)
//! - `validator`: document validation with issue aggregation
//! - `defaults`: default filling for inserts

mod defaults;
mod definition;
mod errors;
mod kind;
mod types;
mod validator;

pub use defaults::apply_defaults;
pub use definition::{definition_issues, validate_definition};
pub use errors::{
    DefinitionResult, SchemaDefinitionError, SchemaErrorCode, Severity, ValidationError,
    ValidationIssue, ValidationResult,
};
pub use kind::Kind;
pub use types::{Fields, SchemaNode, Wrapper};
pub use validator::{check_document, validate_document};
