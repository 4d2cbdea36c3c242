//! Document validation against a schema
//!
//! Validation semantics:
//! - required fields must be present (optional and defaulted may be absent)
//! - undeclared fields are reported unless the config allows them
//! - `null` only where the node is nullable or its kind accepts null
//! - scalar kinds match exactly; `float` also accepts ints
//! - every array element is checked under its concrete index
//! - the removal sentinel is accepted only on optional or defaulted fields
//!
//! Unlike a fail-fast validator, the walk collects every issue so one call
//! reports the complete picture.

use super::errors::{ValidationError, ValidationIssue, ValidationResult};
use super::types::SchemaNode;
use crate::config::{SchemaConfig, UnknownKeys};
use crate::document::{Map, Value};
use crate::path::Path;

/// Validates a document, returning every issue found (empty if valid).
pub fn validate_document(
    schema: &SchemaNode,
    document: &Value,
    config: &SchemaConfig,
) -> Vec<ValidationIssue> {
    let mut validator = DocumentValidator {
        config,
        issues: Vec::new(),
    };
    validator.check_value(schema, document, &Path::root(), 0);
    validator.issues
}

/// Validates a document and wraps any issues in a [`ValidationError`].
pub fn check_document(
    schema: &SchemaNode,
    document: &Value,
    model: &str,
    config: &SchemaConfig,
) -> ValidationResult<()> {
    let issues = validate_document(schema, document, config);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(model, issues))
    }
}

struct DocumentValidator<'a> {
    config: &'a SchemaConfig,
    issues: Vec<ValidationIssue>,
}

impl DocumentValidator<'_> {
    fn check_value(&mut self, schema: &SchemaNode, value: &Value, path: &Path, depth: usize) {
        if depth > self.config.max_depth {
            self.issues
                .push(ValidationIssue::too_deep(path.clone(), self.config.max_depth));
            return;
        }

        if value.is_missing() {
            if !schema.is_omittable() {
                self.issues.push(ValidationIssue::required_removal(path.clone()));
            }
            return;
        }

        if value.is_null() && schema.is_nullable() {
            return;
        }

        match schema.unwrapped() {
            SchemaNode::Scalar { kind } => {
                if !kind.accepts(value) {
                    self.issues.push(ValidationIssue::type_mismatch(
                        path.clone(),
                        kind.name(),
                        value.kind_name(),
                    ));
                }
            }
            SchemaNode::Object { fields } => match value {
                Value::Object(map) => self.check_object(fields, map, path, depth),
                other => self.issues.push(ValidationIssue::type_mismatch(
                    path.clone(),
                    "object",
                    other.kind_name(),
                )),
            },
            SchemaNode::Array { element } => match value {
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        self.check_value(element, item, &path.index(i), depth + 1);
                    }
                }
                other => self.issues.push(ValidationIssue::type_mismatch(
                    path.clone(),
                    "array",
                    other.kind_name(),
                )),
            },
            // stripped by unwrapped()
            SchemaNode::Optional { .. }
            | SchemaNode::Nullable { .. }
            | SchemaNode::Defaulted { .. } => {}
        }
    }

    fn check_object(
        &mut self,
        fields: &super::types::Fields,
        map: &Map,
        path: &Path,
        depth: usize,
    ) {
        if self.config.unknown_keys == UnknownKeys::Reject {
            for key in map.keys() {
                if !fields.contains_key(key) {
                    self.issues
                        .push(ValidationIssue::unknown_field(path.child(key.clone())));
                }
            }
        }

        for (name, field) in fields {
            let field_path = path.child(name.clone());
            match map.get(name) {
                Some(value) => self.check_value(field, value, &field_path, depth + 1),
                None => {
                    if !field.is_omittable() {
                        self.issues.push(ValidationIssue::missing_field(field_path));
                    }
                }
            }
        }
    }
}
