//! Definition-time schema checks
//!
//! Runs once when a model is defined:
//! - the identifier field may not be optional (unless configured) and may not
//!   be an array, tuple, absent or unknown
//! - no node anywhere may be void, function or future
//!
//! Every offending node is reported; the walk never stops early.

use tracing::{debug, warn};

use super::errors::{DefinitionResult, SchemaDefinitionError, ValidationIssue};
use super::types::SchemaNode;
use crate::config::SchemaConfig;
use crate::path::Path;

/// Validates a model schema, returning every issue in one error.
pub fn validate_definition(
    schema: &SchemaNode,
    model: &str,
    config: &SchemaConfig,
) -> DefinitionResult<()> {
    let issues = definition_issues(schema, config);
    if issues.is_empty() {
        debug!(model, "schema definition accepted");
        return Ok(());
    }

    warn!(model, issues = issues.len(), "schema definition rejected");
    Err(SchemaDefinitionError::new(model, issues))
}

/// Collects definition issues in traversal order.
pub fn definition_issues(schema: &SchemaNode, config: &SchemaConfig) -> Vec<ValidationIssue> {
    let mut walker = DefinitionWalker {
        config,
        issues: Vec::new(),
    };

    match schema.unwrapped() {
        SchemaNode::Object { fields } => {
            let id_path = config.id_path();
            let id_ok = match fields.get(&config.id_field) {
                Some(id_node) => walker.check_identifier(id_node, &id_path),
                None => true,
            };

            for (name, node) in fields {
                if *name == config.id_field && !id_ok {
                    continue;
                }
                walker.visit(node, &Path::root().child(name.clone()), 1);
            }
        }
        other => walker.issues.push(ValidationIssue::new(
            Path::root(),
            format!("model schema must be an object, got {}", other.kind_name()),
        )),
    }

    walker.issues
}

struct DefinitionWalker<'a> {
    config: &'a SchemaConfig,
    issues: Vec<ValidationIssue>,
}

impl DefinitionWalker<'_> {
    /// Returns true when the identifier passed and should be walked like any
    /// other field.
    fn check_identifier(&mut self, node: &SchemaNode, path: &Path) -> bool {
        let mut ok = true;

        if node.is_optional() && !self.config.allow_optional_id {
            self.issues.push(ValidationIssue::new(
                path.clone(),
                "identifier field cannot be optional",
            ));
            ok = false;
        }

        let offending = match node.unwrapped() {
            SchemaNode::Array { .. } => Some("array"),
            SchemaNode::Scalar { kind } if kind.is_disallowed_for_id() => Some(kind.name()),
            _ => None,
        };
        if let Some(kind) = offending {
            self.issues.push(ValidationIssue::new(
                path.clone(),
                format!("identifier field cannot be of kind '{}'", kind),
            ));
            ok = false;
        }

        ok
    }

    fn visit(&mut self, node: &SchemaNode, path: &Path, depth: usize) {
        if depth > self.config.max_depth {
            self.issues
                .push(ValidationIssue::too_deep(path.clone(), self.config.max_depth));
            return;
        }

        match node.unwrapped() {
            SchemaNode::Object { fields } => {
                for (name, child) in fields {
                    self.visit(child, &path.child(name.clone()), depth + 1);
                }
            }
            SchemaNode::Array { element } => {
                self.visit(element, &path.wildcard(), depth + 1);
            }
            SchemaNode::Scalar { kind } => {
                if kind.is_disallowed() {
                    self.issues.push(ValidationIssue::new(
                        path.clone(),
                        format!("kind '{}' is not allowed", kind),
                    ));
                }
            }
            // stripped by unwrapped()
            SchemaNode::Optional { .. }
            | SchemaNode::Nullable { .. }
            | SchemaNode::Defaulted { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Value;
    use crate::schema::kind::Kind;

    fn paths(issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().map(|i| i.path.to_string()).collect()
    }

    #[test]
    fn test_valid_schema_passes() {
        let schema = SchemaNode::object([
            ("_id", SchemaNode::string()),
            ("name", SchemaNode::string()),
            ("tags", SchemaNode::array(SchemaNode::string()).optional()),
        ]);
        assert!(validate_definition(&schema, "users", &SchemaConfig::default()).is_ok());
    }

    #[test]
    fn test_wrapped_disallowed_kind_reported_once() {
        for kind in [Kind::Void, Kind::Function, Kind::Future] {
            let schema = SchemaNode::object([
                ("_id", SchemaNode::string()),
                (
                    "profile",
                    SchemaNode::object([("hook", SchemaNode::scalar(kind).nullable().optional())]),
                ),
            ]);
            let issues = definition_issues(&schema, &SchemaConfig::default());
            assert_eq!(paths(&issues), vec!["profile.hook"]);
            assert!(issues[0].reason.contains(kind.name()));
        }
    }

    #[test]
    fn test_nested_arrays_append_wildcard_per_level() {
        let schema = SchemaNode::object([(
            "grid",
            SchemaNode::array(SchemaNode::array(SchemaNode::scalar(Kind::Future))),
        )]);
        let issues = definition_issues(&schema, &SchemaConfig::default());
        assert_eq!(paths(&issues), vec!["grid.<idx>.<idx>"]);
    }

    #[test]
    fn test_issues_accumulate_across_tree() {
        let schema = SchemaNode::object([
            ("_id", SchemaNode::array(SchemaNode::string())),
            ("a", SchemaNode::scalar(Kind::Void)),
            ("b", SchemaNode::object([("c", SchemaNode::scalar(Kind::Function))])),
        ]);
        let err = validate_definition(&schema, "things", &SchemaConfig::default()).unwrap_err();
        assert_eq!(paths(err.issues()), vec!["_id", "a", "b.c"]);
        assert_eq!(err.model, "things");
    }

    #[test]
    fn test_optional_id_rejected_by_default() {
        let schema = SchemaNode::object([("_id", SchemaNode::string().optional())]);
        let issues = definition_issues(&schema, &SchemaConfig::default());
        assert_eq!(paths(&issues), vec!["_id"]);
        assert!(issues[0].reason.contains("optional"));
    }

    #[test]
    fn test_optional_id_accepted_when_configured() {
        let schema = SchemaNode::object([("_id", SchemaNode::string().optional())]);
        let config = SchemaConfig {
            allow_optional_id: true,
            ..SchemaConfig::default()
        };
        assert!(definition_issues(&schema, &config).is_empty());
    }

    #[test]
    fn test_identifier_kinds() {
        for (node, name) in [
            (SchemaNode::scalar(Kind::Tuple), "tuple"),
            (SchemaNode::scalar(Kind::Absent), "absent"),
            (SchemaNode::scalar(Kind::Unknown).nullable(), "unknown"),
            (SchemaNode::array(SchemaNode::int()), "array"),
        ] {
            let schema = SchemaNode::object([("_id", node)]);
            let issues = definition_issues(&schema, &SchemaConfig::default());
            assert_eq!(issues.len(), 1, "{}", name);
            assert!(issues[0].reason.contains(name));
        }
    }

    #[test]
    fn test_custom_id_field() {
        let schema = SchemaNode::object([
            ("_id", SchemaNode::array(SchemaNode::int())),
            ("key", SchemaNode::scalar(Kind::Unknown)),
        ]);
        let config = SchemaConfig {
            id_field: "key".into(),
            ..SchemaConfig::default()
        };
        let issues = definition_issues(&schema, &config);
        assert_eq!(paths(&issues), vec!["key"]);
    }

    #[test]
    fn test_root_must_be_object() {
        let issues = definition_issues(&SchemaNode::string(), &SchemaConfig::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.is_root());
    }

    #[test]
    fn test_depth_bound() {
        let mut node = SchemaNode::int();
        for _ in 0..5 {
            node = SchemaNode::object([("n", node)]);
        }
        let config = SchemaConfig {
            max_depth: 3,
            ..SchemaConfig::default()
        };
        let issues = definition_issues(&node, &config);
        assert_eq!(paths(&issues), vec!["n.n.n.n"]);
    }

    #[test]
    fn test_defaulted_disallowed_kind() {
        let schema = SchemaNode::object([(
            "cb",
            SchemaNode::scalar(Kind::Function).with_default(Value::Null),
        )]);
        assert_eq!(paths(&definition_issues(&schema, &SchemaConfig::default())), vec!["cb"]);
    }
}
