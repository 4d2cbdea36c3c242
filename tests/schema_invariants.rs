//! Schema Invariant Tests
//!
//! Tests for schema binding invariants:
//! - Definition checks report every offending node
//! - The identifier field has its own restrictions
//! - Validation is deterministic and reports every issue
//! - Defaults fill only absent fields

use docschema::schema::{
    apply_defaults, check_document, definition_issues, validate_document, validate_definition,
    Kind, SchemaNode,
};
use docschema::{SchemaConfig, Value};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn users_schema() -> SchemaNode {
    SchemaNode::object([
        ("_id", SchemaNode::string()),
        ("name", SchemaNode::string()),
        ("age", SchemaNode::int().optional()),
        ("tags", SchemaNode::array(SchemaNode::string())),
        (
            "profile",
            SchemaNode::object([
                ("bio", SchemaNode::string().nullable()),
                ("score", SchemaNode::float().with_default(Value::Float(0.0))),
            ]),
        ),
    ])
}

fn doc(json: serde_json::Value) -> Value {
    Value::from_json(&json).unwrap()
}

fn paths(issues: &[docschema::schema::ValidationIssue]) -> Vec<String> {
    issues.iter().map(|i| i.path.to_string()).collect()
}

// =============================================================================
// Definition Tests
// =============================================================================

/// A well-formed schema passes definition checks.
#[test]
fn test_valid_definition_accepted() {
    let config = SchemaConfig::default();
    assert!(validate_definition(&users_schema(), "users", &config).is_ok());
}

/// Every disallowed node is reported, not just the first.
#[test]
fn test_all_disallowed_kinds_reported() {
    let schema = SchemaNode::object([
        ("_id", SchemaNode::string()),
        ("a", SchemaNode::scalar(Kind::Void)),
        (
            "b",
            SchemaNode::object([("c", SchemaNode::scalar(Kind::Function).optional())]),
        ),
        ("d", SchemaNode::array(SchemaNode::scalar(Kind::Future))),
    ]);

    let issues = definition_issues(&schema, &SchemaConfig::default());
    assert_eq!(paths(&issues), vec!["a", "b.c", "d.<idx>"]);
}

/// Optional and array identifiers are both rejected.
#[test]
fn test_identifier_restrictions() {
    let config = SchemaConfig::default();

    let optional_id = SchemaNode::object([("_id", SchemaNode::string().optional())]);
    let issues = definition_issues(&optional_id, &config);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].reason.contains("optional"));

    let array_id = SchemaNode::object([("_id", SchemaNode::array(SchemaNode::int()))]);
    let issues = definition_issues(&array_id, &config);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].reason.contains("array"));

    for kind in [Kind::Tuple, Kind::Absent, Kind::Unknown] {
        let schema = SchemaNode::object([("_id", SchemaNode::scalar(kind))]);
        assert_eq!(definition_issues(&schema, &config).len(), 1, "kind {}", kind);
    }
}

/// Optional identifiers can be allowed by configuration.
#[test]
fn test_optional_identifier_when_configured() {
    let config = SchemaConfig {
        allow_optional_id: true,
        ..SchemaConfig::default()
    };
    let schema = SchemaNode::object([("_id", SchemaNode::string().optional())]);
    assert!(definition_issues(&schema, &config).is_empty());
}

/// The identifier field name comes from configuration.
#[test]
fn test_custom_identifier_field() {
    let config = SchemaConfig {
        id_field: "key".to_string(),
        ..SchemaConfig::default()
    };
    let schema = SchemaNode::object([
        ("_id", SchemaNode::string().optional()),
        ("key", SchemaNode::string().optional()),
    ]);
    let issues = definition_issues(&schema, &config);
    assert_eq!(paths(&issues), vec!["key"]);
}

/// A non-object root is a definition error.
#[test]
fn test_root_must_be_object() {
    let issues = definition_issues(&SchemaNode::string(), &SchemaConfig::default());
    assert_eq!(issues.len(), 1);
    assert!(issues[0].path.is_root());
}

// =============================================================================
// Validation Determinism Tests
// =============================================================================

/// Same document validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let config = SchemaConfig::default();
    let schema = users_schema();
    let document = doc(json!({
        "_id": "u1",
        "name": 7,
        "extra": true,
        "tags": ["a", 1],
        "profile": {"bio": null}
    }));

    let first = validate_document(&schema, &document, &config);
    for _ in 0..100 {
        assert_eq!(validate_document(&schema, &document, &config), first);
    }
    assert_eq!(paths(&first), vec!["extra", "name", "tags.1"]);
}

/// Valid document passes.
#[test]
fn test_valid_document() {
    let document = doc(json!({
        "_id": "u1",
        "name": "Alice",
        "tags": [],
        "profile": {"bio": "hi", "score": 3}
    }));
    assert!(check_document(&users_schema(), &document, "users", &SchemaConfig::default()).is_ok());
}

/// Missing required fields are reported with their full path.
#[test]
fn test_missing_required_fields() {
    let document = doc(json!({"_id": "u1", "profile": {}}));
    let err = check_document(&users_schema(), &document, "users", &SchemaConfig::default())
        .unwrap_err();

    assert!(err.issue_at("name").is_some());
    assert!(err.issue_at("tags").is_some());
    assert!(err.issue_at("profile.bio").is_some());
    assert!(err.issue_at("profile.score").is_none());
    assert!(err.issue_at("age").is_none());
}

/// The removal sentinel is only accepted where a field may be absent.
#[test]
fn test_missing_sentinel_on_required_field() {
    let config = SchemaConfig::default();
    let document = doc(json!({
        "_id": "u1",
        "name": {"$missing": true},
        "age": {"$missing": true},
        "tags": [],
        "profile": {"bio": null}
    }));
    let issues = validate_document(&users_schema(), &document, &config);
    assert_eq!(paths(&issues), vec!["name"]);
}

// =============================================================================
// Default Tests
// =============================================================================

/// Defaults fill absent fields and leave present ones alone.
#[test]
fn test_apply_defaults() {
    let schema = users_schema();

    let mut document = doc(json!({"profile": {"bio": null}}));
    apply_defaults(&schema, &mut document);
    assert_eq!(
        document.get("profile").and_then(|p| p.get("score")),
        Some(&Value::Float(0.0))
    );

    let mut document = doc(json!({"profile": {"score": 5}}));
    apply_defaults(&schema, &mut document);
    assert_eq!(
        document.get("profile").and_then(|p| p.get("score")),
        Some(&Value::Int(5))
    );
}
