//! Schema node definitions
//!
//! Node shapes:
//! - scalar: a leaf with a [`Kind`]
//! - object: named fields, each its own schema node
//! - array: homogeneous elements described by one element schema
//! - optional / nullable / defaulted: transparent wrappers around another node
//!
//! Wrappers are stripped before any kind inspection. They only decide whether
//! a field may be absent (optional, defaulted) or `null` (nullable).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::kind::Kind;
use crate::document::Value;
use crate::path::{Path, Segment};

/// Field map of an object node
pub type Fields = BTreeMap<String, SchemaNode>;

/// A schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    Scalar {
        kind: Kind,
    },
    Object {
        #[serde(default)]
        fields: Fields,
    },
    Array {
        element: Box<SchemaNode>,
    },
    /// May be absent
    Optional {
        inner: Box<SchemaNode>,
    },
    /// May be `null`
    Nullable {
        inner: Box<SchemaNode>,
    },
    /// May be absent; `default` fills it on insert
    Defaulted {
        inner: Box<SchemaNode>,
        default: Value,
    },
}

/// Layer kinds peeled off by [`SchemaNode::split_wrappers`]
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapper {
    Optional,
    Nullable,
    Defaulted(Value),
}

impl SchemaNode {
    pub fn scalar(kind: Kind) -> Self {
        SchemaNode::Scalar { kind }
    }

    pub fn string() -> Self {
        Self::scalar(Kind::String)
    }

    pub fn int() -> Self {
        Self::scalar(Kind::Int)
    }

    pub fn float() -> Self {
        Self::scalar(Kind::Float)
    }

    pub fn bool() -> Self {
        Self::scalar(Kind::Bool)
    }

    pub fn date() -> Self {
        Self::scalar(Kind::Date)
    }

    /// Object node from `(name, node)` pairs
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn array(element: SchemaNode) -> Self {
        SchemaNode::Array {
            element: Box::new(element),
        }
    }

    /// Wraps `self` as optional
    pub fn optional(self) -> Self {
        SchemaNode::Optional {
            inner: Box::new(self),
        }
    }

    /// Wraps `self` as nullable
    pub fn nullable(self) -> Self {
        SchemaNode::Nullable {
            inner: Box::new(self),
        }
    }

    /// Wraps `self` with a default value
    pub fn with_default(self, default: Value) -> Self {
        SchemaNode::Defaulted {
            inner: Box::new(self),
            default,
        }
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(
            self,
            SchemaNode::Optional { .. } | SchemaNode::Nullable { .. } | SchemaNode::Defaulted { .. }
        )
    }

    /// Strips every wrapper layer.
    pub fn unwrapped(&self) -> &SchemaNode {
        let mut node = self;
        loop {
            match node {
                SchemaNode::Optional { inner }
                | SchemaNode::Nullable { inner }
                | SchemaNode::Defaulted { inner, .. } => node = inner,
                _ => return node,
            }
        }
    }

    /// Strips every wrapper layer, mutably.
    pub fn unwrapped_mut(&mut self) -> &mut SchemaNode {
        match self {
            SchemaNode::Optional { inner }
            | SchemaNode::Nullable { inner }
            | SchemaNode::Defaulted { inner, .. } => inner.unwrapped_mut(),
            node => node,
        }
    }

    /// Peels the wrapper layers, outermost first, and returns them with the
    /// base node.
    pub fn split_wrappers(&self) -> (Vec<Wrapper>, &SchemaNode) {
        let mut layers = Vec::new();
        let mut node = self;
        loop {
            match node {
                SchemaNode::Optional { inner } => {
                    layers.push(Wrapper::Optional);
                    node = inner;
                }
                SchemaNode::Nullable { inner } => {
                    layers.push(Wrapper::Nullable);
                    node = inner;
                }
                SchemaNode::Defaulted { inner, default } => {
                    layers.push(Wrapper::Defaulted(default.clone()));
                    node = inner;
                }
                _ => return (layers, node),
            }
        }
    }

    /// Re-applies wrapper layers produced by [`split_wrappers`](Self::split_wrappers).
    pub fn rewrap(layers: Vec<Wrapper>, base: SchemaNode) -> SchemaNode {
        layers
            .into_iter()
            .rev()
            .fold(base, |node, layer| match layer {
                Wrapper::Optional => node.optional(),
                Wrapper::Nullable => node.nullable(),
                Wrapper::Defaulted(default) => node.with_default(default),
            })
    }

    /// True if any wrapper layer is `Optional`.
    pub fn is_optional(&self) -> bool {
        self.split_wrappers().0.contains(&Wrapper::Optional)
    }

    /// True if the field may be left out (optional or defaulted).
    pub fn is_omittable(&self) -> bool {
        self.split_wrappers()
            .0
            .iter()
            .any(|layer| matches!(layer, Wrapper::Optional | Wrapper::Defaulted(_)))
    }

    /// True if any wrapper layer is `Nullable`.
    pub fn is_nullable(&self) -> bool {
        self.split_wrappers().0.contains(&Wrapper::Nullable)
    }

    /// Outermost default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        let mut node = self;
        loop {
            match node {
                SchemaNode::Defaulted { default, .. } => return Some(default),
                SchemaNode::Optional { inner } | SchemaNode::Nullable { inner } => node = inner,
                _ => return None,
            }
        }
    }

    /// Name of the base shape or kind, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self.unwrapped() {
            SchemaNode::Scalar { kind } => kind.name(),
            SchemaNode::Object { .. } => "object",
            SchemaNode::Array { .. } => "array",
            // unwrapped() never returns a wrapper
            _ => "wrapper",
        }
    }

    /// Fields of the base object node.
    pub fn fields(&self) -> Option<&Fields> {
        match self.unwrapped() {
            SchemaNode::Object { fields } => Some(fields),
            _ => None,
        }
    }

    /// Returns the node governing `path`.
    ///
    /// Index and wildcard segments both descend into an array's element
    /// schema. The returned node keeps its own wrappers.
    pub fn resolve(&self, path: &Path) -> Option<&SchemaNode> {
        let mut node = self;
        for segment in path.segments() {
            node = match (node.unwrapped(), segment) {
                (SchemaNode::Object { fields }, Segment::Name(name)) => fields.get(name)?,
                (SchemaNode::Object { fields }, Segment::Index(index)) => {
                    fields.get(&index.to_string())?
                }
                (SchemaNode::Array { element }, Segment::Index(_) | Segment::Wildcard) => element,
                _ => return None,
            };
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> SchemaNode {
        SchemaNode::object([
            ("_id", SchemaNode::string()),
            ("name", SchemaNode::string()),
            ("age", SchemaNode::int().optional()),
            (
                "tags",
                SchemaNode::array(SchemaNode::string()).with_default(Value::Array(vec![])),
            ),
            (
                "address",
                SchemaNode::object([("city", SchemaNode::string().nullable())]).optional(),
            ),
        ])
    }

    #[test]
    fn test_unwrapped_strips_all_layers() {
        let node = SchemaNode::int().nullable().optional();
        assert_eq!(node.unwrapped(), &SchemaNode::int());
        assert_eq!(node.kind_name(), "int");
    }

    #[test]
    fn test_wrapper_flags() {
        let node = SchemaNode::int().nullable().optional();
        assert!(node.is_optional());
        assert!(node.is_nullable());
        assert!(node.is_omittable());

        let defaulted = SchemaNode::int().with_default(Value::Int(0));
        assert!(!defaulted.is_optional());
        assert!(defaulted.is_omittable());
        assert_eq!(defaulted.default_value(), Some(&Value::Int(0)));

        assert!(!SchemaNode::string().is_omittable());
    }

    #[test]
    fn test_split_and_rewrap_preserves_order() {
        let node = SchemaNode::int()
            .with_default(Value::Int(1))
            .nullable()
            .optional();
        let (layers, base) = node.split_wrappers();
        assert_eq!(base, &SchemaNode::int());
        assert_eq!(
            layers,
            vec![Wrapper::Optional, Wrapper::Nullable, Wrapper::Defaulted(Value::Int(1))]
        );
        assert_eq!(SchemaNode::rewrap(layers, base.clone()), node);
    }

    #[test]
    fn test_resolve_through_wrappers_and_arrays() {
        let schema = user_schema();
        let city = Path::root().child("address").child("city");
        assert!(schema.resolve(&city).unwrap().is_nullable());

        let tag = Path::root().child("tags").index(3);
        assert_eq!(schema.resolve(&tag), Some(&SchemaNode::string()));
        assert_eq!(schema.resolve(&Path::root().child("tags").wildcard()), Some(&SchemaNode::string()));

        assert!(schema.resolve(&Path::root().child("nope")).is_none());
        assert!(schema.resolve(&Path::root().child("name").child("x")).is_none());
        assert_eq!(schema.resolve(&Path::root()), Some(&schema));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::json!({
            "type": "object",
            "fields": {
                "_id": {"type": "scalar", "kind": "uuid"},
                "tags": {"type": "array", "element": {"type": "scalar", "kind": "string"}},
                "score": {
                    "type": "defaulted",
                    "default": 0,
                    "inner": {"type": "scalar", "kind": "int"}
                },
                "note": {"type": "optional", "inner": {"type": "nullable", "inner": {"type": "scalar", "kind": "string"}}}
            }
        });
        let schema: SchemaNode = serde_json::from_value(json.clone()).unwrap();
        let fields = schema.fields().unwrap();
        assert_eq!(fields["_id"], SchemaNode::scalar(Kind::Uuid));
        assert_eq!(fields["score"].default_value(), Some(&Value::Int(0)));
        assert!(fields["note"].is_optional());

        assert_eq!(serde_json::to_value(&schema).unwrap(), json);
    }
}
