//! Partial schema synthesis
//!
//! Update payloads are partial. Validating them against the full schema would
//! reject every field the payload leaves out, so a narrowed schema is derived
//! per call and validated in a mode that rejects unknown keys.
//!
//! Both operations return a new tree; the input schema is never touched.

use crate::config::SchemaConfig;
use crate::document::Value;
use crate::path::Path;
use crate::schema::SchemaNode;
use crate::tree::delete_paths;

/// Returns `schema` with the nodes at `paths` removed.
///
/// Typical use is excluding the identifier from an insert payload that does
/// not carry one. An empty list returns an identical tree.
pub fn narrow_by_paths(schema: &SchemaNode, paths: &[Path], config: &SchemaConfig) -> SchemaNode {
    let mut narrowed = schema.clone();
    delete_paths(&mut narrowed, paths, config);
    narrowed
}

/// Returns the part of `schema` that `data` actually touches.
///
/// - object fields are kept only if `data` has the key, recursively
/// - an array's element schema is narrowed by the first element of the data
///   array; an empty array keeps the element schema as is
/// - wrapper layers are re-applied around the narrowed node
/// - data that does not match the node's shape keeps the node unchanged, so
///   validation reports the mismatch
pub fn narrow_by_data(schema: &SchemaNode, data: &Value, config: &SchemaConfig) -> SchemaNode {
    narrow_node(schema, data, config.max_depth)
}

fn narrow_node(schema: &SchemaNode, data: &Value, depth_left: usize) -> SchemaNode {
    if depth_left == 0 {
        return schema.clone();
    }

    let (layers, base) = schema.split_wrappers();
    let narrowed = match (base, data) {
        (SchemaNode::Object { fields }, Value::Object(map)) => SchemaNode::Object {
            fields: fields
                .iter()
                .filter_map(|(name, field)| {
                    map.get(name)
                        .map(|value| (name.clone(), narrow_node(field, value, depth_left - 1)))
                })
                .collect(),
        },
        (SchemaNode::Array { element }, Value::Array(items)) => match items.first() {
            Some(first) => SchemaNode::array(narrow_node(element, first, depth_left - 1)),
            None => base.clone(),
        },
        _ => base.clone(),
    };

    SchemaNode::rewrap(layers, narrowed)
}
