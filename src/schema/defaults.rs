//! Default filling for inserts

use super::types::SchemaNode;
use crate::document::Value;

/// Inserts the schema default for every absent defaulted field.
///
/// Descends into present objects and array elements. Fields holding the
/// removal sentinel are left alone.
pub fn apply_defaults(schema: &SchemaNode, value: &mut Value) {
    match (schema.unwrapped(), value) {
        (SchemaNode::Object { fields }, Value::Object(map)) => {
            for (name, field) in fields {
                match map.get_mut(name) {
                    Some(present) => apply_defaults(field, present),
                    None => {
                        if let Some(default) = field.default_value() {
                            map.insert(name.clone(), default.clone());
                        }
                    }
                }
            }
        }
        (SchemaNode::Array { element }, Value::Array(items)) => {
            for item in items {
                apply_defaults(element, item);
            }
        }
        _ => {}
    }
}
