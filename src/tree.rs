//! Path-addressed deletion over documents and schemas
//!
//! One walker serves both tree shapes. Each shape implements [`PathTree`], a
//! small capability set: is this node an array, its elements, the child a
//! segment addresses, and removal or clearing at the terminal segment.
//!
//! Walk semantics:
//! - a wildcard segment on an array fans the remaining path out to every
//!   element; this is the only branching point
//! - a missing intermediate node ends the walk silently
//! - at the terminal segment an in-range index splices the element out, a
//!   name removes the key
//! - a terminal wildcard clears every element: containers are emptied in
//!   place, scalar elements are dropped
//!
//! Deletion never fails.

use tracing::trace;

use crate::config::SchemaConfig;
use crate::document::Value;
use crate::path::{Path, Segment};
use crate::schema::{Kind, SchemaNode};

/// Capabilities the deletion walker needs from a tree.
pub trait PathTree {
    /// Whether a wildcard segment applies here
    fn is_array(&self) -> bool;

    /// Nodes a wildcard segment fans out to
    fn elements_mut(&mut self) -> Vec<&mut Self>;

    /// Child addressed by a name or index segment
    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Self>;

    /// Removes the child addressed by a terminal name or index segment.
    /// Returns false if nothing was removed.
    fn remove_child(&mut self, segment: &Segment) -> bool;

    /// Terminal wildcard: clear every element
    fn clear_elements(&mut self);
}

/// Deletes whatever `path` addresses in `tree`, in place.
pub fn delete_path<T: PathTree>(tree: &mut T, path: &Path, config: &SchemaConfig) {
    if path.is_root() {
        return;
    }
    delete_segments(tree, path.segments(), config.max_depth);
}

/// Deletes every path in order.
pub fn delete_paths<'a, T, I>(tree: &mut T, paths: I, config: &SchemaConfig)
where
    T: PathTree,
    I: IntoIterator<Item = &'a Path>,
{
    for path in paths {
        delete_path(tree, path, config);
    }
}

fn delete_segments<T: PathTree>(node: &mut T, segments: &[Segment], depth_left: usize) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if depth_left == 0 {
        trace!("deletion stopped at depth bound");
        return;
    }

    if *head == Segment::Wildcard {
        if !node.is_array() {
            return;
        }
        if rest.is_empty() {
            node.clear_elements();
        } else {
            for element in node.elements_mut() {
                delete_segments(element, rest, depth_left - 1);
            }
        }
        return;
    }

    if rest.is_empty() {
        node.remove_child(head);
        return;
    }

    if let Some(child) = node.child_mut(head) {
        delete_segments(child, rest, depth_left - 1);
    }
}

impl PathTree for Value {
    fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    fn elements_mut(&mut self) -> Vec<&mut Self> {
        match self {
            Value::Array(items) => items.iter_mut().collect(),
            _ => Vec::new(),
        }
    }

    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Self> {
        match (self, segment) {
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
            (Value::Object(map), segment) => map.get_mut(&segment.as_key()?),
            _ => None,
        }
    }

    fn remove_child(&mut self, segment: &Segment) -> bool {
        match (self, segment) {
            (Value::Array(items), Segment::Index(index)) => {
                if *index < items.len() {
                    items.remove(*index);
                    true
                } else {
                    false
                }
            }
            (Value::Object(map), segment) => match segment.as_key() {
                Some(key) => map.remove(&key).is_some(),
                None => false,
            },
            _ => false,
        }
    }

    fn clear_elements(&mut self) {
        if let Value::Array(items) = self {
            items.retain(Value::is_container);
            for item in items.iter_mut() {
                match item {
                    Value::Object(map) => map.clear(),
                    Value::Array(inner) => inner.clear(),
                    _ => {}
                }
            }
        }
    }
}

/// Schema variant.
///
/// Wrappers are transparent: every capability looks through them, and a
/// removal keeps the wrappers of the surviving nodes intact. Schema arrays
/// have one element node, so an index segment descends into it like a
/// wildcard, but a terminal index removes nothing.
impl PathTree for SchemaNode {
    fn is_array(&self) -> bool {
        matches!(self.unwrapped(), SchemaNode::Array { .. })
    }

    fn elements_mut(&mut self) -> Vec<&mut Self> {
        match self.unwrapped_mut() {
            SchemaNode::Array { element } => vec![element.as_mut()],
            _ => Vec::new(),
        }
    }

    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Self> {
        match (self.unwrapped_mut(), segment) {
            (SchemaNode::Array { element }, Segment::Index(_)) => Some(element.as_mut()),
            (SchemaNode::Object { fields }, segment) => fields.get_mut(&segment.as_key()?),
            _ => None,
        }
    }

    fn remove_child(&mut self, segment: &Segment) -> bool {
        match (self.unwrapped_mut(), segment) {
            (SchemaNode::Object { fields }, segment) => match segment.as_key() {
                Some(key) => fields.remove(&key).is_some(),
                None => false,
            },
            _ => false,
        }
    }

    /// The cleared array can only hold empty containers: object elements lose
    /// every field, array elements become arrays of `absent`, scalar elements
    /// become `absent` so only `[]` validates.
    fn clear_elements(&mut self) {
        if let SchemaNode::Array { element } = self.unwrapped_mut() {
            let (layers, base) = element.split_wrappers();
            let cleared = match base {
                SchemaNode::Object { .. } => SchemaNode::Object {
                    fields: Default::default(),
                },
                SchemaNode::Array { .. } => SchemaNode::array(SchemaNode::scalar(Kind::Absent)),
                _ => SchemaNode::scalar(Kind::Absent),
            };
            **element = SchemaNode::rewrap(layers, cleared);
        }
    }
}
