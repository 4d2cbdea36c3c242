//! Update payload decomposition
//!
//! Splits an update payload into the two operator maps a document store
//! expects:
//! - `set`: the payload with every removal sentinel stripped
//! - `unset`: dot-notation path of every sentinel, mapped to `""`
//!
//! A leaf is either a sentinel or a concrete value, so no position appears in
//! both maps. `unset` paths always use concrete indices, counted after
//! sentinel elements are dropped from their array. A sentinel that is itself
//! an array element is removed through `set` alone.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value as Json};

use crate::document::Value;
use crate::path::Path;

/// Result of [`decompose`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateResult {
    /// Fields to write
    pub set: Value,
    /// Dot paths to remove, each mapped to the empty-string payload
    pub unset: BTreeMap<String, String>,
}

impl UpdateResult {
    /// True if the update neither writes nor removes anything.
    pub fn is_noop(&self) -> bool {
        self.unset.is_empty() && self.set.as_object().map_or(false, |map| map.is_empty())
    }

    /// `{"$set": …, "$unset": …}`, leaving out empty operators
    pub fn to_operators(&self) -> Json {
        let mut operators = serde_json::Map::new();
        if self.set.as_object().map_or(true, |map| !map.is_empty()) {
            operators.insert("$set".into(), self.set.to_json());
        }
        if !self.unset.is_empty() {
            operators.insert("$unset".into(), json!(self.unset));
        }
        Json::Object(operators)
    }
}

/// Decomposes an update payload. Never fails; the input is not modified.
pub fn decompose(document: &Value) -> UpdateResult {
    let mut working = document.clone();

    let mut unset = BTreeMap::new();
    collect_unset(&working, &Path::root(), &mut unset);

    strip_sentinels(&mut working);

    UpdateResult {
        set: working,
        unset,
    }
}

fn collect_unset(value: &Value, path: &Path, unset: &mut BTreeMap<String, String>) {
    match value {
        Value::Missing if !path.is_root() => {
            unset.insert(path.to_string(), String::new());
        }
        Value::Object(map) => {
            for (key, child) in map {
                collect_unset(child, &path.child(key.clone()), unset);
            }
        }
        // Sentinel elements are filtered out of the written array, so they
        // get no entry here and later elements are numbered as written.
        Value::Array(items) => {
            for (i, item) in items.iter().filter(|item| !item.is_missing()).enumerate() {
                collect_unset(item, &path.index(i), unset);
            }
        }
        _ => {}
    }
}

/// Removes sentinels and prunes objects emptied by the removal.
///
/// Returns true if `value` is an object that lost entries and is now empty,
/// in which case the parent object drops it. Array elements are never
/// dropped for that reason so the indices recorded in `unset` stay valid.
/// Sentinel elements themselves are filtered out.
fn strip_sentinels(value: &mut Value) -> bool {
    match value {
        Value::Object(map) => {
            let before = map.len();
            map.retain(|_, child| !child.is_missing());

            let vacated: Vec<String> = map
                .iter_mut()
                .filter_map(|(key, child)| strip_sentinels(child).then(|| key.clone()))
                .collect();
            for key in &vacated {
                map.remove(key);
            }

            map.len() != before && map.is_empty()
        }
        Value::Array(items) => {
            items.retain(|item| !item.is_missing());
            for item in items.iter_mut() {
                strip_sentinels(item);
            }
            false
        }
        _ => false,
    }
}
