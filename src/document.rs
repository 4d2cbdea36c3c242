//! Runtime document values
//!
//! A document is a tree of objects, arrays and scalars. Besides the JSON
//! scalars it carries the wrapper values document stores use (dates, binary
//! blobs, decimals, UUIDs) and the removal sentinel [`Value::Missing`].
//!
//! `Clone` is the structural clone: every variant owns its data, so a clone
//! shares nothing with the original and can be mutated freely.
//!
//! JSON interchange uses single-key extended-JSON objects for the wrapper
//! values:
//!
//! | value            | JSON                                  |
//! |------------------|---------------------------------------|
//! | `Date`           | `{"$date": "2024-01-01T00:00:00Z"}`   |
//! | `Binary`         | `{"$binary": "<base64>"}`             |
//! | `Decimal`        | `{"$decimal": "12.50"}`               |
//! | `Uuid`           | `{"$uuid": "<hyphenated uuid>"}`      |
//! | `Missing`        | `{"$missing": true}`                  |

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value as Json};
use thiserror::Error;
use uuid::Uuid;

/// Ordered field map of an object value
pub type Map = BTreeMap<String, Value>;

/// Errors converting JSON into a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid $date '{0}': expected an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("invalid $binary payload: {0}")]
    InvalidBinary(String),

    #[error("invalid $uuid '{0}'")]
    InvalidUuid(String),

    #[error("invalid {tag} wrapper: expected {expected}")]
    InvalidWrapper {
        tag: &'static str,
        expected: &'static str,
    },

    #[error("number {0} does not fit a 64-bit integer or float")]
    UnrepresentableNumber(String),
}

/// A document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// UTC timestamp
    Date(DateTime<Utc>),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Decimal kept in its exact textual form
    Decimal(String),
    Uuid(Uuid),
    /// Removal sentinel: "unset this field" in an update payload.
    /// Distinct from the field never having been supplied.
    Missing,
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// An empty object
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// Kind name used in validation messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Binary(_) => "binary",
            Value::Decimal(_) => "decimal",
            Value::Uuid(_) => "uuid",
            Value::Missing => "missing",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Objects and arrays
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Drops every removal sentinel: object fields holding one and array
    /// elements that are one. Emptied containers stay in place.
    pub fn remove_missing(&mut self) {
        match self {
            Value::Object(map) => {
                map.retain(|_, child| !child.is_missing());
                map.values_mut().for_each(Value::remove_missing);
            }
            Value::Array(items) => {
                items.retain(|item| !item.is_missing());
                items.iter_mut().for_each(Value::remove_missing);
            }
            _ => {}
        }
    }

    /// Looks up a field of an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Converts a JSON value, decoding extended-JSON wrappers.
    pub fn from_json(json: &Json) -> Result<Self, ValueError> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 above i64::MAX lands here too
                    Value::Float(
                        n.as_f64()
                            .ok_or_else(|| ValueError::UnrepresentableNumber(n.to_string()))?,
                    )
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Json::Object(obj) => {
                if obj.len() == 1 {
                    if let Some((tag, inner)) = obj.iter().next() {
                        if let Some(wrapped) = decode_wrapper(tag, inner)? {
                            return Ok(wrapped);
                        }
                    }
                }
                let mut map = Map::new();
                for (key, value) in obj {
                    map.insert(key.clone(), Value::from_json(value)?);
                }
                Value::Object(map)
            }
        })
    }

    /// Converts to JSON, encoding wrapper values as extended JSON.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(d) => json!({ "$date": d.to_rfc3339_opts(SecondsFormat::AutoSi, true) }),
            Value::Binary(bytes) => json!({ "$binary": STANDARD.encode(bytes) }),
            Value::Decimal(d) => json!({ "$decimal": d }),
            Value::Uuid(u) => json!({ "$uuid": u.hyphenated().to_string() }),
            Value::Missing => json!({ "$missing": true }),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Decodes a single-key `{"$tag": ...}` object. Unknown tags are plain objects.
fn decode_wrapper(tag: &str, inner: &Json) -> Result<Option<Value>, ValueError> {
    let value = match tag {
        "$date" => {
            let raw = inner.as_str().ok_or(ValueError::InvalidWrapper {
                tag: "$date",
                expected: "a string",
            })?;
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|_| ValueError::InvalidDate(raw.to_string()))?;
            Value::Date(parsed.with_timezone(&Utc))
        }
        "$binary" => {
            let raw = inner.as_str().ok_or(ValueError::InvalidWrapper {
                tag: "$binary",
                expected: "a base64 string",
            })?;
            let bytes = STANDARD
                .decode(raw)
                .map_err(|e| ValueError::InvalidBinary(e.to_string()))?;
            Value::Binary(bytes)
        }
        "$decimal" => {
            let raw = inner.as_str().ok_or(ValueError::InvalidWrapper {
                tag: "$decimal",
                expected: "a string",
            })?;
            Value::Decimal(raw.to_string())
        }
        "$uuid" => {
            let raw = inner.as_str().ok_or(ValueError::InvalidWrapper {
                tag: "$uuid",
                expected: "a string",
            })?;
            let parsed = Uuid::parse_str(raw).map_err(|_| ValueError::InvalidUuid(raw.to_string()))?;
            Value::Uuid(parsed)
        }
        "$missing" => match inner {
            Json::Bool(true) => Value::Missing,
            _ => {
                return Err(ValueError::InvalidWrapper {
                    tag: "$missing",
                    expected: "true",
                })
            }
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl TryFrom<Json> for Value {
    type Error = ValueError;

    fn try_from(json: Json) -> Result<Self, Self::Error> {
        Value::from_json(&json)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        Value::from_json(&json).map_err(serde::de::Error::custom)
    }
}
