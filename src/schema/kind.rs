//! Leaf kinds and the disallowed-kind taxonomy
//!
//! Two closed sets are enforced at definition time:
//! - general: `void`, `function`, `future` may not appear anywhere
//! - identifier: the identifier field may not be an `array`, `tuple`,
//!   `absent` or `unknown`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Value;

/// Kind of a scalar schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Int,
    /// Accepts ints and floats
    Float,
    Bool,
    /// Only `null`
    Null,
    Date,
    Binary,
    Decimal,
    Uuid,
    /// Any present value
    Any,
    /// Unconstrained, like `Any`, but not usable as an identifier
    Unknown,
    /// Never present; an array of `absent` can only be empty
    Absent,
    Void,
    Function,
    Future,
    /// Fixed-position arrays are not traversed; kept only so definitions
    /// containing one can be reported
    Tuple,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Null => "null",
            Kind::Date => "date",
            Kind::Binary => "binary",
            Kind::Decimal => "decimal",
            Kind::Uuid => "uuid",
            Kind::Any => "any",
            Kind::Unknown => "unknown",
            Kind::Absent => "absent",
            Kind::Void => "void",
            Kind::Function => "function",
            Kind::Future => "future",
            Kind::Tuple => "tuple",
        }
    }

    /// Member of the general disallowed set
    pub fn is_disallowed(&self) -> bool {
        match self {
            Kind::Void | Kind::Function | Kind::Future => true,
            Kind::String
            | Kind::Int
            | Kind::Float
            | Kind::Bool
            | Kind::Null
            | Kind::Date
            | Kind::Binary
            | Kind::Decimal
            | Kind::Uuid
            | Kind::Any
            | Kind::Unknown
            | Kind::Absent
            | Kind::Tuple => false,
        }
    }

    /// Member of the identifier disallowed set (array is a node shape and is
    /// checked by the caller)
    pub fn is_disallowed_for_id(&self) -> bool {
        match self {
            Kind::Tuple | Kind::Absent | Kind::Unknown => true,
            Kind::String
            | Kind::Int
            | Kind::Float
            | Kind::Bool
            | Kind::Null
            | Kind::Date
            | Kind::Binary
            | Kind::Decimal
            | Kind::Uuid
            | Kind::Any
            | Kind::Void
            | Kind::Function
            | Kind::Future => false,
        }
    }

    /// Whether a present value satisfies this kind.
    ///
    /// The removal sentinel is never accepted here; optionality is decided by
    /// the wrapper layers around the node.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_missing() {
            return false;
        }
        match self {
            Kind::String => matches!(value, Value::String(_)),
            Kind::Int => matches!(value, Value::Int(_)),
            Kind::Float => matches!(value, Value::Int(_) | Value::Float(_)),
            Kind::Bool => matches!(value, Value::Bool(_)),
            Kind::Null => value.is_null(),
            Kind::Date => matches!(value, Value::Date(_)),
            Kind::Binary => matches!(value, Value::Binary(_)),
            Kind::Decimal => matches!(value, Value::Decimal(_)),
            Kind::Uuid => matches!(value, Value::Uuid(_)),
            Kind::Any | Kind::Unknown => true,
            Kind::Absent | Kind::Void | Kind::Function | Kind::Future | Kind::Tuple => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
