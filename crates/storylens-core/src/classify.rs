//! Value classification.
//!
//! [`classify`] is the single source of truth for the kind tag of a value.
//! Snapshot construction, cloning and diffing all dispatch on its result.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed classification tag for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Function,
    Array,
    EmptyArray,
    Map,
    EmptyMap,
    Object,
    EmptyObject,
    Other,
}

/// Structural family of a kind.
///
/// `Array` and `EmptyArray` are different tags but the same family; the diff
/// engine compares tags for type changes and families for structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindFamily {
    /// string, number, boolean, null, undefined
    Leaf,
    Function,
    Sequence,
    IdentityMapping,
    NameMapping,
    Other,
}

impl KindFamily {
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            KindFamily::Sequence | KindFamily::IdentityMapping | KindFamily::NameMapping
        )
    }
}

impl Kind {
    /// Stable text tag, as shown in diff messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
            Kind::Function => "function",
            Kind::Array => "array",
            Kind::EmptyArray => "empty array",
            Kind::Map => "map",
            Kind::EmptyMap => "empty map",
            Kind::Object => "object",
            Kind::EmptyObject => "empty object",
            Kind::Other => "other",
        }
    }

    pub fn family(&self) -> KindFamily {
        match self {
            Kind::String | Kind::Number | Kind::Boolean | Kind::Null | Kind::Undefined => {
                KindFamily::Leaf
            }
            Kind::Function => KindFamily::Function,
            Kind::Array | Kind::EmptyArray => KindFamily::Sequence,
            Kind::Map | Kind::EmptyMap => KindFamily::IdentityMapping,
            Kind::Object | Kind::EmptyObject => KindFamily::NameMapping,
            Kind::Other => KindFamily::Other,
        }
    }

    pub fn is_container(&self) -> bool {
        self.family().is_container()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value.
///
/// With `ignore_empty` set, empty containers report the same tag as
/// non-empty ones; otherwise they report `empty array`, `empty map` or
/// `empty object`. Emptiness counts raw children, before key filtering.
pub fn classify(value: &Value, ignore_empty: bool) -> Kind {
    let sized = |len: usize, full: Kind, empty: Kind| {
        if ignore_empty || len > 0 {
            full
        } else {
            empty
        }
    };
    match value {
        Value::String(_) => Kind::String,
        Value::Number(_) => Kind::Number,
        Value::Bool(_) => Kind::Boolean,
        Value::Null => Kind::Null,
        Value::Undefined => Kind::Undefined,
        Value::Function(_) => Kind::Function,
        Value::Array(a) => sized(a.borrow().len(), Kind::Array, Kind::EmptyArray),
        Value::Map(m) => sized(m.borrow().len(), Kind::Map, Kind::EmptyMap),
        Value::Object(o) => sized(o.borrow().len(), Kind::Object, Kind::EmptyObject),
        Value::Symbol(_) | Value::Opaque(_) => Kind::Other,
    }
}
