//! Key enumeration.
//!
//! Keys come out sorted (numeric for indices, lexicographic for names) so
//! that two independently built snapshots over equal data list their
//! children identically.

use crate::value::Value;

pub use crate::value::Key;

/// Whether a child value takes part in traversal.
///
/// Callables and foreign-constructed objects are not data.
pub fn is_allowed_value(value: &Value) -> bool {
    !matches!(value, Value::Function(_) | Value::Opaque(_))
}

/// List the data-bearing child keys of a container, sorted.
///
/// Non-containers have no keys.
pub fn keys(value: &Value) -> Vec<Key> {
    match value {
        Value::Array(a) => a
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, v)| is_allowed_value(v))
            .map(|(i, _)| Key::Index(i))
            .collect(),
        Value::Map(m) => {
            let mut names: Vec<String> = m
                .borrow()
                .iter()
                .filter(|(_, v)| is_allowed_value(v))
                .map(|(k, _)| k.clone())
                .collect();
            names.sort();
            names.into_iter().map(Key::Name).collect()
        }
        // BTreeMap iteration is already sorted
        Value::Object(o) => o
            .borrow()
            .iter()
            .filter(|(_, v)| is_allowed_value(v))
            .map(|(k, _)| Key::Name(k.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Data-bearing children of a container, in key order
pub fn entries(value: &Value) -> Vec<(Key, Value)> {
    keys(value)
        .into_iter()
        .filter_map(|key| value.get(&key).map(|child| (key, child)))
        .collect()
}
