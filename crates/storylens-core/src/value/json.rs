//! JSON interop for state dumps.
//!
//! JSON has no identity-keyed maps, so a map is written as an object with a
//! single `"$map"` member holding `[key, value]` pairs.

use super::{Key, Value};
use crate::errors::{Result, StoryLensError};
use serde_json::{Map as JsonMap, Value as Json};
use std::collections::HashSet;

/// Member name marking an identity-keyed map in a JSON dump
pub const MAP_MARKER: &str = "$map";

/// Placeholder written where a value refers back to one of its ancestors
pub const CIRCULAR_MARKER: &str = "[Circular]";

impl Value {
    /// Build a fresh value graph from a JSON document
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a `"$map"` member is not a list of `[string, value]` pairs.
    pub fn from_json(json: &Json) -> Result<Value> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::string(s),
            Json::Array(items) => Value::array(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(members) => match map_entries(members) {
                Some(entries) => {
                    let map = Value::map(Vec::<(String, Value)>::new());
                    for entry in entries {
                        let (k, v) = map_entry(entry)?;
                        map.set(Key::Name(k), Value::from_json(v)?);
                    }
                    map
                }
                None => {
                    let object = Value::object(Vec::<(String, Value)>::new());
                    for (k, v) in members {
                        object.set(Key::Name(k.clone()), Value::from_json(v)?);
                    }
                    object
                }
            },
        })
    }

    /// Render as JSON for display.
    ///
    /// Cycle-safe: a value that is one of its own ancestors becomes
    /// `"[Circular]"`. Functions, opaque objects and symbols are rendered as
    /// descriptive strings; `undefined` becomes `null`.
    pub fn to_json_preview(&self) -> Json {
        let mut ancestors = HashSet::new();
        preview(self, &mut ancestors)
    }
}

fn map_entries(members: &JsonMap<String, Json>) -> Option<&Vec<Json>> {
    if members.len() != 1 {
        return None;
    }
    members.get(MAP_MARKER).and_then(Json::as_array)
}

fn map_entry(entry: &Json) -> Result<(String, &Json)> {
    match entry.as_array().map(Vec::as_slice) {
        Some([Json::String(k), v]) => Ok((k.clone(), v)),
        _ => Err(StoryLensError::InvalidInput {
            reason: format!("`{}` entries must be [string, value] pairs, got {}", MAP_MARKER, entry),
        }),
    }
}

fn preview(value: &Value, ancestors: &mut HashSet<usize>) -> Json {
    let id = match value.container_id() {
        Some(id) if ancestors.contains(&id) => return Json::String(CIRCULAR_MARKER.to_string()),
        Some(id) => id,
        None => return leaf_preview(value),
    };
    ancestors.insert(id);
    let out = match value {
        Value::Array(a) => Json::Array(a.borrow().iter().map(|v| preview(v, ancestors)).collect()),
        Value::Map(m) => {
            let pairs = m
                .borrow()
                .iter()
                .map(|(k, v)| Json::Array(vec![Json::String(k.clone()), preview(v, ancestors)]))
                .collect();
            let mut members = JsonMap::new();
            members.insert(MAP_MARKER.to_string(), Json::Array(pairs));
            Json::Object(members)
        }
        Value::Object(o) => Json::Object(
            o.borrow()
                .iter()
                .map(|(k, v)| (k.clone(), preview(v, ancestors)))
                .collect(),
        ),
        _ => leaf_preview(value),
    };
    ancestors.remove(&id);
    out
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn leaf_preview(value: &Value) -> Json {
    match value {
        Value::Undefined | Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        // Integral values print without a fraction, as they were read
        Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => Json::from(*n as i64),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(n.to_string())),
        Value::String(s) => Json::String(s.to_string()),
        Value::Symbol(s) => Json::String(format!("Symbol({})", s)),
        Value::Function(c) => Json::String(format!("[Function {}]", c.name())),
        Value::Opaque(o) => Json::String(format!("[{}]", o.type_name())),
        Value::Array(_) | Value::Map(_) | Value::Object(_) => Json::Null,
    }
}
