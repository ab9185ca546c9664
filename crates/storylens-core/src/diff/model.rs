//! Diff output types.

use crate::classify::Kind;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// What a [`DiffRecord`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Kind tag differs; nothing below was compared
    TypeChanged,
    /// Leaf (or identity-compared) value differs
    ValueChanged,
    /// Array lost occurrences of some values
    ValuesRemoved,
    /// Array kept the same values but positions differ
    ItemsMoved,
    /// Array gained occurrences of some values
    ValuesAdded,
    /// Mapping lost keys (one record for all of them)
    KeysRemoved,
    /// Mapping gained a key (one record per key)
    KeyAdded,
}

/// One reported difference between two snapshots, scoped to a path.
///
/// Only the fields relevant to `change` are populated:
///
/// | change | populated |
/// |---|---|
/// | `TypeChanged`, `ValueChanged` | `new_value`, `old_value` |
/// | `ValuesRemoved` | `new_value` (array), `removed_values` |
/// | `ItemsMoved` | `new_value` (array), `old_value` (array) |
/// | `ValuesAdded` | `new_value` (array), `added_values` |
/// | `KeysRemoved` | `keys`, `old_value` (mapping), `removed_values` |
/// | `KeyAdded` | `keys`, `new_value` (the added child) |
#[derive(Debug, Clone)]
pub struct DiffRecord {
    pub path: String,
    pub change: ChangeKind,
    pub message: String,
    pub new_value: Option<Value>,
    pub old_value: Option<Value>,
    pub added_values: Vec<Value>,
    pub removed_values: Vec<Value>,
    pub keys: Vec<String>,
}

impl DiffRecord {
    fn new(path: &str, change: ChangeKind, message: String) -> Self {
        Self {
            path: path.to_string(),
            change,
            message,
            new_value: None,
            old_value: None,
            added_values: Vec::new(),
            removed_values: Vec::new(),
            keys: Vec::new(),
        }
    }

    pub fn type_changed(path: &str, old_kind: Kind, new_kind: Kind, new: &Value, old: &Value) -> Self {
        Self {
            new_value: Some(new.clone()),
            old_value: Some(old.clone()),
            ..Self::new(
                path,
                ChangeKind::TypeChanged,
                format!("type changed from {} to {}", old_kind, new_kind),
            )
        }
    }

    pub fn value_changed(path: &str, new: &Value, old: &Value) -> Self {
        Self {
            new_value: Some(new.clone()),
            old_value: Some(old.clone()),
            ..Self::new(path, ChangeKind::ValueChanged, "value changed".to_string())
        }
    }

    pub fn values_removed(path: &str, array: &Value, removed: Vec<Value>) -> Self {
        Self {
            new_value: Some(array.clone()),
            ..Self::new(
                path,
                ChangeKind::ValuesRemoved,
                format!("{} {} removed from array", removed.len(), plural(removed.len(), "value", "values")),
            )
        }
        .with_removed(removed)
    }

    pub fn items_moved(path: &str, new_array: &Value, old_array: &Value, moved: usize) -> Self {
        Self {
            new_value: Some(new_array.clone()),
            old_value: Some(old_array.clone()),
            ..Self::new(
                path,
                ChangeKind::ItemsMoved,
                format!("{} {} in array moved", moved, plural(moved, "item", "items")),
            )
        }
    }

    pub fn values_added(path: &str, array: &Value, added: Vec<Value>) -> Self {
        Self {
            new_value: Some(array.clone()),
            ..Self::new(
                path,
                ChangeKind::ValuesAdded,
                format!("{} {} added to array", added.len(), plural(added.len(), "value", "values")),
            )
        }
        .with_added(added)
    }

    pub fn keys_removed(path: &str, mapping: &Value, keys: Vec<String>, removed: Vec<Value>) -> Self {
        let quoted: Vec<String> = keys.iter().map(|k| format!("\"{}\"", k)).collect();
        Self {
            old_value: Some(mapping.clone()),
            keys,
            ..Self::new(
                path,
                ChangeKind::KeysRemoved,
                format!(
                    "{} {} removed: {}",
                    quoted.len(),
                    plural(quoted.len(), "property", "properties"),
                    quoted.join(", ")
                ),
            )
        }
        .with_removed(removed)
    }

    pub fn key_added(path: &str, key: &str, child: &Value) -> Self {
        Self {
            new_value: Some(child.clone()),
            keys: vec![key.to_string()],
            ..Self::new(path, ChangeKind::KeyAdded, format!("property added: \"{}\"", key))
        }
    }

    fn with_added(mut self, added: Vec<Value>) -> Self {
        self.added_values = added;
        self
    }

    fn with_removed(mut self, removed: Vec<Value>) -> Self {
        self.removed_values = removed;
        self
    }
}

/// Serializable rendering of a [`DiffRecord`].
///
/// Values are captured with [`Value::to_json_preview`], so the view is
/// detached from the live graph and safe to emit for cyclic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecordView {
    pub path: String,
    pub change: ChangeKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_values: Vec<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_values: Vec<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
}

impl From<&DiffRecord> for DiffRecordView {
    fn from(record: &DiffRecord) -> Self {
        Self {
            path: record.path.clone(),
            change: record.change,
            message: record.message.clone(),
            new_value: record.new_value.as_ref().map(Value::to_json_preview),
            old_value: record.old_value.as_ref().map(Value::to_json_preview),
            added_values: record.added_values.iter().map(Value::to_json_preview).collect(),
            removed_values: record.removed_values.iter().map(Value::to_json_preview).collect(),
            keys: record.keys.clone(),
        }
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_changed_message_names_both_kinds() {
        let r = DiffRecord::type_changed(
            "hp",
            Kind::Number,
            Kind::String,
            &Value::from("x"),
            &Value::from(1),
        );
        assert_eq!(r.message, "type changed from number to string");
        assert_eq!(r.change, ChangeKind::TypeChanged);
    }

    #[test]
    fn test_messages_pluralize() {
        let arr = Value::array([]);
        assert_eq!(
            DiffRecord::values_added("a", &arr, vec![Value::from(1)]).message,
            "1 value added to array"
        );
        assert_eq!(
            DiffRecord::items_moved("a", &arr, &arr, 2).message,
            "2 items in array moved"
        );
        let r = DiffRecord::keys_removed("o", &arr, vec!["b".into(), "d".into()], vec![]);
        assert_eq!(r.message, "2 properties removed: \"b\", \"d\"");
    }

    #[test]
    fn test_view_skips_unpopulated_fields() {
        let r = DiffRecord::key_added("State", "flag", &Value::from(true));
        let json = serde_json::to_value(DiffRecordView::from(&r)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "State",
                "change": "key_added",
                "message": "property added: \"flag\"",
                "new_value": true,
                "keys": ["flag"],
            })
        );
    }
}
