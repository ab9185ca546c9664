//! Human-readable summary renderer for state diffs.

use crate::classify::{classify, Kind};
use crate::diff::model::{ChangeKind, DiffRecord};
use crate::value::Value;

/// Render a human-readable Markdown/text summary of a list of [`DiffRecord`]s.
///
/// Records are grouped by what changed and keep their original order within
/// a group. The summary is informational only.
pub fn render_human_summary(records: &[DiffRecord]) -> String {
    let mut out = String::new();
    out.push_str("## State Diff\n\n");
    out.push_str(&format!("**Changes**: {}\n\n", records.len()));

    if records.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    section(&mut out, "Type Changes", records, |c| c == ChangeKind::TypeChanged);
    section(&mut out, "Value Changes", records, |c| c == ChangeKind::ValueChanged);
    section(&mut out, "Array Changes", records, |c| {
        matches!(
            c,
            ChangeKind::ValuesRemoved | ChangeKind::ItemsMoved | ChangeKind::ValuesAdded
        )
    });
    section(&mut out, "Property Changes", records, |c| {
        matches!(c, ChangeKind::KeysRemoved | ChangeKind::KeyAdded)
    });

    out
}

fn section(
    out: &mut String,
    title: &str,
    records: &[DiffRecord],
    include: impl Fn(ChangeKind) -> bool,
) {
    let selected: Vec<&DiffRecord> = records.iter().filter(|r| include(r.change)).collect();
    if selected.is_empty() {
        return;
    }
    out.push_str(&format!("### {}\n\n", title));
    for record in selected {
        out.push_str(&format!("- `{}`: {}{}\n", display_path(&record.path), record.message, detail(record)));
    }
    out.push('\n');
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

fn detail(record: &DiffRecord) -> String {
    match record.change {
        ChangeKind::TypeChanged | ChangeKind::ValueChanged => match (&record.old_value, &record.new_value) {
            (Some(old), Some(new)) => format!(
                " (`{}` → `{}`)",
                render_value_preview(old),
                render_value_preview(new)
            ),
            _ => String::new(),
        },
        ChangeKind::ValuesAdded => list(&record.added_values),
        ChangeKind::ValuesRemoved | ChangeKind::KeysRemoved => list(&record.removed_values),
        ChangeKind::KeyAdded => record
            .new_value
            .as_ref()
            .map(|v| format!(" = `{}`", render_value_preview(v)))
            .unwrap_or_default(),
        ChangeKind::ItemsMoved => String::new(),
    }
}

fn list(values: &[Value]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = values
        .iter()
        .map(|v| format!("`{}`", render_value_preview(v)))
        .collect();
    format!(": {}", rendered.join(", "))
}

/// One-line preview of a value, as shown next to a key in a state listing.
///
/// Primitives render as their text, containers as a child count, empty
/// containers by kind name.
pub fn render_value_preview(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.to_string(),
        Value::Symbol(s) => format!("Symbol({})", s),
        Value::Function(f) => format!("function {}", f.name()),
        Value::Opaque(o) => format!("[{}]", o.type_name()),
        _ => {
            let len = value.len().unwrap_or(0);
            match classify(value, false) {
                Kind::Array => format!("(items: {})", len),
                Kind::Map => format!("(size: {})", len),
                Kind::Object => format!("(properties: {})", len),
                kind => kind.as_str().to_string(),
            }
        }
    }
}

/// Integral numbers print without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        // -0 prints as 0
        format!("{}", n as i128)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_empty() {
        let s = render_human_summary(&[]);
        assert!(s.contains("**Changes**: 0"));
        assert!(s.contains("_No changes detected._"));
    }

    #[test]
    fn test_summary_groups_records() {
        let arr = Value::array([Value::from("sword")]);
        let records = vec![
            DiffRecord::values_added("State.inventory", &arr, vec![Value::from("sword")]),
            DiffRecord::value_changed("State.gold", &Value::from(7), &Value::from(5)),
            DiffRecord::key_added("", "flag", &Value::from(true)),
        ];
        let s = render_human_summary(&records);

        assert!(s.contains("### Value Changes"));
        assert!(s.contains("- `State.gold`: value changed (`5` → `7`)"));
        assert!(s.contains("### Array Changes"));
        assert!(s.contains("- `State.inventory`: 1 value added to array: `sword`"));
        assert!(s.contains("- `<root>`: property added: \"flag\" = `true`"));
        assert!(!s.contains("### Type Changes"));
        assert!(s.find("### Value Changes") < s.find("### Array Changes"));
    }

    #[test]
    fn test_preview_containers() {
        assert_eq!(render_value_preview(&Value::array([Value::Null])), "(items: 1)");
        assert_eq!(render_value_preview(&Value::array([])), "empty array");
        assert_eq!(
            render_value_preview(&Value::map([("a", Value::from(1)), ("b", Value::from(2))])),
            "(size: 2)"
        );
        assert_eq!(render_value_preview(&Value::object::<&str>([])), "empty object");
        assert_eq!(
            render_value_preview(&Value::object([("hp", Value::from(3))])),
            "(properties: 1)"
        );
    }

    #[test]
    fn test_preview_numbers() {
        assert_eq!(render_value_preview(&Value::from(3)), "3");
        assert_eq!(render_value_preview(&Value::from(-0.0)), "0");
        assert_eq!(render_value_preview(&Value::from(2.5)), "2.5");
        assert_eq!(render_value_preview(&Value::from(f64::NAN)), "NaN");
    }
}
