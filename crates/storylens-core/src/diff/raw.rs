//! Live value comparison.
//!
//! [`compare_raw`] applies the tree comparator's rules directly to two value
//! graphs, typically a live state against a deep clone taken earlier. The two
//! sides share no allocations, so arrays use
//! [`ElementMatching::Structural`](crate::diff::ElementMatching): a multiset
//! of leaves, or a positional walk once an element is a container.
//!
//! No tree is built, so it cannot fail; instead it relies on two shortcuts to
//! stay bounded, cycles included:
//!
//! - containers that are the same allocation are unchanged, whatever they
//!   hold;
//! - containers at or below `max_depth` are not explored.

use crate::classify::{classify, KindFamily};
use crate::diff::engine::{all_leaves, array_records, pair_by_position, positional_records};
use crate::diff::model::DiffRecord;
use crate::ignore::IgnoreSet;
use crate::keys::entries;
use crate::path::full_path;
use crate::value::{Identity, Key, Value};
use crate::{log_op_end, log_op_start};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// Depth limit used when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Compare two live values rooted at `path`.
pub fn compare_raw(new: &Value, old: &Value, path: &str, max_depth: usize) -> Vec<DiffRecord> {
    RawComparator {
        max_depth,
        ignore: None,
    }
    .run(new, old, path)
}

/// Like [`compare_raw`], but children whose path is in `ignore` are treated
/// as absent on both sides.
pub fn compare_raw_ignoring(
    new: &Value,
    old: &Value,
    path: &str,
    max_depth: usize,
    ignore: &IgnoreSet,
) -> Vec<DiffRecord> {
    RawComparator {
        max_depth,
        ignore: Some(ignore),
    }
    .run(new, old, path)
}

struct RawComparator<'a> {
    max_depth: usize,
    ignore: Option<&'a IgnoreSet>,
}

impl RawComparator<'_> {
    fn run(&self, new: &Value, old: &Value, path: &str) -> Vec<DiffRecord> {
        let start = Instant::now();
        log_op_start!("compare_raw", path = path, max_depth = self.max_depth);

        let mut records = Vec::new();
        self.walk(new, old, path, 0, &mut records);

        log_op_end!(
            "compare_raw",
            duration_ms = start.elapsed().as_millis() as u64,
            record_count = records.len()
        );
        records
    }

    fn walk(&self, new: &Value, old: &Value, path: &str, depth: usize, out: &mut Vec<DiffRecord>) {
        let new_kind = classify(new, true);
        let old_kind = classify(old, true);
        if new_kind != old_kind {
            out.push(DiffRecord::type_changed(path, old_kind, new_kind, new, old));
            return;
        }

        let family = new_kind.family();
        if !family.is_container() {
            if !new.same_value(old) {
                out.push(DiffRecord::value_changed(path, new, old));
            }
            return;
        }
        if new.same_value(old) || depth >= self.max_depth {
            return;
        }

        let new_children = self.children(new, path, family);
        let old_children = self.children(old, path, family);
        match family {
            KindFamily::Sequence => {
                self.sequences(new, old, path, depth, &new_children, &old_children, out)
            }
            _ => self.mappings(old, path, depth, &new_children, &old_children, out),
        }
    }

    /// Data-bearing children that are not ignored, with their paths
    fn children(&self, value: &Value, path: &str, family: KindFamily) -> Vec<Child> {
        entries(value)
            .into_iter()
            .map(|(key, value)| Child {
                path: full_path(path, family, &key),
                key,
                value,
            })
            .filter(|child| !self.ignore.is_some_and(|set| set.contains(&child.path)))
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn sequences(
        &self,
        new: &Value,
        old: &Value,
        path: &str,
        depth: usize,
        new_children: &[Child],
        old_children: &[Child],
        out: &mut Vec<DiffRecord>,
    ) {
        let new_values: Vec<Value> = new_children.iter().map(|c| c.value.clone()).collect();
        let old_values: Vec<Value> = old_children.iter().map(|c| c.value.clone()).collect();

        if !all_leaves(&new_values, &old_values) {
            let pairing = pair_by_position(
                new_children.iter().map(|c| (&c.key, c)),
                old_children.iter().map(|c| (&c.key, c)),
            );
            out.extend(positional_records(
                path,
                new,
                pairing.added.iter().map(|c| c.value.clone()).collect(),
                pairing.removed.iter().map(|c| c.value.clone()).collect(),
            ));
            for (child, previous) in pairing.shared {
                self.walk(&child.value, &previous.value, &child.path, depth + 1, out);
            }
            return;
        }

        out.extend(array_records(path, new, old, &new_values, &old_values));

        let mut old_leaves: HashMap<Identity, &Child> = HashMap::new();
        for child in old_children.iter().filter(|c| c.value.is_leaf()) {
            old_leaves.entry(child.value.identity()).or_insert(child);
        }
        for child in new_children.iter().filter(|c| c.value.is_leaf()) {
            if let Some(previous) = old_leaves.get(&child.value.identity()) {
                self.walk(&child.value, &previous.value, &child.path, depth + 1, out);
            }
        }
    }

    fn mappings(
        &self,
        old: &Value,
        path: &str,
        depth: usize,
        new_children: &[Child],
        old_children: &[Child],
        out: &mut Vec<DiffRecord>,
    ) {
        let new_names: BTreeSet<String> = new_children.iter().map(|c| c.key.as_name()).collect();
        let old_by_name: HashMap<String, &Child> = old_children
            .iter()
            .map(|c| (c.key.as_name(), c))
            .collect();

        let removed: Vec<&Child> = old_children
            .iter()
            .filter(|c| !new_names.contains(&c.key.as_name()))
            .collect();
        if !removed.is_empty() {
            out.push(DiffRecord::keys_removed(
                path,
                old,
                removed.iter().map(|c| c.key.as_name()).collect(),
                removed.iter().map(|c| c.value.clone()).collect(),
            ));
        }

        for child in new_children
            .iter()
            .filter(|c| !old_by_name.contains_key(&c.key.as_name()))
        {
            out.push(DiffRecord::key_added(path, &child.key.as_name(), &child.value));
        }

        for child in new_children {
            if let Some(previous) = old_by_name.get(&child.key.as_name()) {
                self.walk(&child.value, &previous.value, &child.path, depth + 1, out);
            }
        }
    }
}

struct Child {
    path: String,
    key: Key,
    value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::ChangeKind;

    #[test]
    fn test_same_container_is_not_explored() {
        let shared = Value::array([Value::from(1)]);
        let records = compare_raw(&shared, &shared, "", DEFAULT_MAX_DEPTH);
        assert!(records.is_empty());
    }

    #[test]
    fn test_depth_limit_stops_descent() {
        let new = Value::object([("a", Value::object([("b", Value::from(2))]))]);
        let old = Value::object([("a", Value::object([("b", Value::from(1))]))]);

        assert_eq!(compare_raw(&new, &old, "", 2).len(), 1);
        assert!(compare_raw(&new, &old, "", 1).is_empty());
        assert!(compare_raw(&new, &old, "", 0).is_empty());
    }

    #[test]
    fn test_leaf_roots_compare_directly() {
        let records = compare_raw(&Value::from(2), &Value::from(1), "hp", 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].change, ChangeKind::ValueChanged);
        assert_eq!(records[0].path, "hp");
    }

    #[test]
    fn test_container_elements_are_walked_by_position() {
        let old = Value::array([Value::object([("hp", Value::from(3))])]);
        let new = Value::array([
            Value::object([("hp", Value::from(2))]),
            Value::object([("hp", Value::from(9))]),
        ]);

        let records = compare_raw(&new, &old, "party", DEFAULT_MAX_DEPTH);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].change, ChangeKind::ValuesAdded);
        assert_eq!(records[0].path, "party");
        assert_eq!(records[1].change, ChangeKind::ValueChanged);
        assert_eq!(records[1].path, "party[0].hp");
    }

    #[test]
    fn test_ignored_child_is_invisible() {
        let new = Value::object([("a", Value::from(1)), ("b", Value::from(5))]);
        let old = Value::object([("a", Value::from(1))]);
        let ignore: IgnoreSet = ["State.b"].into_iter().collect();

        assert!(compare_raw_ignoring(&new, &old, "State", DEFAULT_MAX_DEPTH, &ignore).is_empty());
        assert_eq!(compare_raw(&new, &old, "State", DEFAULT_MAX_DEPTH).len(), 1);
    }
}
