//! Snapshot tree comparison.
//!
//! The core entry point is [`compare`], which walks two snapshot trees of the
//! same state taken at different times and produces ordered
//! [`DiffRecord`]s. Rules are applied in this order at every node:
//!
//! 1. kind tags differ → one `TypeChanged` record, no recursion;
//! 2. leaves (and functions/opaque values) → `ValueChanged` unless strictly equal;
//! 3. arrays → multiset delta (see [`array_records`]), or a positional walk
//!    under [`ElementMatching::Structural`] when an element is a container;
//! 4. maps and objects → removed keys, added keys, then shared keys recursively.

use crate::classify::KindFamily;
use crate::diff::model::DiffRecord;
use crate::errors::{Result, StoryLensError};
use crate::path::full_path;
use crate::snapshot::TreeNode;
use crate::value::{Identity, Key, Value};
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

/// How array elements on the two sides are matched up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementMatching {
    /// Multiset of strict identities. Fits two captures of one live graph,
    /// where an untouched element is the same allocation on both sides.
    #[default]
    Identity,
    /// Multiset only for arrays of leaves; an array holding a container is
    /// walked position by position. Fits graphs that share no allocations,
    /// such as two loaded documents or a live value and its clone.
    Structural,
}

/// Compare a new snapshot tree against an older one.
///
/// Both trees are expected to be captures of the same live graph. Comparing
/// a tree against a tree built from unchanged data yields an empty list.
///
/// # Errors
///
/// - `PathConsistency`: a key present in a node's key list has no item at
///   the path the encoder computes for it. This means the tree was not built
///   by [`build`](crate::snapshot::build) or the two trees disagree about
///   their root paths.
pub fn compare(new: &TreeNode, old: &TreeNode) -> Result<Vec<DiffRecord>> {
    compare_with(new, old, ElementMatching::Identity)
}

/// Like [`compare`], with an explicit array element matching.
///
/// # Errors
///
/// - `PathConsistency`: as for [`compare`].
pub fn compare_with(
    new: &TreeNode,
    old: &TreeNode,
    matching: ElementMatching,
) -> Result<Vec<DiffRecord>> {
    let start = Instant::now();
    log_op_start!("compare", path = new.path.as_str());

    let mut records = Vec::new();
    let comparator = TreeComparator { matching };
    match comparator.nodes(new, old, &mut records) {
        Ok(()) => {
            log_op_end!(
                "compare",
                duration_ms = start.elapsed().as_millis() as u64,
                record_count = records.len()
            );
            Ok(records)
        }
        Err(err) => {
            log_op_error!(
                "compare",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

struct TreeComparator {
    matching: ElementMatching,
}

impl TreeComparator {
    fn nodes(&self, new: &TreeNode, old: &TreeNode, out: &mut Vec<DiffRecord>) -> Result<()> {
        if new.kind != old.kind {
            out.push(DiffRecord::type_changed(
                &new.path, old.kind, new.kind, &new.value, &old.value,
            ));
            return Ok(());
        }

        if new.is_back_reference() || old.is_back_reference() {
            // Two back-references of the same kind carry nothing further to compare
            if !(new.is_back_reference() && old.is_back_reference()) {
                out.push(DiffRecord::value_changed(&new.path, &new.value, &old.value));
            }
            return Ok(());
        }

        match new.kind.family() {
            KindFamily::Leaf | KindFamily::Function | KindFamily::Other => {
                if !new.value.same_value(&old.value) {
                    out.push(DiffRecord::value_changed(&new.path, &new.value, &old.value));
                }
                Ok(())
            }
            KindFamily::Sequence => self.sequences(new, old, out),
            KindFamily::IdentityMapping | KindFamily::NameMapping => self.mappings(new, old, out),
        }
    }

    fn sequences(&self, new: &TreeNode, old: &TreeNode, out: &mut Vec<DiffRecord>) -> Result<()> {
        let new_values: Vec<Value> = new.items().iter().map(|i| i.value.clone()).collect();
        let old_values: Vec<Value> = old.items().iter().map(|i| i.value.clone()).collect();

        if self.matching == ElementMatching::Structural && !all_leaves(&new_values, &old_values) {
            let pairing = pair_by_position(
                new.keys().iter().zip(new.items()),
                old.keys().iter().zip(old.items()),
            );
            out.extend(positional_records(
                &new.path,
                &new.value,
                pairing.added.iter().map(|i| i.value.clone()).collect(),
                pairing.removed.iter().map(|i| i.value.clone()).collect(),
            ));
            for (new_item, old_item) in pairing.shared {
                self.nodes(new_item, old_item, out)?;
            }
            return Ok(());
        }

        out.extend(array_records(
            &new.path,
            &new.value,
            &old.value,
            &new_values,
            &old_values,
        ));

        // Container elements are not diffed element-to-element: the multiset
        // model has no way to pair them up.
        let mut old_leaves: HashMap<Identity, &TreeNode> = HashMap::new();
        for item in old.items().iter().filter(|i| i.value.is_leaf()) {
            old_leaves.entry(item.value.identity()).or_insert(item);
        }
        for item in new.items().iter().filter(|i| i.value.is_leaf()) {
            if let Some(previous) = old_leaves.get(&item.value.identity()) {
                self.nodes(item, previous, out)?;
            }
        }
        Ok(())
    }

    fn mappings(&self, new: &TreeNode, old: &TreeNode, out: &mut Vec<DiffRecord>) -> Result<()> {
        let family = new.kind.family();
        let new_names: Vec<String> = new.keys().iter().map(Key::as_name).collect();
        let old_names: Vec<String> = old.keys().iter().map(Key::as_name).collect();
        let new_set: BTreeSet<&str> = new_names.iter().map(String::as_str).collect();
        let old_set: BTreeSet<&str> = old_names.iter().map(String::as_str).collect();

        let removed: Vec<&String> = old_names.iter().filter(|k| !new_set.contains(k.as_str())).collect();
        if !removed.is_empty() {
            let mut removed_values = Vec::with_capacity(removed.len());
            for name in &removed {
                let item = expect_child(old, family, name, "old")?;
                removed_values.push(item.value.clone());
            }
            out.push(DiffRecord::keys_removed(
                &new.path,
                &old.value,
                removed.into_iter().cloned().collect(),
                removed_values,
            ));
        }

        for name in new_names.iter().filter(|k| !old_set.contains(k.as_str())) {
            let item = expect_child(new, family, name, "new")?;
            out.push(DiffRecord::key_added(&new.path, name, &item.value));
        }

        for name in new_names.iter().filter(|k| old_set.contains(k.as_str())) {
            let new_item = expect_child(new, family, name, "new")?;
            // Looked up by the path computed on the new side: both trees must
            // agree on where a shared key lives.
            let old_item = old
                .child_at(&new_item.path)
                .ok_or_else(|| path_fault(new, name, &new_item.path, "old"))?;
            self.nodes(new_item, old_item, out)?;
        }
        Ok(())
    }
}

fn expect_child<'a>(
    node: &'a TreeNode,
    family: KindFamily,
    name: &str,
    side: &str,
) -> Result<&'a TreeNode> {
    let expected = full_path(&node.path, family, &Key::Name(name.to_string()));
    node.child_at(&expected)
        .ok_or_else(|| path_fault(node, name, &expected, side))
}

fn path_fault(node: &TreeNode, name: &str, expected: &str, side: &str) -> StoryLensError {
    StoryLensError::PathConsistency {
        parent_path: node.path.clone(),
        key: name.to_string(),
        expected_path: expected.to_string(),
        side: side.to_string(),
    }
}

/// Occurrence-count delta between two element lists
#[derive(Debug, Default)]
pub(crate) struct ArrayDelta {
    pub added: Vec<Value>,
    pub removed: Vec<Value>,
}

/// Which values gained or lost occurrences, ignoring positions.
///
/// Values are visited in first-appearance order over `new` then `old`, and a
/// value whose count changed by `n` appears `n` times.
pub(crate) fn array_delta(new: &[Value], old: &[Value]) -> ArrayDelta {
    let mut order: Vec<(Identity, Value)> = Vec::new();
    let mut counts: HashMap<Identity, (usize, usize)> = HashMap::new();
    for (value, is_new) in new.iter().map(|v| (v, true)).chain(old.iter().map(|v| (v, false))) {
        let id = value.identity();
        let entry = counts.entry(id.clone()).or_insert_with(|| {
            order.push((id, value.clone()));
            (0, 0)
        });
        if is_new {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let mut delta = ArrayDelta::default();
    for (id, value) in order {
        let (new_count, old_count) = counts[&id];
        if new_count > old_count {
            delta
                .added
                .extend(std::iter::repeat(value).take(new_count - old_count));
        } else if old_count > new_count {
            delta
                .removed
                .extend(std::iter::repeat(value).take(old_count - new_count));
        }
    }
    delta
}

/// Positions within the common length whose elements differ
pub(crate) fn moved_count(new: &[Value], old: &[Value]) -> usize {
    new.iter().zip(old).filter(|(n, o)| !n.same_value(o)).count()
}

/// Records for one array position.
///
/// Removals are reported first and suppress move detection, since a removal
/// already explains shifted positions. Additions are reported independently.
pub(crate) fn array_records(
    path: &str,
    new_array: &Value,
    old_array: &Value,
    new: &[Value],
    old: &[Value],
) -> Vec<DiffRecord> {
    let delta = array_delta(new, old);
    let mut records = Vec::new();
    if !delta.removed.is_empty() {
        records.push(DiffRecord::values_removed(path, new_array, delta.removed));
    } else {
        let moved = moved_count(new, old);
        if moved > 0 {
            records.push(DiffRecord::items_moved(path, new_array, old_array, moved));
        }
    }
    if !delta.added.is_empty() {
        records.push(DiffRecord::values_added(path, new_array, delta.added));
    }
    records
}

/// Whether no element on either side is a container
pub(crate) fn all_leaves(new: &[Value], old: &[Value]) -> bool {
    new.iter().chain(old).all(|v| !v.is_container())
}

/// Elements matched by index
pub(crate) struct Pairing<'a, T> {
    pub shared: Vec<(&'a T, &'a T)>,
    pub added: Vec<&'a T>,
    pub removed: Vec<&'a T>,
}

/// Match elements that sit at the same index; the rest are added or removed.
///
/// Indices come from the keys, not from list positions, so a skipped element
/// on one side does not shift the ones after it.
pub(crate) fn pair_by_position<'a, T>(
    new: impl IntoIterator<Item = (&'a Key, &'a T)>,
    old: impl IntoIterator<Item = (&'a Key, &'a T)>,
) -> Pairing<'a, T>
where
    T: 'a,
{
    let mut old_by_key: BTreeMap<&Key, &T> = old.into_iter().collect();
    let mut pairing = Pairing {
        shared: Vec::new(),
        added: Vec::new(),
        removed: Vec::new(),
    };
    for (key, item) in new {
        match old_by_key.remove(key) {
            Some(previous) => pairing.shared.push((item, previous)),
            None => pairing.added.push(item),
        }
    }
    pairing.removed = old_by_key.into_values().collect();
    pairing
}

/// Records for elements present at an index on one side only
pub(crate) fn positional_records(
    path: &str,
    new_array: &Value,
    added: Vec<Value>,
    removed: Vec<Value>,
) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    if !removed.is_empty() {
        records.push(DiffRecord::values_removed(path, new_array, removed));
    }
    if !added.is_empty() {
        records.push(DiffRecord::values_added(path, new_array, added));
    }
    records
}
