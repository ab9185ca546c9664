//! Snapshot tree construction.

use crate::classify::{classify, Kind};
use crate::errors::{Result, StoryLensError};
use crate::ignore::IgnoreSet;
use crate::keys::entries;
use crate::path::full_path;
use crate::snapshot::{NodeBody, TreeNode};
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::HashSet;
use std::time::Instant;

/// Snapshot a container root.
///
/// # Errors
///
/// - `InvalidRoot`: `root` is not an array, map or object
pub fn build(root: &Value, ignore: &IgnoreSet) -> Result<TreeNode> {
    build_at(root, ignore, "")
}

/// Snapshot a container root whose own address is `path`.
///
/// Child paths are prefixed with `path`, so a root addressed as `"State"`
/// yields children such as `"State.gold"`. The root itself is never
/// dropped, even if `path` is in the ignore set.
///
/// # Errors
///
/// - `InvalidRoot`: `root` is not an array, map or object
pub fn build_at(root: &Value, ignore: &IgnoreSet, path: &str) -> Result<TreeNode> {
    let start = Instant::now();
    log_op_start!("build_snapshot", path = path, ignore_len = ignore.len());

    let kind = classify(root, true);
    if !kind.is_container() {
        let err = StoryLensError::InvalidRoot {
            kind: kind.as_str().to_string(),
        };
        log_op_error!(
            "build_snapshot",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return Err(err);
    }

    let mut walker = Walker {
        ignore,
        ancestors: HashSet::new(),
    };
    let tree = walker.container(path.to_string(), root, kind);

    log_op_end!(
        "build_snapshot",
        duration_ms = start.elapsed().as_millis() as u64,
        node_count = tree.node_count()
    );
    Ok(tree)
}

/// Depth-first walk state.
///
/// `ancestors` holds only the containers on the current root-to-node path,
/// so shared (diamond) subtrees are expanded once per path and only true
/// cycles are cut.
struct Walker<'a> {
    ignore: &'a IgnoreSet,
    ancestors: HashSet<usize>,
}

impl Walker<'_> {
    fn node(&mut self, path: String, value: &Value) -> Option<TreeNode> {
        if self.ignore.contains(&path) {
            return None;
        }
        let kind = classify(value, true);
        if let Some(id) = value.container_id() {
            if self.ancestors.contains(&id) {
                return Some(TreeNode {
                    path,
                    kind,
                    value: value.clone(),
                    body: NodeBody::BackReference,
                });
            }
        }
        if kind.is_container() {
            Some(self.container(path, value, kind))
        } else {
            Some(TreeNode {
                path,
                kind,
                value: value.clone(),
                body: NodeBody::Leaf,
            })
        }
    }

    fn container(&mut self, path: String, value: &Value, kind: Kind) -> TreeNode {
        let id = value.container_id();
        if let Some(id) = id {
            self.ancestors.insert(id);
        }

        let family = kind.family();
        let mut keys = Vec::new();
        let mut items = Vec::new();
        for (key, child) in entries(value) {
            let child_path = full_path(&path, family, &key);
            if let Some(item) = self.node(child_path, &child) {
                keys.push(key);
                items.push(item);
            }
        }

        if let Some(id) = id {
            self.ancestors.remove(&id);
        }
        TreeNode {
            path,
            kind,
            value: value.clone(),
            body: NodeBody::Container { keys, items },
        }
    }
}
