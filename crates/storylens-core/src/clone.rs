//! Deep cloning of value graphs.
//!
//! The clone is function-stripped and preserves the aliasing topology of the
//! source: every distinct source container is cloned exactly once, and every
//! reference to it resolves to that one clone. Cycles are broken by
//! registering each clone before its children are filled in.

use crate::keys::{is_allowed_value, Key};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Source container identity → its (possibly still in-progress) clone
#[derive(Debug, Default)]
pub struct CloneMap {
    clones: HashMap<usize, Value>,
}

impl CloneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone already registered for `source`, if any
    pub fn get(&self, source: &Value) -> Option<&Value> {
        source.container_id().and_then(|id| self.clones.get(&id))
    }

    /// Number of distinct containers cloned so far
    pub fn len(&self) -> usize {
        self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    fn register(&mut self, source: &Value, clone: Value) {
        if let Some(id) = source.container_id() {
            self.clones.insert(id, clone);
        }
    }
}

/// Deep-clone a value with a fresh [`CloneMap`]
pub fn clone_value(value: &Value) -> Value {
    clone_with(value, &mut CloneMap::new())
}

/// Deep-clone a value, sharing clones with earlier calls on the same map.
///
/// Leaves, functions, symbols and opaque values are returned as-is.
/// Function and opaque children of containers are dropped.
pub fn clone_with(value: &Value, clones: &mut CloneMap) -> Value {
    if !value.is_container() {
        return value.clone();
    }
    if let Some(existing) = clones.get(value) {
        return existing.clone();
    }

    let clone = empty_like(value);
    // Must happen before recursing, or a direct cycle never terminates.
    clones.register(value, clone.clone());

    match value {
        Value::Array(source) => {
            let children: Vec<Value> = source.borrow().clone();
            for child in children.iter().filter(|c| is_allowed_value(c)) {
                let child_clone = clone_with(child, clones);
                clone.push(child_clone);
            }
        }
        Value::Map(source) => {
            let entries: Vec<(String, Value)> = source.borrow().clone();
            for (k, child) in entries.iter().filter(|(_, c)| is_allowed_value(c)) {
                let child_clone = clone_with(child, clones);
                clone.set(Key::Name(k.clone()), child_clone);
            }
        }
        Value::Object(source) => {
            let entries: BTreeMap<String, Value> = source.borrow().clone();
            for (k, child) in entries.iter().filter(|(_, c)| is_allowed_value(c)) {
                let child_clone = clone_with(child, clones);
                clone.set(Key::Name(k.clone()), child_clone);
            }
        }
        _ => {}
    }
    clone
}

fn empty_like(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Rc::new(RefCell::new(Vec::new()))),
        Value::Map(_) => Value::Map(Rc::new(RefCell::new(Vec::new()))),
        _ => Value::Object(Rc::new(RefCell::new(BTreeMap::new()))),
    }
}
