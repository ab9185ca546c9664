//! Live state values.
//!
//! The story state is a mutable, possibly cyclic graph. Containers are shared
//! `Rc<RefCell<..>>` handles, so cloning a [`Value`] aliases the same
//! container rather than copying it. Identity (pointer) comparison is what
//! `same_value` uses for everything that is not a plain leaf.

pub mod json;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an ordered sequence
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared handle to an identity-keyed, insertion-ordered mapping
pub type MapRef = Rc<RefCell<Vec<(String, Value)>>>;
/// Shared handle to a name-keyed mapping
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Value>>>;

/// A callable living in the host runtime. Never treated as data.
#[derive(Debug)]
pub struct Callable {
    name: String,
}

impl Callable {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A foreign-constructed object (engine internals, host handles).
///
/// Opaque values are invisible to key enumeration, cloning and diffing.
#[derive(Debug)]
pub struct Opaque {
    type_name: String,
}

impl Opaque {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// One value in the live state graph
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    /// Unique token; two symbols are equal only if they are the same symbol
    Symbol(Rc<str>),
    Function(Rc<Callable>),
    Opaque(Rc<Opaque>),
    Array(ArrayRef),
    Map(MapRef),
    Object(ObjectRef),
}

/// A child key inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Position in an ordered sequence
    Index(usize),
    /// Declared key of a map or object
    Name(String),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }

    /// Key as a mapping key (indices become their decimal text)
    pub fn as_name(&self) -> String {
        match self {
            Key::Index(i) => i.to_string(),
            Key::Name(n) => n.clone(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(n) => f.write_str(n),
        }
    }
}

/// Hashable strict-equality key for a value.
///
/// Leaves are keyed by content, everything else by allocation address.
/// `-0` and `0` share a key; every NaN shares a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    String(Rc<str>),
    Ref(usize),
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

fn addr<T: ?Sized>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const u8 as usize
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// A fresh symbol, distinct from every other symbol
    pub fn symbol(description: impl AsRef<str>) -> Self {
        Value::Symbol(Rc::from(description.as_ref()))
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Rc::new(Callable { name: name.into() }))
    }

    pub fn opaque(type_name: impl Into<String>) -> Self {
        Value::Opaque(Rc::new(Opaque {
            type_name: type_name.into(),
        }))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// An insertion-ordered map. Later duplicates overwrite earlier entries in place.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let map = Value::Map(Rc::new(RefCell::new(Vec::new())));
        for (k, v) in entries {
            map.set(Key::Name(k.into()), v);
        }
        map
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// True for undefined, null, booleans, numbers and strings
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_) | Value::Object(_))
    }

    /// Allocation address of a container, `None` for everything else
    pub fn container_id(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(addr(a)),
            Value::Map(m) => Some(addr(m)),
            Value::Object(o) => Some(addr(o)),
            _ => None,
        }
    }

    pub fn identity(&self) -> Identity {
        match self {
            Value::Undefined => Identity::Undefined,
            Value::Null => Identity::Null,
            Value::Bool(b) => Identity::Bool(*b),
            Value::Number(n) => Identity::Number(number_bits(*n)),
            Value::String(s) => Identity::String(s.clone()),
            Value::Symbol(s) => Identity::Ref(addr(s)),
            Value::Function(f) => Identity::Ref(addr(f)),
            Value::Opaque(o) => Identity::Ref(addr(o)),
            Value::Array(a) => Identity::Ref(addr(a)),
            Value::Map(m) => Identity::Ref(addr(m)),
            Value::Object(o) => Identity::Ref(addr(o)),
        }
    }

    /// Strict equality: leaves by content, everything else by identity
    pub fn same_value(&self, other: &Value) -> bool {
        self.identity() == other.identity()
    }

    /// Number of raw children (before any filtering), `None` for non-containers
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.borrow().len()),
            Value::Map(m) => Some(m.borrow().len()),
            Value::Object(o) => Some(o.borrow().len()),
            _ => None,
        }
    }

    /// Read the child designated by `key`
    pub fn get(&self, key: &Key) -> Option<Value> {
        match (self, key) {
            (Value::Array(a), Key::Index(i)) => a.borrow().get(*i).cloned(),
            (Value::Map(m), key) => {
                let name = key.as_name();
                m.borrow()
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| v.clone())
            }
            (Value::Object(o), key) => o.borrow().get(&key.as_name()).cloned(),
            _ => None,
        }
    }

    /// Write the child designated by `key`.
    ///
    /// Arrays grow with `Undefined` when written past their end. Returns
    /// false when the key does not apply to this value.
    pub fn set(&self, key: Key, value: Value) -> bool {
        match (self, key) {
            (Value::Array(a), Key::Index(i)) => {
                let mut items = a.borrow_mut();
                if i >= items.len() {
                    items.resize(i + 1, Value::Undefined);
                }
                items[i] = value;
                true
            }
            (Value::Array(_), Key::Name(_)) => false,
            (Value::Map(m), key) => {
                let name = key.as_name();
                let mut entries = m.borrow_mut();
                match entries.iter_mut().find(|(k, _)| *k == name) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((name, value)),
                }
                true
            }
            (Value::Object(o), key) => {
                o.borrow_mut().insert(key.as_name(), value);
                true
            }
            _ => false,
        }
    }

    /// Remove the child designated by `key`, returning it
    pub fn remove(&self, key: &Key) -> Option<Value> {
        match (self, key) {
            (Value::Array(a), Key::Index(i)) => {
                let mut items = a.borrow_mut();
                (*i < items.len()).then(|| items.remove(*i))
            }
            (Value::Map(m), key) => {
                let name = key.as_name();
                let mut entries = m.borrow_mut();
                let pos = entries.iter().position(|(k, _)| *k == name)?;
                Some(entries.remove(pos).1)
            }
            (Value::Object(o), key) => o.borrow_mut().remove(&key.as_name()),
            _ => None,
        }
    }

    /// Append to an array. Returns false for anything else.
    pub fn push(&self, value: Value) -> bool {
        match self {
            Value::Array(a) => {
                a.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    // Shallow on purpose: containers may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Symbol(s) => write!(f, "Symbol({:?})", s),
            Value::Function(c) => write!(f, "Function({})", c.name()),
            Value::Opaque(o) => write!(f, "Opaque({})", o.type_name()),
            Value::Array(a) => write!(f, "Array(len={})", a.borrow().len()),
            Value::Map(m) => write!(f, "Map(size={})", m.borrow().len()),
            Value::Object(o) => write!(f, "Object(keys={})", o.borrow().len()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}
