//! Path encoding.
//!
//! Paths are an exact-string contract: the ignore set stores them verbatim,
//! so two computations of the same location must agree byte for byte.

use crate::classify::KindFamily;
use crate::value::Key;

/// Whether a name can be written with dot syntax (`^[A-Za-z_][A-Za-z0-9_]*$`)
pub fn is_simple_key(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render one child access.
///
/// - sequence: `[3]`
/// - identity-keyed mapping: `.get('key')`
/// - name-keyed mapping: `.key`, or `['odd key']` when not a simple key
///
/// Leaf families have no children; they fall back to the name-keyed form.
pub fn fragment(family: KindFamily, key: &Key) -> String {
    match family {
        KindFamily::Sequence => format!("[{}]", key),
        KindFamily::IdentityMapping => format!(".get('{}')", key),
        _ => {
            let name = key.as_name();
            if is_simple_key(&name) {
                format!(".{}", name)
            } else {
                format!("['{}']", name)
            }
        }
    }
}

/// Full address of a child. An empty parent yields the bare key text.
pub fn full_path(parent: &str, family: KindFamily, key: &Key) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}{}", parent, fragment(family, key))
    }
}
