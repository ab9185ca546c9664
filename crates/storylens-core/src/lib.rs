//! StoryLens Core - live state inspection for interactive-fiction engines
//!
//! This crate captures the variable store of a running story as snapshot
//! trees and reports what changed between captures, including:
//! - A value model for state graphs that may share or cycle
//! - Classification, key enumeration and exact path encoding
//! - Cycle-safe snapshotting with an ignore set
//! - Sharing-preserving deep clones
//! - Tree and live value comparison with multiset array semantics
//! - A polling tracker with adaptive delay
//!
//! Everything is single-threaded and synchronous; the live graph is read,
//! never mutated.

pub mod classify;
pub mod clone;
pub mod config;
pub mod diff;
pub mod errors;
pub mod ignore;
pub mod keys;
pub mod logging_facility;
pub mod path;
pub mod snapshot;
pub mod tracker;
pub mod value;

pub use storylens_core_types::schema;

// Re-export commonly used types
pub use classify::{classify, Kind, KindFamily};
pub use clone::{clone_value, clone_with, CloneMap};
pub use config::TrackerConfig;
pub use diff::{
    compare, compare_raw, compare_raw_ignoring, compare_with, ChangeKind, DiffRecord, ElementMatching,
};
pub use errors::{ExError, ExErrorKind, Result, StoryLensError};
pub use ignore::IgnoreSet;
pub use keys::keys;
pub use path::{fragment, full_path};
pub use snapshot::{build, build_at, NodeBody, TreeNode};
pub use tracker::{CheckOutcome, Tracker};
pub use value::{Key, Value};
