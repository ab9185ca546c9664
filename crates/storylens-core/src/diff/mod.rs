//! State diff engine.
//!
//! Compares two captures of the same state and produces an ordered list of
//! [`DiffRecord`]s.
//!
//! ## Entry points
//!
//! ```
//! use storylens_core::diff::{compare, compare_raw, render_human_summary, DEFAULT_MAX_DEPTH};
//! use storylens_core::ignore::IgnoreSet;
//! use storylens_core::snapshot::build;
//! use storylens_core::value::Value;
//!
//! let old = Value::object([("gold", Value::from(5))]);
//! let new = Value::object([("gold", Value::from(7))]);
//!
//! let ignore = IgnoreSet::new();
//! let records = compare(&build(&new, &ignore)?, &build(&old, &ignore)?)?;
//! assert_eq!(records[0].message, "value changed");
//!
//! let live = compare_raw(&new, &old, "", DEFAULT_MAX_DEPTH);
//! assert_eq!(live.len(), 1);
//!
//! let summary = render_human_summary(&records);
//! assert!(summary.contains("gold"));
//! # Ok::<(), storylens_core::errors::StoryLensError>(())
//! ```
//!
//! ## Guarantees
//!
//! - **Idempotence**: comparing two captures of unchanged data yields no
//!   records.
//! - **Type-change precedence**: a kind change is reported once and nothing
//!   below it is compared.
//! - **Multiset arrays**: array changes are reported as value counts gained
//!   or lost, plus a moved count when nothing was lost. Graphs that share no
//!   allocations (documents, clones) switch to a positional walk for arrays
//!   holding containers, see [`ElementMatching`].

pub mod engine;
pub mod human_summary;
pub mod model;
pub mod raw;

pub use engine::{compare, compare_with, ElementMatching};
pub use human_summary::{render_human_summary, render_value_preview};
pub use model::{ChangeKind, DiffRecord, DiffRecordView};
pub use raw::{compare_raw, compare_raw_ignoring, DEFAULT_MAX_DEPTH};
