//! Change tracking across checks.
//!
//! A tracker owns the last capture of a state and compares each new capture
//! against it. Scheduling is left to the caller: [`Tracker::next_delay`]
//! says how long to wait, nothing here sleeps or spawns.
//!
//! Captures are snapshot trees. Deep clones and the live value comparator
//! stay available as library operations for callers that need them.

use crate::config::TrackerConfig;
use crate::diff::{compare, DiffRecord};
use crate::errors::{ExError, Result};
use crate::ignore::IgnoreSet;
use crate::snapshot::{build_at, TreeNode};
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::{Duration, Instant};

/// Result of one check
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    Unchanged,
    Changed(Vec<DiffRecord>),
    /// The check could not complete; the previous capture is kept
    Failed(ExError),
}

impl CheckOutcome {
    fn from_records(records: Vec<DiffRecord>) -> Self {
        if records.is_empty() {
            CheckOutcome::Unchanged
        } else {
            CheckOutcome::Changed(records)
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, CheckOutcome::Changed(_))
    }

    /// Records of a `Changed` outcome, empty otherwise
    pub fn records(&self) -> &[DiffRecord] {
        match self {
            CheckOutcome::Changed(records) => records,
            _ => &[],
        }
    }
}

/// Snapshot-tree based tracker
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    ignore: IgnoreSet,
    last: Option<TreeNode>,
    last_elapsed: Option<Duration>,
}

impl Tracker {
    /// # Errors
    ///
    /// - `InvalidConfig`: `config` fails validation
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let ignore = config.ignore_set();
        Ok(Self {
            config,
            ignore,
            last: None,
            last_elapsed: None,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Paths to leave out, applied from the next capture on
    pub fn ignore_mut(&mut self) -> &mut IgnoreSet {
        &mut self.ignore
    }

    /// Take the baseline capture.
    ///
    /// # Errors
    ///
    /// - `InvalidRoot`: `root` is not a container
    pub fn start(&mut self, root: &Value) -> Result<()> {
        let tree = build_at(root, &self.ignore, &self.config.root_path)?;
        self.last = Some(tree);
        Ok(())
    }

    /// Capture `root` and compare it with the previous capture.
    ///
    /// Without a baseline the capture becomes the baseline and the outcome is
    /// `Unchanged`. On success the new capture replaces the old one.
    pub fn check(&mut self, root: &Value) -> CheckOutcome {
        let start = Instant::now();
        log_op_start!("check", path = self.config.root_path.as_str());

        let outcome = match self.try_check(root) {
            Ok(records) => {
                let count = records.len();
                log_op_end!(
                    "check",
                    duration_ms = start.elapsed().as_millis() as u64,
                    record_count = count
                );
                CheckOutcome::from_records(records)
            }
            Err(err) => {
                log_op_error!(
                    "check",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                CheckOutcome::Failed(ExError::from(err).with_op("check"))
            }
        };
        self.last_elapsed = Some(start.elapsed());
        outcome
    }

    fn try_check(&mut self, root: &Value) -> Result<Vec<DiffRecord>> {
        let tree = build_at(root, &self.ignore, &self.config.root_path)?;
        let records = match &self.last {
            Some(previous) => compare(&tree, previous)?,
            None => Vec::new(),
        };
        self.last = Some(tree);
        Ok(records)
    }

    pub fn last_snapshot(&self) -> Option<&TreeNode> {
        self.last.as_ref()
    }

    /// How long to wait before the next check
    pub fn next_delay(&self) -> Duration {
        match self.last_elapsed {
            Some(elapsed) => self.config.next_delay(elapsed),
            None => self.config.initial_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_first_check_sets_baseline() {
        let state = Value::object([("gold", Value::from(5))]);
        let mut tracker = Tracker::new(TrackerConfig::default()).unwrap();
        assert!(matches!(tracker.check(&state), CheckOutcome::Unchanged));
        assert_eq!(tracker.last_snapshot().unwrap().path, "State");
    }

    #[test]
    fn test_failed_check_keeps_previous_capture() {
        let state = Value::object([("gold", Value::from(5))]);
        let mut tracker = Tracker::new(TrackerConfig::default()).unwrap();
        tracker.start(&state).unwrap();

        match tracker.check(&Value::from(1)) {
            CheckOutcome::Failed(err) => {
                assert_eq!(err.kind(), ExErrorKind::InvalidRoot);
                assert_eq!(err.op(), Some("check"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(tracker.last_snapshot().is_some());
    }

    #[test]
    fn test_next_delay_before_any_check() {
        let tracker = Tracker::new(TrackerConfig::default()).unwrap();
        assert_eq!(tracker.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig {
            delay_factor: 0,
            ..TrackerConfig::default()
        };
        assert!(Tracker::new(config).is_err());
    }
}
