//! Tracker configuration.
//!
//! Loaded from TOML; every field has a default, so an empty document is a
//! valid configuration.

use crate::diff::DEFAULT_MAX_DEPTH;
use crate::errors::{Result, StoryLensError};
use crate::ignore::IgnoreSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Address given to the tracked root; child paths are prefixed with it
    pub root_path: String,
    /// Depth limit for live value comparison
    pub max_depth: usize,
    /// Delay before the first check
    pub initial_delay_ms: u64,
    /// Next delay is the previous check's duration times this factor
    pub delay_factor: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Paths excluded from snapshots and comparisons
    pub ignore_paths: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            root_path: "State".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            initial_delay_ms: 500,
            delay_factor: 5,
            min_delay_ms: 50,
            max_delay_ms: 10_000,
            ignore_paths: Vec::new(),
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: the document does not parse, or fails [`validate`](Self::validate)
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: TrackerConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// - `InvalidConfig`: `delay_factor` is zero or `min_delay_ms > max_delay_ms`
    pub fn validate(&self) -> Result<()> {
        if self.delay_factor == 0 {
            return Err(StoryLensError::InvalidConfig {
                reason: "delay_factor must be at least 1".to_string(),
            });
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(StoryLensError::InvalidConfig {
                reason: format!(
                    "min_delay_ms ({}) exceeds max_delay_ms ({})",
                    self.min_delay_ms, self.max_delay_ms
                ),
            });
        }
        Ok(())
    }

    pub fn ignore_set(&self) -> IgnoreSet {
        self.ignore_paths.iter().cloned().collect()
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Delay before the next check, given how long the last one took.
    ///
    /// Scales with check cost so large states are polled less often.
    pub fn next_delay(&self, elapsed: Duration) -> Duration {
        let scaled = elapsed.saturating_mul(self.delay_factor);
        scaled
            .max(Duration::from_millis(self.min_delay_ms))
            .min(Duration::from_millis(self.max_delay_ms))
    }
}
