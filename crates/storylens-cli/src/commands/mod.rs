//! Subcommands and the document loading they share

pub mod diff;
pub mod tree;

use clap::ValueEnum;
use std::path::Path;
use storylens_core::ignore::IgnoreSet;
use storylens_core::value::Value;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Read a JSON state document
pub fn load_state(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {}", path.display(), e))?;
    Ok(Value::from_json(&json)?)
}

/// Read a JSON array of ignored paths; no file means an empty set
pub fn load_ignore(path: Option<&Path>) -> Result<IgnoreSet, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(IgnoreSet::new());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&text)?)
}
