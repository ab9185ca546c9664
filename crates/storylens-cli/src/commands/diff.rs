//! State diff command

use super::{load_ignore, load_state, CommandResult, OutputFormat};
use clap::Args;
use std::path::PathBuf;
use storylens_core::config::TrackerConfig;
use storylens_core::diff::{
    compare_raw_ignoring, compare_with, render_human_summary, DiffRecordView, ElementMatching,
};
use storylens_core::snapshot::build_at;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Earlier state document (JSON)
    #[arg(long)]
    pub old: PathBuf,

    /// Later state document (JSON)
    #[arg(long)]
    pub new: PathBuf,

    /// JSON array of paths to leave out
    #[arg(long)]
    pub ignore: Option<PathBuf>,

    /// Tracker configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Compare the documents directly instead of through snapshot trees
    #[arg(long)]
    pub raw: bool,
}

pub fn execute(args: DiffArgs) -> CommandResult {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            TrackerConfig::from_toml_str(&text)?
        }
        None => TrackerConfig::default(),
    };
    let mut ignore = config.ignore_set();
    ignore.extend(load_ignore(args.ignore.as_deref())?.iter().map(str::to_string));

    let old = load_state(&args.old)?;
    let new = load_state(&args.new)?;

    let records = if args.raw {
        compare_raw_ignoring(&new, &old, &config.root_path, config.max_depth, &ignore)
    } else {
        let old_tree = build_at(&old, &ignore, &config.root_path)?;
        let new_tree = build_at(&new, &ignore, &config.root_path)?;
        // Two loaded documents share no allocations
        compare_with(&new_tree, &old_tree, ElementMatching::Structural)?
    };

    match args.format {
        OutputFormat::Text => print!("{}", render_human_summary(&records)),
        OutputFormat::Json => {
            let views: Vec<DiffRecordView> = records.iter().map(DiffRecordView::from).collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(())
}
