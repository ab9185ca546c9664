//! Snapshot tree command

use super::{load_ignore, load_state, CommandResult, OutputFormat};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use storylens_core::diff::render_value_preview;
use storylens_core::snapshot::{build_at, NodeBody, TreeNode};

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// State document (JSON)
    #[arg(long)]
    pub input: PathBuf,

    /// JSON array of paths to leave out
    #[arg(long)]
    pub ignore: Option<PathBuf>,

    /// Address given to the document root
    #[arg(long, default_value = "State")]
    pub root_path: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn execute(args: TreeArgs) -> CommandResult {
    let ignore = load_ignore(args.ignore.as_deref())?;
    let state = load_state(&args.input)?;
    let tree = build_at(&state, &ignore, &args.root_path)?;

    match args.format {
        OutputFormat::Text => {
            let mut out = String::new();
            write_text(&tree, 0, &mut out);
            print!("{}", out);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&tree))?),
    }
    Ok(())
}

fn write_text(node: &TreeNode, depth: usize, out: &mut String) {
    let label = if node.is_back_reference() {
        "(circular)".to_string()
    } else {
        render_value_preview(&node.value)
    };
    out.push_str(&format!("{}{}: {}\n", "  ".repeat(depth), node.path, label));
    for item in node.items() {
        write_text(item, depth + 1, out);
    }
}

fn to_json(node: &TreeNode) -> serde_json::Value {
    match &node.body {
        NodeBody::Leaf => json!({
            "path": node.path,
            "kind": node.kind,
            "value": node.value.to_json_preview(),
        }),
        NodeBody::BackReference => json!({
            "path": node.path,
            "kind": node.kind,
            "circular": true,
        }),
        NodeBody::Container { keys, items } => json!({
            "path": node.path,
            "kind": node.kind,
            "size": keys.len(),
            "keys": keys.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            "items": items.iter().map(to_json).collect::<Vec<_>>(),
        }),
    }
}
