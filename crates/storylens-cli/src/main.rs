//! StoryLens CLI
//!
//! Command-line interface for inspecting and diffing story state documents

use clap::{Parser, Subcommand, ValueEnum};
use storylens_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "storylens")]
#[command(about = "StoryLens - Story state inspection and diffing", long_about = None)]
struct Cli {
    /// Diagnostic log output on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogMode::Quiet)]
    log: LogMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogMode {
    Quiet,
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two state documents
    Diff(commands::diff::DiffArgs),
    /// Print the snapshot tree of a state document
    Tree(commands::tree::TreeArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log {
        LogMode::Quiet => Profile::Test,
        LogMode::Text => Profile::Development,
        LogMode::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Tree(args) => commands::tree::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
