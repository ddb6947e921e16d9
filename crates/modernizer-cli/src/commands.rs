use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "modernizer")]
#[command(about = "Legacy engineering archive modernizer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a legacy archive: naming patterns, conflicts, orphans
    Analyze {
        /// Path to the archive directory to analyze
        path: PathBuf,
        /// Write the full JSON report to this file instead of a console summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Transform a legacy archive into the standardized project structure
    Transform {
        /// Path to the source archive directory
        source: PathBuf,
        /// Path to the target directory for the transformed archive
        target: PathBuf,
        /// TOML or JSON file with custom transformation rules
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Discover projects and print the plan without copying files
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt for a non-empty target directory
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Print the default transformation rules
    PrintRules,
}
