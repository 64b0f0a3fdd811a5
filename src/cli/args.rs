//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Pulse - per-file defect risk scoring for TypeScript, JavaScript and Python
#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score every source file in a project by defect risk")]
#[command(long_about = "Pulse estimates a risk score between 0 and 100 for every source file in a project tree. \
The score combines cyclomatic complexity, function size, nesting depth and parameter counts with recent \
change frequency from version history. In watch mode the tree is re-scanned after each burst of changes.")]
#[command(after_help = "EXAMPLES:

    # Scan the current project (needs project_root in pulse.toml, or a path)
    pulse .

    # Scan another directory and write a JSON report
    pulse --path ./my-project --format json --output-file risk.json

    # Re-scan whenever files change, waiting 500ms after the last change
    pulse ./my-project --watch --debounce-ms 500

    # Skip extra directories (exact names or glob patterns)
    pulse . --ignore coverage --ignore 'generated-*'

    # Create a default pulse.toml in the current directory
    pulse --init

While watching, type `p` to pause, `r` to resume and `q` to quit.
")]
pub struct Args {
    /// Project directory (same as --path)
    #[arg(value_name = "DIR", conflicts_with = "path")]
    pub target: Option<PathBuf>,

    #[arg(short, long, value_name = "DIR", help = "Project directory to analyse (overrides project_root from configuration)")]
    pub path: Option<PathBuf>,

    #[arg(short, long, value_name = "PATTERN", help = "Directory or file basenames to skip; replaces the configured list (repeatable)")]
    pub ignore: Vec<String>,

    #[arg(short, long, value_enum, help = "Report format: 'text' for humans, 'json' for tools, 'csv' for spreadsheets")]
    pub format: Option<OutputFormat>,

    #[arg(short, long = "output-file", value_name = "FILE", help = "Write the report to a file instead of stdout")]
    pub output_file: Option<PathBuf>,

    #[arg(short, long, help = "Keep watching the project and re-scan after changes")]
    pub watch: bool,

    #[arg(long, value_name = "MS", help = "Quiet period after the last change before a re-scan in watch mode")]
    pub debounce_ms: Option<u64>,

    #[arg(long = "churn-days", value_name = "DAYS", help = "Days of version history counted for churn")]
    pub churn_days: Option<u32>,

    #[arg(short, long, value_name = "FILE", help = "Configuration file (defaults to ./pulse.toml, ./.pulse.toml, ~/.pulse.toml, then the user config directory)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Analyse files one at a time instead of on a worker pool")]
    pub sequential: bool,

    #[arg(short, long, conflicts_with = "verbose", help = "Only print the summary line and errors")]
    pub quiet: bool,

    #[arg(short, long, help = "Show per-component scores, skipped files and info logs")]
    pub verbose: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    #[arg(long, help = "Disable the progress bar")]
    pub no_progress: bool,

    #[arg(long, help = "Create a default configuration file (pulse.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Project directory given on the command line, flag or positional
    pub fn project_root(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| self.target.clone())
    }
}
