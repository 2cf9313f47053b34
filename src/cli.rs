//! CLI argument parsing for specgrade
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json, --db

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

pub use specgrade_core::format::OutputFormat;

/// Specgrade - grade OpenAPI contracts against a weighted ruleset
#[derive(Parser, Debug)]
#[command(name = "specgrade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing and stage progress
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to the run store database
    #[arg(long, global = true, env = "SPECGRADE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GradeArgs {
    /// Contract file to grade (YAML or JSON)
    pub path: Option<PathBuf>,

    /// Fetch the contract from a URL instead of a file
    #[arg(long, conflicts_with = "path")]
    pub url: Option<String>,

    /// Read the contract from stdin
    #[arg(long, conflicts_with_all = ["path", "url"])]
    pub inline: bool,

    /// Scoring template file (TOML)
    #[arg(long, short = 'T')]
    pub template: Option<PathBuf>,

    /// Business domain adjusting rule weights
    #[arg(long, short, default_value = "general")]
    pub domain: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print engine, ruleset, and template identity
    Version,

    /// List all scoring checkpoints
    Checkpoints,

    /// Grade a contract
    Grade(GradeArgs),

    /// Grade a contract and persist the run to the store
    Record(GradeArgs),

    /// Compare two contract versions
    Compare {
        /// Baseline contract file
        baseline: PathBuf,

        /// Candidate contract file
        candidate: PathBuf,

        /// Scoring template file (TOML)
        #[arg(long, short = 'T')]
        template: Option<PathBuf>,

        /// Business domain adjusting rule weights
        #[arg(long, short, default_value = "general")]
        domain: String,
    },

    /// Show stored run history for an API
    History {
        /// API identity (slug derived from the contract title)
        api_id: String,

        /// Maximum number of runs to retrieve
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Only runs graded at or after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<String>,
    },

    /// Explain a rule: requirement, rationale, and fix
    Explain {
        /// Rule id, e.g. PAG-OFFSET
        rule_id: String,
    },

    /// Suggest fixes for every finding in a contract
    Fixes(GradeArgs),
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).map_err(|e| e.to_string())
}
