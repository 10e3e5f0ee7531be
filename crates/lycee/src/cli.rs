//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lycee-insight operator CLI
///
/// Browse the institution fixtures, preview attractiveness scenarios and
/// run narrative analyses without the HTTP server.
#[derive(Parser, Debug)]
#[command(name = "lycee")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding markers.json and records.json
    #[arg(long, global = true, env = "LYCEE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List institutions (map markers)
    List {
        /// Only institutions of this division code
        #[arg(short, long)]
        division: Option<String>,
    },

    /// Show metrics and enrollment series of an institution
    Show {
        /// Institution ID
        id: String,
    },

    /// Preview the projection under an attractiveness delta
    Simulate {
        /// Institution ID
        id: String,

        /// Attractiveness delta, clamped to [-0.2, 0.4]
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        delta: f64,
    },

    /// Run the narrative analysis once and print both sections
    Analyze(AnalyzeArgs),

    /// Show version
    Version,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Institution ID
    pub id: String,

    /// Attractiveness delta, clamped to [-0.2, 0.4]
    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub delta: f64,

    /// Completion service base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long, env = "LYCEE_MODEL")]
    pub model: Option<String>,

    /// Bearer token for the completion service
    #[arg(long, env = "LYCEE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Completion request timeout in seconds
    #[arg(long, env = "LYCEE_COMPLETION_TIMEOUT_SECS")]
    pub timeout: Option<u64>,
}
