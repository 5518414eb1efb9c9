//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "urls.yaml";

#[derive(Parser, Clone, Debug)]
#[command(name = "url-corpus")]
#[command(about = "Generate a file of synthetic URLs from weighted data sources")]
#[command(long_about = None)]
pub struct Cli {
    /// Profile to generate (falls back to defaults.profile)
    pub profile: Option<String>,

    /// Total number of URLs to generate (falls back to defaults.count)
    pub count: Option<u64>,

    /// Path to the YAML configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH, env = "URL_CORPUS_CONFIG")]
    pub config: PathBuf,

    /// Output file (overrides the configured output path)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Random seed for reproducible output (overrides the configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generate and print URLs without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Do not echo each URL, print only the summary line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}
