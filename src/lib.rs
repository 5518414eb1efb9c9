//! url-corpus
//!
//! Generates a file of synthetic URLs for load-testing a web property. URLs
//! are sampled from flat-text data sources according to the percentage
//! weights of a named profile and written one per line.
//!
//! # Crates
//!
//! - `corpus_config` - YAML configuration, profiles, run resolution
//! - `corpus_generator` - source loading, weighted sampling, URL assembly
//!
//! # CLI Usage
//!
//! ```bash
//! # Use defaults.profile and defaults.count from urls.yaml
//! url-corpus
//!
//! # 500 URLs from the "listings" profile, reproducibly
//! url-corpus listings 500 --config corpus.yaml --seed 42
//!
//! # Preview without touching the output file
//! url-corpus directory 50 --dry-run
//! ```

pub mod cli;
pub mod output;

use anyhow::Context;
use corpus_config::Config;
use corpus_generator::{SourceSet, UrlGenerator};
use std::io::Write;
use std::path::PathBuf;

pub use cli::Cli;
pub use corpus_config as config;
pub use corpus_generator as generator;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub urls_generated: usize,
    /// False for dry runs
    pub written: bool,
    /// Size of the output file; `None` for dry runs
    pub file_size_bytes: Option<u64>,
}

/// Run one generation: resolve, load, generate, then write and echo.
///
/// Nothing is written until the whole URL list has been built, and nothing
/// at all when configuration resolution fails. URLs and the summary line go
/// to `stdout`.
pub fn run_cli<W: Write>(cli: &Cli, stdout: &mut W) -> anyhow::Result<RunSummary> {
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    let run = config.resolve(cli.profile.as_deref(), cli.count)?;

    let sources = SourceSet::load(&config).context("Failed to load data sources")?;
    tracing::info!("Loaded {} data sources", sources.len());

    let seed = cli.seed.or(config.seed);
    let result = UrlGenerator::new(&run, &sources, seed).generate();

    let output_path = cli.output.clone().unwrap_or_else(|| config.output.clone());
    let file_size_bytes = if cli.dry_run {
        None
    } else {
        let metrics = output::write_urls(&output_path, &result.urls)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Some(metrics.file_size_bytes)
    };

    if !cli.quiet {
        output::echo_urls(stdout, &result.urls)?;
    }
    if cli.dry_run {
        writeln!(
            stdout,
            "Generated {} URLs (dry run, {} not written)",
            result.len(),
            output_path.display()
        )?;
    } else {
        writeln!(
            stdout,
            "Wrote {} URLs to {}",
            result.len(),
            output_path.display()
        )?;
    }

    Ok(RunSummary {
        output: output_path,
        urls_generated: result.len(),
        written: !cli.dry_run,
        file_size_bytes,
    })
}
