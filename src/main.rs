//! Command-line interface for url-corpus
//!
//! ```bash
//! url-corpus [PROFILE] [COUNT] [--config urls.yaml] [--output PATH] [--seed N]
//! ```
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`; stdout carries
//! only the generated URLs and the summary line.

use clap::Parser;
use url_corpus::{run_cli, Cli};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    run_cli(&cli, &mut stdout)?;
    Ok(())
}
