//! # RpmDocs Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `rpmdocs` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration and applying command-line overrides
//! - Running the extraction pipeline and reporting its outcome
//!
//! Run without arguments, it reads every archive in `rpms/`, unpacks each into
//! `extracted/rpms/<name>` and moves its documentation and manual pages into
//! `extracted/manpages/<name>`.
//!
//! ```bash
//! rpmdocs
//! rpmdocs -v --workers 8 --keep-scratch
//! rpmdocs --config mirror.toml
//! ```
//!
//! Exit status is 0 when every archive succeeded and 1 otherwise.
//!
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

mod common; // Filesystem and process helpers
mod core; // Configuration and error types
mod pipeline; // Unpack, collect, relocate, dispatch

use crate::core::config;
use crate::core::error::Result;
use crate::pipeline::dispatch::{self, RunReport};
use crate::pipeline::unpack::RpmCpioUnpacker;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "rpmdocs",
    about = "Extract documentation and manual pages from a directory of RPM archives",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read configuration from this file instead of .rpmdocs.toml / user config.
    #[arg(long, env = "RPMDOCS_CONFIG")]
    config: Option<PathBuf>,

    /// Leave extraction trees in the scratch root after relocation.
    #[arg(long)]
    keep_scratch: bool,

    /// Number of partitions to fan out over (default: number of CPUs).
    #[arg(long)]
    workers: Option<usize>,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn print_report(report: &RunReport) {
    let failed: Vec<_> = report.failures().collect();
    tracing::info!(
        "Processed {} archives in {} partitions over {} units",
        report.archives,
        report.partitions,
        report.units
    );
    println!(
        "Relocated {} documents from {} archives ({} failed).",
        report.documents_relocated(),
        report.succeeded(),
        failed.len()
    );
    if !failed.is_empty() {
        eprintln!("Failed archives:");
        for (name, e) in failed {
            eprintln!("  {}: {:#}", name, e);
        }
    }
}

async fn run(cli: Cli) -> Result<RunReport> {
    let mut cfg = config::load_config(cli.config.as_deref())?;
    if cli.keep_scratch {
        cfg.paths.keep_scratch = true;
    }
    if cli.workers.is_some() {
        cfg.dispatch.workers = cli.workers;
    }
    let unpacker = Arc::new(RpmCpioUnpacker::new(&cfg.decode));
    dispatch::run(&cfg, unpacker).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    match run(cli).await {
        Ok(report) => {
            print_report(&report);
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Run failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
