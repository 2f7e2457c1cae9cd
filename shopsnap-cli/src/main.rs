// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Shopsnap CLI - storefront catalog scraping from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Scrape a store and print a text summary
//! shopsnap scrape shop.example
//!
//! # Scrape through rotating proxies and save a snapshot
//! shopsnap scrape shop.example --proxy relay1:8080 --proxy relay2:8080 --save
//!
//! # Full catalog as JSON
//! shopsnap scrape shop.example --format json --pretty
//!
//! # Summarize a saved snapshot
//! shopsnap summary products_2026-08-06.json --top 5
//!
//! # Compare two snapshots
//! shopsnap diff products_2026-08-05.json products_2026-08-06.json
//!
//! # Check whether a site is a supported storefront
//! shopsnap check shop.example
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, diff, scrape, summary};

// ============================================================================
// CLI Definition
// ============================================================================

/// Shopsnap CLI - storefront catalog scraping.
#[derive(Parser)]
#[command(name = "shopsnap")]
#[command(about = "Storefront catalog scraper with snapshots and summaries")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a store's product catalog.
    #[command(visible_alias = "s")]
    Scrape(scrape::ScrapeArgs),

    /// Summarize a saved snapshot.
    Summary(summary::SummaryArgs),

    /// Compare two saved snapshots.
    Diff(diff::DiffArgs),

    /// Check whether a site is a supported storefront.
    Check(check::CheckArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Storefront verification failed.
    VerificationFailed = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("shopsnap=debug,info")
    } else {
        EnvFilter::new("shopsnap=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Scrape(args) => scrape::run(args, &cli).await,
        Commands::Summary(args) => summary::run(args, &cli).await,
        Commands::Diff(args) => diff::run(args, &cli).await,
        Commands::Check(args) => check::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
