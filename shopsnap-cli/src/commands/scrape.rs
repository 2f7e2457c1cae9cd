//! The scrape command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use shopsnap_fetch::{ProxyEndpoint, ScrapeSettings, Scraper, StorefrontProbe};
use shopsnap_store::{default_snapshot_dir, save_snapshot};

use crate::output::print_json;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the scrape command.
#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Store URL or bare store name.
    pub store: String,

    /// Proxy endpoint to relay through; repeatable.
    #[arg(long = "proxy", value_name = "URL")]
    pub proxies: Vec<String>,

    /// Always use the first proxy instead of rotating.
    #[arg(long)]
    pub no_rotate: bool,

    /// Records requested per page.
    #[arg(long, default_value_t = 250)]
    pub limit: u32,

    /// Hard ceiling on the number of pages fetched.
    #[arg(long, default_value_t = 200)]
    pub max_pages: u32,

    /// Attempts per page before giving up on it.
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Exponential backoff base in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub backoff: f64,

    /// Politeness delay between pages in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub delay: f64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Proxy blacklist cooldown in seconds.
    #[arg(long, default_value_t = 300)]
    pub proxy_cooldown: u64,

    /// Explicit outbound user-agent instead of the built-in pool.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Verify the storefront before scraping.
    #[arg(long)]
    pub verify: bool,

    /// Save a snapshot of the scraped catalog.
    #[arg(long)]
    pub save: bool,

    /// Snapshot directory (defaults to the platform data dir).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Runs the scrape command.
pub async fn run(args: &ScrapeArgs, cli: &Cli) -> Result<()> {
    anyhow::ensure!(
        args.backoff.is_finite() && args.backoff >= 0.0,
        "--backoff must be a non-negative number of seconds"
    );
    anyhow::ensure!(
        args.delay.is_finite() && args.delay >= 0.0,
        "--delay must be a non-negative number of seconds"
    );

    let mut settings = ScrapeSettings::new(&args.store)?
        .with_page_limit(args.limit)
        .with_max_pages(args.max_pages)
        .with_max_retries(args.max_retries)
        .with_backoff_factor(args.backoff)
        .with_page_delay(Duration::from_secs_f64(args.delay))
        .with_request_timeout(Duration::from_secs(args.timeout))
        .with_proxy_cooldown(Duration::from_secs(args.proxy_cooldown))
        .with_rotation(!args.no_rotate);
    if let Some(user_agent) = &args.user_agent {
        settings = settings.with_user_agent(user_agent);
    }

    if args.verify {
        let probe = StorefrontProbe::new(settings.request_timeout, &settings.user_agent)?;
        if !probe.verify(&settings.store_url).await {
            eprintln!(
                "{} does not look like a supported storefront",
                settings.store_url
            );
            std::process::exit(ExitCode::VerificationFailed as i32);
        }
    }

    let proxies: Vec<ProxyEndpoint> = args
        .proxies
        .iter()
        .map(|addr| ProxyEndpoint::new(addr.as_str()))
        .collect();
    let mut scraper = Scraper::new(settings, proxies)?;
    let products = scraper.fetch_all().await?;

    match cli.format {
        OutputFormat::Json => print_json(&products, cli.pretty)?,
        OutputFormat::Text => {
            if !cli.quiet {
                println!("Fetched {} products", products.len());
            }
        }
    }

    if args.save {
        let dir = args.data_dir.clone().unwrap_or_else(default_snapshot_dir);
        let path = save_snapshot(&dir, &products).await?;
        if !cli.quiet {
            println!("Snapshot saved: {}", path.display());
        }
    }

    Ok(())
}
