//! The check command.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use shopsnap_fetch::{ScrapeSettings, StorefrontProbe};

use crate::output::print_json;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Store URL or bare store name.
    pub store: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 8)]
    pub timeout: u64,
}

/// Runs the check command.
pub async fn run(args: &CheckArgs, cli: &Cli) -> Result<()> {
    let settings = ScrapeSettings::new(&args.store)?
        .with_request_timeout(Duration::from_secs(args.timeout));
    let probe = StorefrontProbe::new(settings.request_timeout, &settings.user_agent)?;

    let supported = probe.verify(&settings.store_url).await;

    if cli.format == OutputFormat::Json {
        print_json(
            &serde_json::json!({
                "store": settings.store_url.as_str(),
                "supported": supported,
            }),
            cli.pretty,
        )?;
    } else if supported {
        println!("✓ {} looks like a supported storefront", settings.store_url);
    } else {
        println!(
            "✗ {} does not look like a supported storefront",
            settings.store_url
        );
    }

    if !supported {
        std::process::exit(ExitCode::VerificationFailed as i32);
    }
    Ok(())
}
