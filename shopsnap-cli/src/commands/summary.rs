//! The summary command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use shopsnap_core::{
    DistributionField, field_distribution, price_summary, stock_summary, tag_summary,
};
use shopsnap_store::load_snapshot;

use crate::output::print_json;
use crate::{Cli, OutputFormat};

/// Arguments for the summary command.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Snapshot file to summarize.
    pub snapshot: PathBuf,

    /// How many top tags and vendors to show.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Runs the summary command.
pub async fn run(args: &SummaryArgs, cli: &Cli) -> Result<()> {
    let products = load_snapshot(&args.snapshot).await?;

    let tags = tag_summary(&products, args.top);
    let price = price_summary(&products);
    let stock = stock_summary(&products);
    let vendors = field_distribution(&products, DistributionField::Vendor, args.top);

    if cli.format == OutputFormat::Json {
        return print_json(
            &serde_json::json!({
                "products": products.len(),
                "tags": tags,
                "price": price,
                "stock": stock,
                "vendors": vendors,
            }),
            cli.pretty,
        );
    }

    println!("Products: {}", products.len());

    println!("\nTop tags:");
    if tags.is_empty() {
        println!("  (none)");
    }
    for entry in &tags {
        println!("  {:<24} {}", entry.tag, entry.count);
    }

    println!("\nPrices:");
    match price {
        Some(p) => {
            println!("  variants priced: {}", p.count);
            println!("  min: {:.2}  max: {:.2}", p.min, p.max);
            println!("  mean: {:.2}  median: {:.2}", p.mean, p.median);
        }
        None => println!("  (no parseable prices)"),
    }

    println!("\nStock:");
    println!("  available: {}", stock.available);
    println!("  unavailable: {}", stock.unavailable);

    println!("\nTop vendors:");
    if vendors.is_empty() {
        println!("  (none)");
    }
    for entry in &vendors {
        println!("  {:<24} {}", entry.value, entry.count);
    }

    Ok(())
}
