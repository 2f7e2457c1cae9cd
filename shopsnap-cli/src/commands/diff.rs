//! The diff command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use shopsnap_store::diff_snapshots;

use crate::output::print_json;
use crate::{Cli, OutputFormat};

/// Arguments for the diff command.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// The older snapshot file.
    pub old: PathBuf,

    /// The newer snapshot file.
    pub new: PathBuf,
}

/// Runs the diff command.
pub async fn run(args: &DiffArgs, cli: &Cli) -> Result<()> {
    let diff = diff_snapshots(&args.old, &args.new).await?;

    if cli.format == OutputFormat::Json {
        return print_json(&diff, cli.pretty);
    }

    if diff.is_empty() {
        println!("No changes.");
        return Ok(());
    }

    for (label, marker, titles) in [
        ("Added", '+', &diff.added),
        ("Removed", '-', &diff.removed),
        ("Changed", '~', &diff.changed),
    ] {
        if titles.is_empty() {
            continue;
        }
        println!("{label} ({}):", titles.len());
        for title in titles {
            println!("  {marker} {title}");
        }
    }

    Ok(())
}
