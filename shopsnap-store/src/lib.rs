// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shopsnap Store
//!
//! Catalog snapshot persistence for Shopsnap.
//!
//! This crate provides:
//!
//! - **Snapshots**: saving a scraped catalog to a timestamped JSON file and
//!   loading it back
//! - **Diffing**: comparing two snapshots into added/removed/changed
//!   product lists
//!
//! ## Usage
//!
//! ```ignore
//! use shopsnap_store::{default_snapshot_dir, diff_snapshots, save_snapshot};
//!
//! let path = save_snapshot(&default_snapshot_dir(), &products).await?;
//! let diff = diff_snapshots(&yesterday, &path).await?;
//! println!("{} added, {} removed", diff.added.len(), diff.removed.len());
//! ```

pub mod diff;
pub mod error;
pub mod snapshot;

pub use diff::{SnapshotDiff, diff_products, diff_snapshots};
pub use error::StoreError;
pub use snapshot::{default_snapshot_dir, load_snapshot, save_snapshot, save_snapshot_to};
