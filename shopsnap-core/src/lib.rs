// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shopsnap Core
//!
//! Core catalog models and summaries for Shopsnap.
//!
//! This crate provides the foundational types used across all other
//! Shopsnap crates, including:
//!
//! - Catalog models parsed from the storefront's paginated JSON endpoint
//! - Analytical summaries computed over a scraped catalog
//! - Error types
//!
//! ## Key Types
//!
//! ### Catalog Types
//! - [`Product`] - One catalog product, lossless against unknown fields
//! - [`Variant`] - One purchasable variant of a product
//! - [`ProductPage`] - One page of the paginated catalog endpoint
//!
//! ### Summary Types
//! - [`TagCount`] - Tag frequency entry, most common first
//! - [`PriceSummary`] - Variant price statistics
//! - [`StockSummary`] - Availability counts
//! - [`FieldCount`] - Vendor / product-type distribution entry

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Catalog types
    Product,
    ProductPage,
    Variant,
    // Summary types
    DistributionField,
    FieldCount,
    PriceSummary,
    StockSummary,
    TagCount,
    field_distribution,
    price_summary,
    stock_summary,
    tag_summary,
};
