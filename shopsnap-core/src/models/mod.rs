//! Domain models for Shopsnap.

mod product;
mod summary;

pub use product::{Product, ProductPage, Variant};
pub use summary::{
    DistributionField, FieldCount, PriceSummary, StockSummary, TagCount, field_distribution,
    price_summary, stock_summary, tag_summary,
};
