//! Catalog summaries.
//!
//! Pure aggregation over a scraped catalog. Each function takes the flat
//! product slice produced by the fetch layer and returns plain data; the
//! CLI decides how to render it.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::product::Product;

// ============================================================================
// Tag Summary
// ============================================================================

/// One entry of the tag frequency summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    /// The normalized tag.
    pub tag: String,
    /// How many products carry it.
    pub count: usize,
}

/// Returns the most common tags across all products, most frequent first.
///
/// Ties are broken alphabetically so the output is deterministic.
pub fn tag_summary(products: &[Product], top_n: usize) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for product in products {
        for tag in &product.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_owned(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(top_n);
    ranked
}

// ============================================================================
// Price Summary
// ============================================================================

/// Basic statistics over variant prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSummary {
    /// Number of variants with a parseable price.
    pub count: usize,
    /// Lowest price seen.
    pub min: f64,
    /// Highest price seen.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (midpoint average for an even count).
    pub median: f64,
}

/// Summarizes variant prices across the catalog.
///
/// Returns `None` when no variant carries a parseable, finite price.
pub fn price_summary(products: &[Product]) -> Option<PriceSummary> {
    let mut prices: Vec<f64> = products
        .iter()
        .flat_map(|p| &p.variants)
        .filter_map(|v| v.price)
        .filter(|price| price.is_finite())
        .collect();

    if prices.is_empty() {
        return None;
    }

    prices.sort_by(f64::total_cmp);
    let count = prices.len();
    let mean = prices.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 1 {
        prices[count / 2]
    } else {
        (prices[count / 2 - 1] + prices[count / 2]) / 2.0
    };

    Some(PriceSummary {
        count,
        min: prices[0],
        max: prices[count - 1],
        mean,
        median,
    })
}

// ============================================================================
// Stock Summary
// ============================================================================

/// Availability counts across all variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    /// Variants flagged as available.
    pub available: usize,
    /// Variants not flagged as available.
    pub unavailable: usize,
}

/// Counts available vs. unavailable variants.
pub fn stock_summary(products: &[Product]) -> StockSummary {
    let mut summary = StockSummary::default();
    for variant in products.iter().flat_map(|p| &p.variants) {
        if variant.available {
            summary.available += 1;
        } else {
            summary.unavailable += 1;
        }
    }
    summary
}

// ============================================================================
// Field Distribution
// ============================================================================

/// Which product field to bucket by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionField {
    /// Bucket by vendor name.
    Vendor,
    /// Bucket by product type.
    ProductType,
}

/// One entry of a field distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCount {
    /// The field value; missing or empty values are bucketed as "Unknown".
    pub value: String,
    /// How many products carry it.
    pub count: usize,
}

/// Returns the top values of `field` across the catalog, most common first.
///
/// Ties are broken alphabetically so the output is deterministic.
pub fn field_distribution(
    products: &[Product],
    field: DistributionField,
    top_n: usize,
) -> Vec<FieldCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for product in products {
        let raw = match field {
            DistributionField::Vendor => product.vendor.as_deref(),
            DistributionField::ProductType => product.product_type.as_deref(),
        };
        let value = match raw {
            Some(v) if !v.trim().is_empty() => v,
            _ => "Unknown",
        };
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<FieldCount> = counts
        .into_iter()
        .map(|(value, count)| FieldCount {
            value: value.to_owned(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    ranked.truncate(top_n);
    ranked
}

// ============================================================================
// Tests
// ============================================================================
