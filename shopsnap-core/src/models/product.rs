//! Catalog product models.
//!
//! These types mirror the storefront's paginated `products.json` payload.
//! Typed fields cover what the summaries and the pagination logic need;
//! everything else is retained in a flattened map so snapshots and diffs
//! are lossless against fields this crate does not model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// ============================================================================
// Product Page
// ============================================================================

/// One page of the paginated catalog endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    /// The records on this page. `None` when the field is absent entirely,
    /// which callers treat differently from an empty array.
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

impl ProductPage {
    /// Parses a raw response body into a catalog page.
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(body)?)
    }
}

// ============================================================================
// Product
// ============================================================================

/// A single catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Numeric product id, unique within one store.
    pub id: u64,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Vendor name, when reported.
    #[serde(default)]
    pub vendor: Option<String>,

    /// Product type, when reported.
    #[serde(default)]
    pub product_type: Option<String>,

    /// Normalized tag list. The endpoint reports tags either as an array of
    /// strings or as one comma-separated string; both forms are accepted.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    /// Purchasable variants.
    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Every field not modeled above, retained verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Variant
// ============================================================================

/// One purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Numeric variant id, when reported.
    #[serde(default)]
    pub id: Option<u64>,

    /// Variant title, when reported.
    #[serde(default)]
    pub title: Option<String>,

    /// Price as reported. The endpoint sends strings like `"29.99"`, but
    /// bare numbers are accepted too; anything unparseable becomes `None`.
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,

    /// Availability flag; absent means unavailable.
    #[serde(default)]
    pub available: bool,

    /// Every field not modeled above, retained verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Field Deserializers
// ============================================================================

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let price = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    Ok(price)
}

// ============================================================================
// Tests
// ============================================================================
