//! Snapshot persistence.
//!
//! Snapshots are plain JSON arrays of products, written atomically
//! (temp file + rename) so a crashed run never leaves a torn file behind.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::debug;

use shopsnap_core::Product;

use crate::error::StoreError;

/// Returns the default snapshot directory.
///
/// - Linux: `~/.local/share/shopsnap`
/// - macOS: `~/Library/Application Support/shopsnap`
/// - fallback: `./data`
pub fn default_snapshot_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("shopsnap"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Saves the catalog under `dir` as `products_<YYYY-MM-DD>.json` (UTC date)
/// and returns the written path.
pub async fn save_snapshot(dir: &Path, products: &[Product]) -> Result<PathBuf, StoreError> {
    let filename = format!("products_{}.json", Utc::now().format("%Y-%m-%d"));
    let path = dir.join(filename);
    save_snapshot_to(&path, products).await?;
    Ok(path)
}

/// Saves the catalog to an explicit path, creating parent directories as
/// needed.
pub async fn save_snapshot_to(path: &Path, products: &[Product]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(products)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &json).await?;
    fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), count = products.len(), "Snapshot saved");
    Ok(())
}

/// Loads a previously saved snapshot.
pub async fn load_snapshot(path: &Path) -> Result<Vec<Product>, StoreError> {
    let content = fs::read_to_string(path).await?;
    let products = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "Snapshot loaded");
    Ok(products)
}

// ============================================================================
// Tests
// ============================================================================
