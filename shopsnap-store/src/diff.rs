//! Snapshot comparison.
//!
//! Keys products by id and reports what changed between two snapshots.
//! Because products retain unknown fields, any difference the endpoint
//! reports shows up here, not just the modeled fields.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use shopsnap_core::Product;

use crate::error::StoreError;
use crate::snapshot::load_snapshot;

/// Differences between two catalog snapshots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotDiff {
    /// Titles of products present only in the newer snapshot.
    pub added: Vec<String>,
    /// Titles of products present only in the older snapshot.
    pub removed: Vec<String>,
    /// Titles of products present in both with different content.
    pub changed: Vec<String>,
}

impl SnapshotDiff {
    /// Returns true when the snapshots are identical.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Diffs two in-memory catalogs. Each list is sorted for deterministic
/// output.
pub fn diff_products(old: &[Product], new: &[Product]) -> SnapshotDiff {
    let old_by_id: HashMap<u64, &Product> = old.iter().map(|p| (p.id, p)).collect();
    let new_by_id: HashMap<u64, &Product> = new.iter().map(|p| (p.id, p)).collect();

    let mut diff = SnapshotDiff::default();
    for (id, product) in &new_by_id {
        match old_by_id.get(id) {
            None => diff.added.push(product.title.clone()),
            Some(previous) if *previous != *product => diff.changed.push(product.title.clone()),
            Some(_) => {}
        }
    }
    for (id, product) in &old_by_id {
        if !new_by_id.contains_key(id) {
            diff.removed.push(product.title.clone());
        }
    }

    diff.added.sort();
    diff.removed.sort();
    diff.changed.sort();
    diff
}

/// Loads and diffs two snapshot files.
pub async fn diff_snapshots(old_path: &Path, new_path: &Path) -> Result<SnapshotDiff, StoreError> {
    let old = load_snapshot(old_path).await?;
    let new = load_snapshot(new_path).await?;
    Ok(diff_products(&old, &new))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(json: &str) -> Vec<Product> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_added_removed_changed() {
        let old = catalog(
            r#"[
                {"id": 1, "title": "Mug", "vendor": "Acme"},
                {"id": 2, "title": "Shirt"}
            ]"#,
        );
        let new = catalog(
            r#"[
                {"id": 1, "title": "Mug", "vendor": "Apex"},
                {"id": 3, "title": "Hat"}
            ]"#,
        );

        let diff = diff_products(&old, &new);
        assert_eq!(diff.added, vec!["Hat"]);
        assert_eq!(diff.removed, vec!["Shirt"]);
        assert_eq!(diff.changed, vec!["Mug"]);
    }

    #[test]
    fn test_unmodeled_field_changes_are_detected() {
        let old = catalog(r#"[{"id": 1, "title": "Mug", "handle": "mug-a"}]"#);
        let new = catalog(r#"[{"id": 1, "title": "Mug", "handle": "mug-b"}]"#);

        let diff = diff_products(&old, &new);
        assert_eq!(diff.changed, vec!["Mug"]);
    }

    #[test]
    fn test_identical_snapshots_are_empty() {
        let old = catalog(r#"[{"id": 1, "title": "Mug"}]"#);
        let diff = diff_products(&old, &old);
        assert!(diff.is_empty());
    }

    #[tokio::test]
    async fn test_diff_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let old_path = dir.path().join("old.json");
        let new_path = dir.path().join("new.json");

        crate::snapshot::save_snapshot_to(&old_path, &catalog(r#"[{"id": 1, "title": "Mug"}]"#))
            .await
            .unwrap();
        crate::snapshot::save_snapshot_to(
            &new_path,
            &catalog(r#"[{"id": 1, "title": "Mug"}, {"id": 2, "title": "Hat"}]"#),
        )
        .await
        .unwrap();

        let diff = diff_snapshots(&old_path, &new_path).await.unwrap();
        assert_eq!(diff.added, vec!["Hat"]);
        assert!(diff.removed.is_empty());
        assert!(diff.changed.is_empty());
    }
}
