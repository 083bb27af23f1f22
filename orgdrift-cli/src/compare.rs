//! Snapshot comparison
//!
//! Fetches two stored inventories concurrently and diffs them. The diff
//! itself stays synchronous and pure.

use anyhow::{Context, Result};

use crate::diff::{DiffOptions, DiffResult, diff_with_options};
use crate::store::{SnapshotId, SnapshotStore};

/// Compare two stored snapshots
pub async fn compare_snapshots(
    store: &dyn SnapshotStore,
    source_id: &SnapshotId,
    target_id: &SnapshotId,
    options: &DiffOptions,
) -> Result<DiffResult> {
    // Fetch both snapshots in parallel
    let (source, target) = tokio::join!(store.get(source_id), store.get(target_id));

    let source = source
        .with_context(|| format!("Failed to load source snapshot {}", source_id))?
        .ok_or_else(|| anyhow::anyhow!("Source snapshot not found: {}", source_id))?;

    let target = target
        .with_context(|| format!("Failed to load target snapshot {}", target_id))?
        .ok_or_else(|| anyhow::anyhow!("Target snapshot not found: {}", target_id))?;

    let result = diff_with_options(&source, &target, options);
    result.log_summary();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::EntityKind;
    use crate::inventory::{Inventory, SchemaObject};
    use crate::store::MemorySnapshotStore;

    fn make_inventory(objects: &[&str]) -> Inventory {
        Inventory {
            objects: objects
                .iter()
                .map(|name| SchemaObject {
                    name: name.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_compare_stored_snapshots() {
        let store = MemorySnapshotStore::new();
        let before = store.save(make_inventory(&["Account"])).await.unwrap();
        let after = store.save(make_inventory(&["Account", "Invoice__c"])).await.unwrap();

        let result = compare_snapshots(&store, &before, &after, &DiffOptions::default())
            .await
            .unwrap();

        assert_eq!(
            result.category(EntityKind::Objects).unwrap().added,
            vec!["Invoice__c"]
        );
    }

    #[tokio::test]
    async fn test_compare_missing_snapshot() {
        let store = MemorySnapshotStore::new();
        let known = store.save(make_inventory(&["Account"])).await.unwrap();
        let missing = SnapshotId::new();

        let err = compare_snapshots(&store, &known, &missing, &DiffOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Target snapshot not found"));
    }
}
