//! Snapshot store
//!
//! Inventory snapshots are saved and fetched by an opaque id. Real backends
//! live with the orchestration layer; this crate defines the seam and ships
//! an in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::inventory::Inventory;

/// Opaque snapshot identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnapshotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Storage for inventory snapshots
///
/// Implementations must round-trip the inventory shape faithfully.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetch a snapshot; `None` when the id is unknown
    async fn get(&self, id: &SnapshotId) -> Result<Option<Inventory>>;

    /// Store a snapshot and return its new id
    async fn save(&self, inventory: Inventory) -> Result<SnapshotId>;
}

/// Snapshot store held in process memory
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<SnapshotId, Inventory>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, id: &SnapshotId) -> Result<Option<Inventory>> {
        Ok(self.snapshots.read().await.get(id).cloned())
    }

    async fn save(&self, inventory: Inventory) -> Result<SnapshotId> {
        let id = SnapshotId::new();
        log::debug!(
            "Saving snapshot {} ({} objects) for org '{}'",
            id,
            inventory.objects.len(),
            inventory.metadata.org_id
        );
        self.snapshots.write().await.insert(id, inventory);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SchemaObject;

    fn make_inventory(org_id: &str) -> Inventory {
        let mut inventory = Inventory {
            objects: vec![SchemaObject {
                name: "Account".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        inventory.metadata.org_id = org_id.to_string();
        inventory
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let store = MemorySnapshotStore::new();
        let inventory = make_inventory("00DA");

        let id = store.save(inventory.clone()).await.unwrap();
        let loaded = store.get(&id).await.unwrap();

        assert_eq!(loaded, Some(inventory));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let store = MemorySnapshotStore::new();

        assert!(store.get(&SnapshotId::new()).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_saves_get_distinct_ids() {
        let store = MemorySnapshotStore::new();

        let first = store.save(make_inventory("00DA")).await.unwrap();
        let second = store.save(make_inventory("00DA")).await.unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_snapshot_id_parse() {
        let id = SnapshotId::new();

        assert_eq!(id.to_string().parse::<SnapshotId>().unwrap(), id);
        assert!("not-a-uuid".parse::<SnapshotId>().is_err());
    }
}
