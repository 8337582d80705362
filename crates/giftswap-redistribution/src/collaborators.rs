//! Seams to the outside world.
//!
//! The exchange never performs I/O itself; it awaits these collaborators.
//! Participant persistence is a key-value store keyed by participant id;
//! the inventory provider is an idempotent snapshot fetch.

use async_trait::async_trait;
use giftswap_types::{ContextScope, InventorySnapshot, Participant, ParticipantId, Result};
use tokio::sync::RwLock;

/// Participant persistence.
///
/// Implementations must round-trip fingerprint attribute presence exactly:
/// an absent attribute is never reloaded as a null or zero value.
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// Every registered participant, in the store's stable order.
    async fn list_participants(&self) -> Result<Vec<Participant>>;

    /// Look up one participant.
    async fn get_participant(&self, id: &ParticipantId) -> Result<Option<Participant>>;

    /// Insert or replace one participant.
    async fn save(&self, participant: &Participant) -> Result<()>;

    /// Insert or replace several participants as one write.
    async fn save_all(&self, participants: &[Participant]) -> Result<()>;
}

/// Custody inventory provider.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch a fresh snapshot. Idempotent; failures are transient.
    async fn fetch_snapshot(&self, scope: ContextScope) -> Result<InventorySnapshot>;
}

/// Inventory source serving a fixed snapshot, replaceable at runtime.
#[derive(Debug, Default)]
pub struct StaticInventory {
    snapshot: RwLock<InventorySnapshot>,
}

impl StaticInventory {
    #[must_use]
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Replace the served snapshot, e.g. after a transfer reissued handles.
    pub async fn replace(&self, snapshot: InventorySnapshot) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl InventorySource for StaticInventory {
    async fn fetch_snapshot(&self, _scope: ContextScope) -> Result<InventorySnapshot> {
        Ok(self.snapshot.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use giftswap_types::AssetRecord;

    use super::*;

    #[tokio::test]
    async fn static_inventory_serves_latest_snapshot() {
        let inv = StaticInventory::default();
        assert!(inv.fetch_snapshot(ContextScope::default()).await.unwrap().is_empty());

        inv.replace(InventorySnapshot::new(
            vec![AssetRecord::new("1", "X", ContextScope::default())],
            vec![],
        ))
        .await;
        let snap = inv.fetch_snapshot(ContextScope::default()).await.unwrap();
        assert_eq!(snap.len(), 1);
    }
}
