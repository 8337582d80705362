//! Snapshot digest.
//!
//! A run resolves against exactly one snapshot. The digest commits to the
//! ordered asset list so a run's report can be tied to the view it used.

use giftswap_types::InventorySnapshot;
use sha2::{Digest, Sha256};

/// SHA-256 over the snapshot's assets in native order.
#[must_use]
pub fn compute_snapshot_digest(snapshot: &InventorySnapshot) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"giftswap:snapshot:v1:");
    hasher.update((snapshot.len() as u64).to_le_bytes());

    for asset in snapshot.assets() {
        for field in [
            asset.ephemeral_handle.0.as_str(),
            asset.class_identifier.as_str(),
            asset.instance_or_none(),
        ] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.update(asset.context_scope.app_id.to_le_bytes());
        hasher.update(asset.context_scope.context_id.to_le_bytes());
    }

    hasher.finalize().into()
}

/// Hex form of [`compute_snapshot_digest`], for logs and reports.
#[must_use]
pub fn snapshot_digest_hex(snapshot: &InventorySnapshot) -> String {
    hex::encode(compute_snapshot_digest(snapshot))
}
