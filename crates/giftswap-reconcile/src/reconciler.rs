//! Inventory reconciliation engine.
//!
//! ```text
//! Reconciler::resolve(pending fingerprints) -> [(fingerprint, asset | unmatched)]
//! ```
//!
//! A [`Reconciler`] borrows one snapshot and owns the consumed-handle set
//! for its lifetime. Resolving several ledgers through the same reconciler
//! guarantees no asset is claimed twice across all of them.
//!
//! ## Algorithm
//!
//! For each pending fingerprint, in order:
//! 1. Candidates: same class, same scope, handle not consumed
//! 2. Instance must equal the fingerprint's, if it names one
//! 3. Resolve the candidate's description (exact, class/none, any of class)
//! 4. Every specified description attribute must match
//! 5. First candidate in snapshot order wins; its handle is consumed
//! 6. No candidate: the fingerprint is reported unmatched, the batch goes on

use std::collections::{HashMap, HashSet};

use giftswap_types::{AssetHandle, AssetRecord, ContextScope, InventorySnapshot, ItemFingerprint};

use crate::predicate::{
    attributes_match, class_and_scope_match, instance_match, resolve_description,
};

/// Outcome for one pending fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub fingerprint: ItemFingerprint,
    /// The asset selected for this fingerprint, or `None` if unmatched.
    pub asset: Option<AssetRecord>,
}

impl Resolution {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.asset.is_some()
    }
}

/// Stateful resolver over one snapshot.
pub struct Reconciler<'s> {
    snapshot: &'s InventorySnapshot,
    scope: ContextScope,
    /// Asset indices per class, in snapshot order.
    by_class: HashMap<&'s str, Vec<usize>>,
    consumed: HashSet<AssetHandle>,
}

impl<'s> Reconciler<'s> {
    #[must_use]
    pub fn new(snapshot: &'s InventorySnapshot, scope: ContextScope) -> Self {
        let mut by_class: HashMap<&'s str, Vec<usize>> = HashMap::new();
        for (idx, asset) in snapshot.assets().iter().enumerate() {
            by_class
                .entry(asset.class_identifier.as_str())
                .or_default()
                .push(idx);
        }
        Self {
            snapshot,
            scope,
            by_class,
            consumed: HashSet::new(),
        }
    }

    /// Resolve `pending` in order, consuming the selected handles.
    pub fn resolve(&mut self, pending: &[ItemFingerprint]) -> Vec<Resolution> {
        pending
            .iter()
            .map(|fingerprint| Resolution {
                fingerprint: fingerprint.clone(),
                asset: self.resolve_one(fingerprint),
            })
            .collect()
    }

    /// Resolve a single fingerprint, consuming the selected handle.
    pub fn resolve_one(&mut self, fingerprint: &ItemFingerprint) -> Option<AssetRecord> {
        let snapshot = self.snapshot;
        let candidates = self.by_class.get(fingerprint.class_identifier.as_str())?;

        let selected = candidates
            .iter()
            .map(|&idx| &snapshot.assets()[idx])
            .find(|asset| {
                class_and_scope_match(fingerprint, asset, self.scope)
                    && !self.consumed.contains(&asset.ephemeral_handle)
                    && instance_match(fingerprint, asset)
                    && attributes_match(fingerprint, resolve_description(snapshot, asset))
            })?
            .clone();

        self.consumed.insert(selected.ephemeral_handle.clone());
        tracing::debug!(
            fingerprint = %fingerprint,
            handle = %selected.ephemeral_handle,
            "Fingerprint resolved"
        );
        Some(selected)
    }

    /// Whether `handle` has already been claimed.
    #[must_use]
    pub fn is_consumed(&self, handle: &AssetHandle) -> bool {
        self.consumed.contains(handle)
    }

    /// Number of handles claimed so far.
    #[must_use]
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}

/// One-shot resolution with a fresh consumed set.
#[must_use]
pub fn resolve(
    pending: &[ItemFingerprint],
    snapshot: &InventorySnapshot,
    scope: ContextScope,
) -> Vec<Resolution> {
    Reconciler::new(snapshot, scope).resolve(pending)
}
