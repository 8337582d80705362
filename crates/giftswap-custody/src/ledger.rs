//! Custody ledger.
//!
//! Each participant's ledger is the ordered list of fingerprints of every
//! item received from them. It only grows; admin reset is the sole way to
//! shrink it. Duplicate fingerprints are legal (two copies of the same
//! catalog item) and are all retained in arrival order.

use giftswap_types::{ItemFingerprint, Participant};

/// Append `fingerprints` to the participant's ledger in order. Returns the
/// number appended.
pub fn append(
    participant: &mut Participant,
    fingerprints: impl IntoIterator<Item = ItemFingerprint>,
) -> usize {
    let before = participant.received_items.len();
    participant.received_items.extend(fingerprints);
    let added = participant.received_items.len() - before;
    tracing::debug!(
        participant = %participant.id,
        added,
        total = participant.received_items.len(),
        "Custody ledger appended"
    );
    added
}

/// Fingerprints still awaiting redistribution, in arrival order.
#[must_use]
pub fn pending(participant: &Participant) -> &[ItemFingerprint] {
    &participant.received_items
}

/// Aggregate ledger figures across participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerStats {
    /// Participants with at least one item in custody.
    pub holders: usize,
    /// Fingerprints across every ledger.
    pub items: usize,
}

#[must_use]
pub fn stats(participants: &[Participant]) -> LedgerStats {
    participants
        .iter()
        .map(pending)
        .filter(|items| !items.is_empty())
        .fold(LedgerStats::default(), |acc, items| LedgerStats {
            holders: acc.holders + 1,
            items: acc.items + items.len(),
        })
}
