//! Round-scoped giver → recipient mapping and its integrity check.

use std::collections::{BTreeMap, BTreeSet};

use giftswap_types::{GiftswapError, ParticipantId, Result};
use serde::{Deserialize, Serialize};

/// Mapping from each giver to their recipient for one round.
///
/// Fully replaced on every re-roll.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    pairs: BTreeMap<ParticipantId, ParticipantId>,
}

impl Assignment {
    #[must_use]
    pub fn from_pairs(pairs: BTreeMap<ParticipantId, ParticipantId>) -> Self {
        Self { pairs }
    }

    /// Recipient assigned to `giver`.
    #[must_use]
    pub fn recipient_of(&self, giver: &ParticipantId) -> Option<&ParticipantId> {
        self.pairs.get(giver)
    }

    /// Pairs in giver-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantId)> {
        self.pairs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Lengths of the permutation's cycles, longest first.
    #[must_use]
    pub fn cycle_lengths(&self) -> Vec<usize> {
        let mut seen: BTreeSet<&ParticipantId> = BTreeSet::new();
        let mut lengths = Vec::new();
        for start in self.pairs.keys() {
            if seen.contains(start) {
                continue;
            }
            let mut len = 0;
            let mut cur = start;
            while seen.insert(cur) {
                len += 1;
                match self.pairs.get(cur) {
                    Some(next) => cur = next,
                    None => break,
                }
            }
            lengths.push(len);
        }
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        lengths
    }

    /// Check that the mapping is a derangement of exactly `ids`:
    /// total, irreflexive and bijective.
    ///
    /// # Errors
    /// Returns [`GiftswapError::AssignmentIntegrity`] naming the first
    /// violated property.
    pub fn verify(&self, ids: &BTreeSet<ParticipantId>) -> Result<()> {
        if self.pairs.len() != ids.len() {
            return Err(integrity(format!(
                "{} pairs for {} participants",
                self.pairs.len(),
                ids.len()
            )));
        }
        let mut recipients: BTreeSet<&ParticipantId> = BTreeSet::new();
        for id in ids {
            let Some(recipient) = self.pairs.get(id) else {
                return Err(integrity(format!("{id} has no recipient")));
            };
            if recipient == id {
                return Err(integrity(format!("{id} is assigned to themselves")));
            }
            if !ids.contains(recipient) {
                return Err(integrity(format!(
                    "{id} is assigned to non-participant {recipient}"
                )));
            }
            if !recipients.insert(recipient) {
                return Err(integrity(format!("{recipient} receives from two givers")));
            }
        }
        Ok(())
    }
}

fn integrity(reason: String) -> GiftswapError {
    GiftswapError::AssignmentIntegrity { reason }
}
