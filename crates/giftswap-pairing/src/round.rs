//! Applying a computed assignment to participant records.
//!
//! A re-roll fully replaces the previous round: every participant's
//! recipient is cleared before the new pairs are written, including
//! participants that are not part of the new round.

use std::collections::BTreeSet;

use giftswap_types::{GiftswapError, Participant, ParticipantId, Result};

use crate::Assignment;

/// Write `assignment` onto `participants`, clearing all prior recipients.
///
/// Validation happens before any mutation, so on error the records are
/// untouched.
///
/// # Errors
/// Returns `ParticipantNotFound` if the assignment names a giver or
/// recipient absent from `participants`.
pub fn apply_assignment(participants: &mut [Participant], assignment: &Assignment) -> Result<()> {
    let known: BTreeSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();
    for (giver, recipient) in assignment.iter() {
        for id in [giver, recipient] {
            if !known.contains(id) {
                return Err(GiftswapError::ParticipantNotFound(id.clone()));
            }
        }
    }

    let mut cleared = 0usize;
    for participant in participants.iter_mut() {
        if participant.assigned_recipient_id.take().is_some() {
            cleared += 1;
        }
        participant.assigned_recipient_id = assignment.recipient_of(&participant.id).cloned();
    }

    tracing::info!(pairs = assignment.len(), cleared, "Pairing round applied");
    Ok(())
}

/// Rebuild the live assignment from participant records.
#[must_use]
pub fn current_assignment(participants: &[Participant]) -> Assignment {
    Assignment::from_pairs(
        participants
            .iter()
            .filter_map(|p| {
                p.assigned_recipient_id
                    .as_ref()
                    .map(|r| (p.id.clone(), r.clone()))
            })
            .collect(),
    )
}
