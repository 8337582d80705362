//! Outbound transfer requests and the soft issues reported alongside them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AssetRecord, ItemFingerprint, ParticipantId, TransferId};

/// One outbound transfer: everything a giver sent, routed to their
/// assigned recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub id: TransferId,
    /// Participant whose gifts these are.
    pub giver_id: ParticipantId,
    pub recipient_id: ParticipantId,
    /// Recipient's destination contact (trade link).
    pub destination: String,
    /// Concrete assets resolved from the giver's ledger. Never empty.
    pub items: Vec<AssetRecord>,
}

/// Per-item or per-participant condition that does not abort a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RunIssue {
    /// A ledger fingerprint had no satisfying asset in the snapshot.
    UnmatchedItem {
        giver_id: ParticipantId,
        fingerprint: ItemFingerprint,
    },
    /// The recipient is unknown or has no destination; the giver is skipped.
    MissingDestination {
        giver_id: ParticipantId,
        recipient_id: ParticipantId,
    },
    /// Nothing in the giver's ledger resolved; no request was emitted.
    NothingToSend { giver_id: ParticipantId },
}

impl RunIssue {
    /// The participant this issue concerns.
    #[must_use]
    pub fn giver_id(&self) -> &ParticipantId {
        match self {
            Self::UnmatchedItem { giver_id, .. }
            | Self::MissingDestination { giver_id, .. }
            | Self::NothingToSend { giver_id } => giver_id,
        }
    }
}

impl fmt::Display for RunIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedItem {
                giver_id,
                fingerprint,
            } => write!(f, "UNMATCHED_ITEM: {fingerprint} from {giver_id}"),
            Self::MissingDestination {
                giver_id,
                recipient_id,
            } => write!(
                f,
                "MISSING_DESTINATION: recipient {recipient_id} of {giver_id}"
            ),
            Self::NothingToSend { giver_id } => write!(f, "NOTHING_TO_SEND: {giver_id}"),
        }
    }
}
