//! Gift-offer intake.
//!
//! The custody account only accepts pure gifts: offers that ask for
//! nothing and hand over at least one item. The sender is identified by
//! the account the offer comes from; every offered item is fingerprinted
//! before anything is recorded, so a bad item rejects the whole offer.

use giftswap_types::{AccountId, GiftswapError, ItemFingerprint, Participant, ParticipantId, Result};
use serde::{Deserialize, Serialize};

use crate::fingerprint::{ObservedItem, extract};

/// An offer arriving at the custody account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingOffer {
    /// Account the offer was sent from.
    pub partner: AccountId,
    /// Items the offer asks the custody account to hand over.
    #[serde(default)]
    pub items_to_give: Vec<ObservedItem>,
    /// Items the offer hands to the custody account.
    #[serde(default)]
    pub items_to_receive: Vec<ObservedItem>,
}

impl IncomingOffer {
    /// Gift-only: nothing requested, something offered.
    #[must_use]
    pub fn is_gift_only(&self) -> bool {
        self.items_to_give.is_empty() && !self.items_to_receive.is_empty()
    }
}

/// Fingerprints extracted from an accepted offer, ready for the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedGift {
    pub participant_id: ParticipantId,
    pub fingerprints: Vec<ItemFingerprint>,
}

/// Validate an offer and attribute it to a registered participant.
///
/// # Errors
/// - `NotGiftOnly` if the offer requests items or offers none
/// - `UnknownSender` if no participant sends from `offer.partner`
/// - `InvalidObservation` if any offered item cannot be fingerprinted
pub fn accept(offer: &IncomingOffer, participants: &[Participant]) -> Result<AcceptedGift> {
    if !offer.is_gift_only() {
        return Err(GiftswapError::NotGiftOnly {
            give: offer.items_to_give.len(),
            receive: offer.items_to_receive.len(),
        });
    }

    let Some(sender) = participants
        .iter()
        .find(|p| p.account_id == Some(offer.partner))
    else {
        tracing::warn!(account = %offer.partner, "Gift from unregistered account");
        return Err(GiftswapError::UnknownSender(offer.partner));
    };

    let fingerprints = offer
        .items_to_receive
        .iter()
        .map(extract)
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        participant = %sender.id,
        account = %offer.partner,
        items = fingerprints.len(),
        "Gift offer accepted"
    );
    Ok(AcceptedGift {
        participant_id: sender.id.clone(),
        fingerprints,
    })
}
