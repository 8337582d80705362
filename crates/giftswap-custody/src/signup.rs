//! Signup validation.
//!
//! A signup must carry a trade link with a numeric `partner` parameter
//! (the custody-side account is derived from it) and at least the
//! configured number of interests. Ids and accounts are unique across the
//! registry.

use giftswap_types::{AccountId, GiftswapError, Participant, ParticipantId, Result, constants};
use serde::{Deserialize, Serialize};

/// What a participant submits to join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub id: ParticipantId,
    pub display_name: String,
    pub trade_link: String,
    pub interests: Vec<String>,
}

/// Admission rules for new participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupPolicy {
    pub min_interests: usize,
}

impl Default for SignupPolicy {
    fn default() -> Self {
        Self {
            min_interests: constants::DEFAULT_MIN_INTERESTS,
        }
    }
}

impl SignupPolicy {
    #[must_use]
    pub fn new(min_interests: usize) -> Self {
        Self { min_interests }
    }

    /// Validate a request against the current registry contents and build
    /// the new participant.
    ///
    /// # Errors
    /// - `DuplicateParticipant` if the id is taken
    /// - `InvalidSignup` for a bad trade link, too few interests, or an
    ///   account already used by someone else
    pub fn admit(&self, request: SignupRequest, existing: &[Participant]) -> Result<Participant> {
        if existing.iter().any(|p| p.id == request.id) {
            return Err(GiftswapError::DuplicateParticipant(request.id));
        }

        let trade_link = request.trade_link.trim();
        if trade_link.is_empty() {
            return Err(invalid("a trade link is required"));
        }
        let account = AccountId::from_trade_link(trade_link)
            .ok_or_else(|| invalid("trade link has no valid partner parameter"))?;
        if existing.iter().any(|p| p.account_id == Some(account)) {
            return Err(invalid(&format!("account {account} is already registered")));
        }

        let interests: Vec<String> = request
            .interests
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        if interests.len() < self.min_interests {
            return Err(invalid(&format!(
                "at least {} interests required, got {}",
                self.min_interests,
                interests.len()
            )));
        }

        let mut participant = Participant::new(request.id, request.display_name);
        participant.destination = Some(trade_link.to_string());
        participant.account_id = Some(account);
        participant.interests = interests;
        Ok(participant)
    }
}

fn invalid(reason: &str) -> GiftswapError {
    GiftswapError::InvalidSignup {
        reason: reason.to_string(),
    }
}
