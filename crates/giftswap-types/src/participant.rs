//! Participant model.
//!
//! A participant is created at signup, mutated when a pairing round is
//! rolled and when gifts arrive in custody, and reset only by an explicit
//! admin action.
//!
//! Stored records go through [`ParticipantRecord`], which accepts the
//! older field names and the legacy flat `sentItemClassIDs` list and
//! collapses both into the canonical shape. Only the canonical shape is
//! ever written back.

use serde::{Deserialize, Serialize};

use crate::{AccountId, ItemFingerprint, ParticipantId};

/// A registered gift-exchange participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ParticipantRecord")]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    /// Where this participant's incoming gift is delivered (trade link).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Custody-side account the participant sends gifts from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    pub interests: Vec<String>,
    /// Who this participant gives to in the current round.
    pub assigned_recipient_id: Option<ParticipantId>,
    /// Custody ledger: fingerprints of every item received from this
    /// participant, in arrival order. Append-only outside admin reset.
    pub received_items: Vec<ItemFingerprint>,
}

impl Participant {
    #[must_use]
    pub fn new(id: ParticipantId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            destination: None,
            account_id: None,
            interests: Vec::new(),
            assigned_recipient_id: None,
            received_items: Vec::new(),
        }
    }

    /// True once a destination contact is on file.
    #[must_use]
    pub fn has_destination(&self) -> bool {
        self.destination.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Drop the current round's assignment.
    pub fn clear_assignment(&mut self) {
        self.assigned_recipient_id = None;
    }

    /// Admin reset: forget the assignment and the custody ledger.
    pub fn reset(&mut self) {
        self.assigned_recipient_id = None;
        self.received_items.clear();
    }

    /// Recipient summary shown to whoever is assigned to this participant.
    #[must_use]
    pub fn brief(&self) -> RecipientBrief {
        RecipientBrief {
            participant_id: self.id.clone(),
            display_name: self.display_name.clone(),
            destination: self.destination.clone(),
            interests: self.interests.clone(),
        }
    }
}

/// What a giver learns about their recipient when pairs are revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientBrief {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub destination: Option<String>,
    pub interests: Vec<String>,
}

// ---------------------------------------------------------------------------
// Storage boundary
// ---------------------------------------------------------------------------

/// Legacy class ids were stored either as strings or as bare numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LegacyClassId {
    Text(String),
    Number(u64),
}

impl LegacyClassId {
    fn into_fingerprint(self) -> ItemFingerprint {
        match self {
            Self::Text(class) => ItemFingerprint::class_only(class),
            Self::Number(class) => ItemFingerprint::class_only(class.to_string()),
        }
    }
}

/// On-disk participant shape, accepting every historical field name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantRecord {
    #[serde(alias = "userId")]
    id: ParticipantId,
    #[serde(default, alias = "name")]
    display_name: String,
    #[serde(default, alias = "tradelink")]
    destination: Option<String>,
    #[serde(default, alias = "steamID64")]
    account_id: Option<AccountId>,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default, alias = "assigned")]
    assigned_recipient_id: Option<ParticipantId>,
    #[serde(default)]
    received_items: Vec<ItemFingerprint>,
    #[serde(default, rename = "sentItemClassIDs")]
    legacy_class_ids: Vec<LegacyClassId>,
}

impl From<ParticipantRecord> for Participant {
    fn from(record: ParticipantRecord) -> Self {
        let mut received_items = record.received_items;
        received_items.extend(
            record
                .legacy_class_ids
                .into_iter()
                .map(LegacyClassId::into_fingerprint),
        );
        let account_id = record.account_id.or_else(|| {
            record
                .destination
                .as_deref()
                .and_then(AccountId::from_trade_link)
        });
        Self {
            id: record.id,
            display_name: record.display_name,
            destination: record.destination,
            account_id,
            interests: record.interests,
            assigned_recipient_id: record.assigned_recipient_id,
            received_items,
        }
    }
}

/// Dummy participants for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Participant {
    /// A participant with a destination derived from `account`.
    pub fn dummy(id: &str, account: u32) -> Self {
        let destination =
            format!("https://steamcommunity.com/tradeoffer/new/?partner={account}&token=t{id}");
        Self {
            id: ParticipantId::new(id),
            display_name: format!("user-{id}"),
            account_id: AccountId::from_trade_link(&destination),
            destination: Some(destination),
            interests: vec!["Souvenirs".into(), "Stickers".into(), "Knives".into()],
            assigned_recipient_id: None,
            received_items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_roundtrip_preserves_ledger_presence() {
        let mut p = Participant::dummy("a", 17);
        p.received_items.push(ItemFingerprint::class_only("X"));
        p.received_items.push(ItemFingerprint::dummy("Y"));
        p.assigned_recipient_id = Some(ParticipantId::new("b"));

        let json = serde_json::to_string_pretty(&p).unwrap();
        let back: Participant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(back.received_items[0].wear_float.is_none());
        assert!(back.received_items[0].pattern_index.is_none());
    }

    #[test]
    fn legacy_record_collapses_to_canonical() {
        let json = r#"{
            "userId": "123",
            "name": "rick",
            "tradelink": "https://steamcommunity.com/tradeoffer/new/?partner=1234567890",
            "interests": ["PashaBiceps", "Souvenirs", "Katowice2019"],
            "steamID64": "76561199194833618",
            "assigned": "456",
            "sentItemClassIDs": ["310776560", 469467368]
        }"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, ParticipantId::new("123"));
        assert_eq!(p.display_name, "rick");
        assert_eq!(p.assigned_recipient_id, Some(ParticipantId::new("456")));
        assert_eq!(p.account_id, Some(AccountId(76_561_199_194_833_618)));
        assert_eq!(
            p.received_items,
            vec![
                ItemFingerprint::class_only("310776560"),
                ItemFingerprint::class_only("469467368"),
            ]
        );

        let written = serde_json::to_string(&p).unwrap();
        assert!(!written.contains("sentItemClassIDs"));
        assert!(written.contains("receivedItems"));
    }

    #[test]
    fn account_id_derived_when_missing() {
        let json = r#"{"id":"1","destination":"https://x/?partner=5"}"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(p.account_id, Some(AccountId::from_account_number(5)));
        assert!(p.interests.is_empty());
        assert!(p.assigned_recipient_id.is_none());
    }

    #[test]
    fn reset_clears_assignment_and_ledger() {
        let mut p = Participant::dummy("a", 1);
        p.assigned_recipient_id = Some(ParticipantId::new("b"));
        p.received_items.push(ItemFingerprint::class_only("X"));
        p.reset();
        assert!(p.assigned_recipient_id.is_none());
        assert!(p.received_items.is_empty());
    }

    #[test]
    fn blank_destination_is_missing() {
        let mut p = Participant::dummy("a", 1);
        assert!(p.has_destination());
        p.destination = Some("  ".into());
        assert!(!p.has_destination());
        p.destination = None;
        assert!(!p.has_destination());
    }
}
