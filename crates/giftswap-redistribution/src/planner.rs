//! Redistribution planning.
//!
//! ```text
//! redistribute(participants, snapshot) -> RedistributionPlan
//! ```
//!
//! Pure: the orchestrator fetches the inputs, this module decides what to
//! send. Every giver with a recipient and a non-empty ledger is resolved
//! against the *shared* snapshot through one [`Reconciler`], so two givers'
//! logical items never resolve to the same asset.

use std::collections::HashMap;

use giftswap_custody::ledger;
use giftswap_reconcile::Reconciler;
use giftswap_types::{
    ContextScope, InventorySnapshot, Participant, ParticipantId, RunId, RunIssue, TransferId,
    TransferRequest,
};

/// Transfer requests plus the soft issues met while building them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedistributionPlan {
    pub requests: Vec<TransferRequest>,
    pub issues: Vec<RunIssue>,
}

impl RedistributionPlan {
    /// Total assets across all requests.
    #[must_use]
    pub fn items_routed(&self) -> usize {
        self.requests.iter().map(|r| r.items.len()).sum()
    }
}

/// Build the plan for one run. Givers are visited in `participants` order.
#[must_use]
pub fn redistribute(
    participants: &[Participant],
    snapshot: &InventorySnapshot,
    scope: ContextScope,
    run_id: RunId,
) -> RedistributionPlan {
    let directory: HashMap<&ParticipantId, &Participant> =
        participants.iter().map(|p| (&p.id, p)).collect();
    let mut reconciler = Reconciler::new(snapshot, scope);
    let mut plan = RedistributionPlan::default();
    let mut sequence: u64 = 0;

    for giver in participants {
        let Some(recipient_id) = giver.assigned_recipient_id.as_ref() else {
            continue;
        };
        let pending = ledger::pending(giver);
        if pending.is_empty() {
            continue;
        }

        // Checked before resolving so a skipped giver claims no assets.
        let Some(destination) = directory
            .get(recipient_id)
            .filter(|r| r.has_destination())
            .and_then(|r| r.destination.clone())
        else {
            tracing::warn!(
                giver = %giver.id,
                recipient = %recipient_id,
                "Recipient has no destination, skipping"
            );
            plan.issues.push(RunIssue::MissingDestination {
                giver_id: giver.id.clone(),
                recipient_id: recipient_id.clone(),
            });
            continue;
        };

        let mut items = Vec::with_capacity(pending.len());
        for resolution in reconciler.resolve(pending) {
            match resolution.asset {
                Some(asset) => items.push(asset),
                None => {
                    tracing::warn!(
                        giver = %giver.id,
                        fingerprint = %resolution.fingerprint,
                        "No custody asset matches ledger item"
                    );
                    plan.issues.push(RunIssue::UnmatchedItem {
                        giver_id: giver.id.clone(),
                        fingerprint: resolution.fingerprint,
                    });
                }
            }
        }

        if items.is_empty() {
            plan.issues.push(RunIssue::NothingToSend {
                giver_id: giver.id.clone(),
            });
            continue;
        }

        tracing::debug!(
            giver = %giver.id,
            recipient = %recipient_id,
            items = items.len(),
            "Transfer planned"
        );
        plan.requests.push(TransferRequest {
            id: TransferId::deterministic(run_id, sequence),
            giver_id: giver.id.clone(),
            recipient_id: recipient_id.clone(),
            destination,
            items,
        });
        sequence += 1;
    }

    plan
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use giftswap_types::{AssetRecord, DescriptionRecord, ItemFingerprint};

    use super::*;

    fn scope() -> ContextScope {
        ContextScope::default()
    }

    fn ring(names: &[&str]) -> Vec<Participant> {
        let mut ps: Vec<Participant> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Participant::dummy(n, u32::try_from(i).unwrap() + 100))
            .collect();
        let n = ps.len();
        for i in 0..n {
            ps[i].assigned_recipient_id = Some(ps[(i + 1) % n].id.clone());
        }
        ps
    }

    #[test]
    fn single_gift_routed_to_recipient() {
        let mut ps = ring(&["a", "b", "c"]);
        ps[0].received_items.push(ItemFingerprint::class_only("Sticker|Katowice2019"));
        let snap = InventorySnapshot::new(
            vec![AssetRecord::new("h1", "Sticker|Katowice2019", scope())],
            vec![],
        );

        let plan = redistribute(&ps, &snap, scope(), RunId::new());
        assert_eq!(plan.requests.len(), 1);
        let req = &plan.requests[0];
        assert_eq!(req.giver_id, ParticipantId::new("a"));
        assert_eq!(req.recipient_id, ParticipantId::new("b"));
        assert_eq!(req.destination, ps[1].destination.clone().unwrap());
        assert_eq!(req.items[0].ephemeral_handle.0, "h1");
        assert!(plan.issues.is_empty());
    }

    #[test]
    fn no_asset_in_two_requests() {
        let mut ps = ring(&["a", "b", "c", "d"]);
        for p in &mut ps {
            p.received_items.push(ItemFingerprint::class_only("X"));
            p.received_items.push(ItemFingerprint::class_only("X"));
        }
        let snap = InventorySnapshot::new(
            (0..6)
                .map(|i| AssetRecord::new(format!("h{i}"), "X", scope()))
                .collect(),
            vec![],
        );

        let plan = redistribute(&ps, &snap, scope(), RunId::new());
        let mut seen = HashSet::new();
        for req in &plan.requests {
            for item in &req.items {
                assert!(seen.insert(item.ephemeral_handle.clone()), "double claim");
            }
        }
        assert_eq!(plan.items_routed(), 6);
        let unmatched = plan
            .issues
            .iter()
            .filter(|i| matches!(i, RunIssue::UnmatchedItem { .. }))
            .count();
        assert_eq!(unmatched, 2);
    }

    #[test]
    fn missing_destination_skips_without_claiming() {
        let mut ps = ring(&["a", "b"]);
        ps[1].destination = None;
        ps[0].received_items.push(ItemFingerprint::class_only("X"));
        ps[1].received_items.push(ItemFingerprint::class_only("X"));
        let snap = InventorySnapshot::new(vec![AssetRecord::new("h1", "X", scope())], vec![]);

        let plan = redistribute(&ps, &snap, scope(), RunId::new());
        assert_eq!(
            plan.issues,
            vec![RunIssue::MissingDestination {
                giver_id: ParticipantId::new("a"),
                recipient_id: ParticipantId::new("b"),
            }]
        );
        // b gives to a, and a's destination is intact: b gets the asset.
        assert_eq!(plan.requests.len(), 1);
        assert_eq!(plan.requests[0].giver_id, ParticipantId::new("b"));
        assert_eq!(plan.requests[0].items[0].ephemeral_handle.0, "h1");
    }

    #[test]
    fn unregistered_recipient_is_missing_destination() {
        let mut ps = ring(&["a", "b"]);
        ps[0].assigned_recipient_id = Some(ParticipantId::new("ghost"));
        ps[0].received_items.push(ItemFingerprint::class_only("X"));
        let plan = redistribute(&ps, &InventorySnapshot::default(), scope(), RunId::new());
        assert!(matches!(
            &plan.issues[..],
            [RunIssue::MissingDestination { recipient_id, .. }] if recipient_id.as_str() == "ghost"
        ));
    }

    #[test]
    fn nothing_resolved_reports_nothing_to_send() {
        let mut ps = ring(&["a", "b"]);
        ps[0].received_items.push(ItemFingerprint::class_only("X").with_pattern_index(7));
        let snap = InventorySnapshot::new(
            vec![AssetRecord::new("h1", "X", scope())],
            vec![DescriptionRecord::new("X").with_pattern_index(8)],
        );

        let plan = redistribute(&ps, &snap, scope(), RunId::new());
        assert!(plan.requests.is_empty());
        assert_eq!(plan.issues.len(), 2);
        assert!(matches!(plan.issues[0], RunIssue::UnmatchedItem { .. }));
        assert!(matches!(plan.issues[1], RunIssue::NothingToSend { .. }));
    }

    #[test]
    fn unassigned_or_empty_ledgers_skipped_silently() {
        let mut ps = ring(&["a", "b"]);
        ps[0].assigned_recipient_id = None;
        ps[0].received_items.push(ItemFingerprint::class_only("X"));
        let snap = InventorySnapshot::new(vec![AssetRecord::new("h1", "X", scope())], vec![]);

        let plan = redistribute(&ps, &snap, scope(), RunId::new());
        assert!(plan.requests.is_empty());
        assert!(plan.issues.is_empty());
    }

    #[test]
    fn transfer_ids_follow_run_sequence() {
        let mut ps = ring(&["a", "b"]);
        ps[0].received_items.push(ItemFingerprint::class_only("X"));
        ps[1].received_items.push(ItemFingerprint::class_only("Y"));
        let snap = InventorySnapshot::new(
            vec![
                AssetRecord::new("h1", "X", scope()),
                AssetRecord::new("h2", "Y", scope()),
            ],
            vec![],
        );
        let run = RunId::new();
        let plan = redistribute(&ps, &snap, scope(), run);
        assert_eq!(plan.requests[0].id, TransferId::deterministic(run, 0));
        assert_eq!(plan.requests[1].id, TransferId::deterministic(run, 1));
        assert_eq!(redistribute(&ps, &snap, scope(), run), plan);
    }
}
