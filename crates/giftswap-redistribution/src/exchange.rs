//! The gift-exchange service.
//!
//! [`GiftExchange`] owns the engines and talks to its collaborators:
//!
//! ```text
//! signup ──► register()        ──┐
//! roll   ──► roll_assignment() ──┼──► ParticipantRegistry
//! gifts  ──► accept_offer()    ──┘          │
//!                                           ▼
//! admin  ──► run_redistribution() ◄── InventorySource
//!                   │
//!                   ▼
//!            RunReport { summary, requests }
//! ```
//!
//! # Concurrency
//!
//! - At most one redistribution run is in flight; a second call fails fast
//!   with `RedistributionInProgress`
//! - Rolling and resetting are refused while a run is in flight, so a run
//!   never resolves against a half-applied round; concurrent rolls and
//!   resets queue behind each other
//! - Registry read-modify-write cycles are serialized through one lock
//! - A run that ends early, including one whose future is dropped, leaves
//!   the phase at `Idle`
//!
//! A run never mutates participants: ledgers and assignments are left as
//! they were, and clearing them is an explicit admin action.

use std::collections::BTreeSet;
use std::sync::{Mutex as SyncMutex, MutexGuard as SyncMutexGuard, PoisonError};

use chrono::Utc;
use giftswap_custody::{
    IncomingOffer, ObservedItem, SignupPolicy, SignupRequest, extract, ledger, offer,
};
use giftswap_pairing::{Assignment, PairingEngine, apply_assignment, current_assignment};
use giftswap_reconcile::snapshot_digest_hex;
use giftswap_types::{
    ExchangeConfig, GiftswapError, ItemFingerprint, Participant, ParticipantId, RecipientBrief,
    Result, RunId, RunPhase, RunReport, RunSummary, StatusReport,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::collaborators::{InventorySource, ParticipantRegistry};
use crate::planner::redistribute;

/// Result of recording one or more received items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOutcome {
    pub participant_id: ParticipantId,
    /// Fingerprints appended by this call.
    pub recorded: usize,
    /// Ledger length after the append.
    pub ledger_len: usize,
}

/// Puts the phase back to `Idle` when a run ends, however it ends.
struct PhaseReset<'a>(&'a SyncMutex<RunPhase>);

impl Drop for PhaseReset<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = RunPhase::Idle;
    }
}

/// Gift-exchange service over a participant registry and an inventory
/// provider.
pub struct GiftExchange<R, I> {
    config: ExchangeConfig,
    registry: R,
    inventory: I,
    engine: PairingEngine,
    signup: SignupPolicy,
    /// Held for the whole of a run. Roll and reset check it with `try_lock`.
    run_gate: Mutex<()>,
    /// Held across registry read-modify-write cycles, and by a run while it
    /// reads participants.
    write_lock: Mutex<()>,
    /// Never held across an await, so a dropped run can reset it.
    phase: SyncMutex<RunPhase>,
    last_run: RwLock<Option<RunSummary>>,
}

impl<R, I> GiftExchange<R, I>
where
    R: ParticipantRegistry,
    I: InventorySource,
{
    /// Build the service after validating `config`.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(config: ExchangeConfig, registry: R, inventory: I) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: PairingEngine::new(config.pairing),
            signup: SignupPolicy::new(config.min_interests),
            config,
            registry,
            inventory,
            run_gate: Mutex::new(()),
            write_lock: Mutex::new(()),
            phase: SyncMutex::new(RunPhase::Idle),
            last_run: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    #[must_use]
    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Current orchestrator phase.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *self.phase_slot()
    }

    // ---------------------------------------------------------------
    // Signup
    // ---------------------------------------------------------------

    /// Validate and store a new participant.
    ///
    /// # Errors
    /// `DuplicateParticipant` or `InvalidSignup` from the signup policy,
    /// or a registry failure.
    pub async fn register(&self, request: SignupRequest) -> Result<Participant> {
        let _write = self.write_lock.lock().await;
        let existing = self.registry.list_participants().await?;
        let participant = self.signup.admit(request, &existing)?;
        self.registry.save(&participant).await?;
        tracing::info!(
            participant = %participant.id,
            account = ?participant.account_id,
            interests = participant.interests.len(),
            "Participant registered"
        );
        Ok(participant)
    }

    // ---------------------------------------------------------------
    // Pairing
    // ---------------------------------------------------------------

    /// Roll a new round over `ids` with fresh entropy.
    ///
    /// # Errors
    /// See [`Self::roll_assignment_with_rng`].
    pub async fn roll_assignment(&self, ids: &BTreeSet<ParticipantId>) -> Result<Assignment> {
        let mut rng = StdRng::from_entropy();
        self.roll_assignment_with_rng(ids, &mut rng).await
    }

    /// Roll a new round over `ids`, overwriting every prior assignment.
    ///
    /// Participants outside `ids` are left unassigned.
    ///
    /// # Errors
    /// - `RedistributionInProgress` while a run is in flight
    /// - `InsufficientParticipants` for fewer than two ids
    /// - `ParticipantNotFound` if an id is not registered (nothing is written)
    /// - `AssignmentIntegrity` if the computed mapping is not a derangement
    pub async fn roll_assignment_with_rng<G: Rng + ?Sized>(
        &self,
        ids: &BTreeSet<ParticipantId>,
        rng: &mut G,
    ) -> Result<Assignment> {
        let _write = self.write_lock.lock().await;
        self.ensure_no_run()?;

        let assignment = self.engine.assign(ids, rng)?;
        let mut participants = self.registry.list_participants().await?;
        apply_assignment(&mut participants, &assignment)?;
        self.registry.save_all(&participants).await?;

        tracing::info!(
            participants = assignment.len(),
            strategy = ?self.engine.strategy(),
            cycles = ?assignment.cycle_lengths(),
            "Pairing round rolled"
        );
        Ok(assignment)
    }

    /// Roll a new round over every registered participant.
    ///
    /// # Errors
    /// See [`Self::roll_assignment_with_rng`].
    pub async fn roll_all(&self) -> Result<Assignment> {
        let ids: BTreeSet<ParticipantId> = self
            .registry
            .list_participants()
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        self.roll_assignment(&ids).await
    }

    /// What `id` learns about their recipient. `None` while unassigned.
    ///
    /// # Errors
    /// `ParticipantNotFound` if the giver or the assigned recipient is not
    /// registered.
    pub async fn reveal(&self, id: &ParticipantId) -> Result<Option<RecipientBrief>> {
        let giver = self.require(id).await?;
        let Some(recipient_id) = giver.assigned_recipient_id else {
            return Ok(None);
        };
        let recipient = self.require(&recipient_id).await?;
        Ok(Some(recipient.brief()))
    }

    // ---------------------------------------------------------------
    // Custody intake
    // ---------------------------------------------------------------

    /// Fingerprint one observed item and append it to `participant_id`'s
    /// ledger.
    ///
    /// # Errors
    /// `ParticipantNotFound`, `InvalidObservation`, or a registry failure.
    pub async fn record_receipt(
        &self,
        participant_id: &ParticipantId,
        observed: &ObservedItem,
    ) -> Result<ReceiptOutcome> {
        let fingerprint = extract(observed)?;
        let _write = self.write_lock.lock().await;
        let mut participant = self.require(participant_id).await?;
        self.append_and_save(&mut participant, vec![fingerprint]).await
    }

    /// Accept a gift-only offer and credit its items to the sender.
    ///
    /// # Errors
    /// `NotGiftOnly`, `UnknownSender`, `InvalidObservation`, or a registry
    /// failure. A rejected offer records nothing.
    pub async fn accept_offer(&self, incoming: &IncomingOffer) -> Result<ReceiptOutcome> {
        let _write = self.write_lock.lock().await;
        let participants = self.registry.list_participants().await?;
        let gift = offer::accept(incoming, &participants)?;
        let mut sender = participants
            .into_iter()
            .find(|p| p.id == gift.participant_id)
            .ok_or_else(|| GiftswapError::ParticipantNotFound(gift.participant_id.clone()))?;
        self.append_and_save(&mut sender, gift.fingerprints).await
    }

    async fn append_and_save(
        &self,
        participant: &mut Participant,
        fingerprints: Vec<ItemFingerprint>,
    ) -> Result<ReceiptOutcome> {
        let recorded = ledger::append(participant, fingerprints);
        self.registry.save(participant).await?;
        tracing::info!(
            participant = %participant.id,
            recorded,
            ledger_len = participant.received_items.len(),
            "Receipt recorded"
        );
        Ok(ReceiptOutcome {
            participant_id: participant.id.clone(),
            recorded,
            ledger_len: participant.received_items.len(),
        })
    }

    // ---------------------------------------------------------------
    // Admin
    // ---------------------------------------------------------------

    /// Clear one participant's assignment and ledger.
    ///
    /// # Errors
    /// `RedistributionInProgress` or `ParticipantNotFound`.
    pub async fn reset_participant(&self, id: &ParticipantId) -> Result<()> {
        let _write = self.write_lock.lock().await;
        self.ensure_no_run()?;
        let mut participant = self.require(id).await?;
        participant.reset();
        self.registry.save(&participant).await?;
        tracing::info!(participant = %id, "Participant reset");
        Ok(())
    }

    /// Clear every assignment and ledger. Returns the participant count.
    ///
    /// # Errors
    /// `RedistributionInProgress` or a registry failure.
    pub async fn reset_all(&self) -> Result<usize> {
        let _write = self.write_lock.lock().await;
        self.ensure_no_run()?;
        let mut participants = self.registry.list_participants().await?;
        participants.iter_mut().for_each(Participant::reset);
        self.registry.save_all(&participants).await?;
        tracing::info!(participants = participants.len(), "All participants reset");
        Ok(participants.len())
    }

    // ---------------------------------------------------------------
    // Redistribution
    // ---------------------------------------------------------------

    /// Fetch a fresh snapshot and plan every transfer owed.
    ///
    /// The phase returns to `Idle` however the run ends, including when the
    /// returned future is dropped.
    ///
    /// # Errors
    /// - `RedistributionInProgress` if another run holds the gate
    /// - `TransientFetch` if the snapshot could not be fetched; nothing was
    ///   planned and the run can be retried
    /// - a registry failure
    pub async fn run_redistribution(&self) -> Result<RunReport> {
        let _gate = self
            .run_gate
            .try_lock()
            .map_err(|_| GiftswapError::RedistributionInProgress)?;
        // Declared after the gate so it drops first: the phase is back to
        // `Idle` before another run can start.
        let _phase = PhaseReset(&self.phase);
        let run_id = RunId::new();

        let result = self.execute_run(run_id).await;

        match &result {
            Ok(report) => {
                *self.last_run.write().await = Some(report.summary.clone());
            }
            Err(e) => {
                tracing::warn!(run = %run_id, error = %e, "Redistribution run aborted");
            }
        }
        result
    }

    async fn execute_run(&self, run_id: RunId) -> Result<RunReport> {
        let started_at = Utc::now();
        self.advance_phase();

        let participants = {
            let _write = self.write_lock.lock().await;
            self.registry.list_participants().await?
        };
        let snapshot = self
            .inventory
            .fetch_snapshot(self.config.scope)
            .await
            .map_err(|e| match e {
                GiftswapError::TransientFetch { .. } => e,
                other => GiftswapError::TransientFetch {
                    reason: other.to_string(),
                },
            })?;

        self.advance_phase();
        let snapshot_digest = snapshot_digest_hex(&snapshot);
        let plan = redistribute(&participants, &snapshot, self.config.scope, run_id);

        self.advance_phase();
        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            snapshot_digest,
            snapshot_assets: snapshot.len(),
            requests_emitted: plan.requests.len(),
            items_routed: plan.items_routed(),
            issues: plan.issues,
        };

        tracing::info!(
            run = %run_id,
            snapshot_assets = summary.snapshot_assets,
            snapshot_digest = %summary.snapshot_digest,
            requests = summary.requests_emitted,
            items = summary.items_routed,
            issues = summary.issues.len(),
            "Redistribution run complete"
        );

        Ok(RunReport {
            summary,
            requests: plan.requests,
        })
    }

    // ---------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------

    /// Point-in-time overview of participants, ledgers and the last run.
    ///
    /// # Errors
    /// A registry failure.
    pub async fn status_report(&self) -> Result<StatusReport> {
        let participants = self.registry.list_participants().await?;
        let ledger = ledger::stats(&participants);
        Ok(StatusReport {
            participants: participants.len(),
            assigned: current_assignment(&participants).len(),
            holding_items: ledger.holders,
            ledger_items: ledger.items,
            phase: self.phase(),
            last_run: self.last_run.read().await.clone(),
        })
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    /// Refuse while a run holds the gate. Callers hold `write_lock`, so a
    /// run that starts afterwards reads participants only once they finish.
    fn ensure_no_run(&self) -> Result<()> {
        self.run_gate
            .try_lock()
            .map(drop)
            .map_err(|_| GiftswapError::RedistributionInProgress)
    }

    fn phase_slot(&self) -> SyncMutexGuard<'_, RunPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advance_phase(&self) {
        let mut current = self.phase_slot();
        let from = *current;
        let to = from.next();
        *current = to;
        tracing::debug!(%from, %to, "Run phase transition");
    }

    async fn require(&self, id: &ParticipantId) -> Result<Participant> {
        self.registry
            .get_participant(id)
            .await?
            .ok_or_else(|| GiftswapError::ParticipantNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use giftswap_types::{AssetRecord, ContextScope, InventorySnapshot};

    use super::*;
    use crate::collaborators::StaticInventory;
    use crate::registry::InMemoryRegistry;

    fn exchange(participants: Vec<Participant>) -> GiftExchange<InMemoryRegistry, StaticInventory> {
        GiftExchange::new(
            ExchangeConfig::default(),
            InMemoryRegistry::with_participants(participants),
            StaticInventory::default(),
        )
        .unwrap()
    }

    fn ids(names: &[&str]) -> BTreeSet<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let ex = exchange(vec![]);
        let request = SignupRequest {
            id: ParticipantId::new("a"),
            display_name: "A".into(),
            trade_link: "https://steamcommunity.com/tradeoffer/new/?partner=5&token=z".into(),
            interests: vec!["x".into(), "y".into(), "z".into()],
        };
        let p = ex.register(request.clone()).await.unwrap();
        assert_eq!(p.account_id.map(|a| a.account_number()), Some(5));
        assert!(matches!(
            ex.register(request).await,
            Err(GiftswapError::DuplicateParticipant(_))
        ));
    }

    #[tokio::test]
    async fn roll_unknown_id_writes_nothing() {
        let ex = exchange(vec![Participant::dummy("a", 1), Participant::dummy("b", 2)]);
        let err = ex
            .roll_assignment(&ids(&["a", "b", "ghost"]))
            .await
            .unwrap_err();
        assert!(matches!(err, GiftswapError::ParticipantNotFound(_)));
        let all = ex.registry().list_participants().await.unwrap();
        assert!(all.iter().all(|p| p.assigned_recipient_id.is_none()));
    }

    #[tokio::test]
    async fn roll_single_participant_rejected() {
        let ex = exchange(vec![Participant::dummy("a", 1)]);
        assert!(matches!(
            ex.roll_all().await,
            Err(GiftswapError::InsufficientParticipants { count: 1 })
        ));
    }

    #[tokio::test]
    async fn reveal_follows_assignment() {
        let ex = exchange(vec![Participant::dummy("a", 1), Participant::dummy("b", 2)]);
        assert_eq!(ex.reveal(&ParticipantId::new("a")).await.unwrap(), None);

        ex.roll_all().await.unwrap();
        let brief = ex.reveal(&ParticipantId::new("a")).await.unwrap().unwrap();
        assert_eq!(brief.participant_id, ParticipantId::new("b"));
        assert!(brief.destination.is_some());

        assert!(matches!(
            ex.reveal(&ParticipantId::new("zz")).await,
            Err(GiftswapError::ParticipantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn record_receipt_appends_duplicates() {
        let ex = exchange(vec![Participant::dummy("a", 1)]);
        let id = ParticipantId::new("a");
        let item = ObservedItem::with_class("X");
        ex.record_receipt(&id, &item).await.unwrap();
        let out = ex.record_receipt(&id, &item).await.unwrap();
        assert_eq!(out.recorded, 1);
        assert_eq!(out.ledger_len, 2);

        assert!(matches!(
            ex.record_receipt(&id, &ObservedItem::with_class("  ")).await,
            Err(GiftswapError::InvalidObservation { .. })
        ));
        assert!(matches!(
            ex.record_receipt(&ParticipantId::new("zz"), &item).await,
            Err(GiftswapError::ParticipantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn reset_clears_ledger_and_assignment() {
        let mut a = Participant::dummy("a", 1);
        a.received_items.push(ItemFingerprint::class_only("X"));
        a.assigned_recipient_id = Some(ParticipantId::new("b"));
        let ex = exchange(vec![a, Participant::dummy("b", 2)]);

        ex.reset_participant(&ParticipantId::new("a")).await.unwrap();
        let a = ex
            .registry()
            .get_participant(&ParticipantId::new("a"))
            .await
            .unwrap()
            .unwrap();
        assert!(a.received_items.is_empty());
        assert!(a.assigned_recipient_id.is_none());
        assert_eq!(ex.reset_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn run_leaves_participants_untouched() {
        let mut a = Participant::dummy("a", 1);
        a.received_items.push(ItemFingerprint::class_only("X"));
        a.assigned_recipient_id = Some(ParticipantId::new("b"));
        let mut b = Participant::dummy("b", 2);
        b.assigned_recipient_id = Some(ParticipantId::new("a"));
        let ex = exchange(vec![a, b]);
        ex.inventory()
            .replace(InventorySnapshot::new(
                vec![AssetRecord::new("h1", "X", ContextScope::default())],
                vec![],
            ))
            .await;

        let before = ex.registry().list_participants().await.unwrap();
        let report = ex.run_redistribution().await.unwrap();
        assert_eq!(report.requests.len(), 1);
        assert_eq!(report.summary.items_routed, 1);
        assert_eq!(ex.registry().list_participants().await.unwrap(), before);
        assert_eq!(ex.phase(), RunPhase::Idle);

        let status = ex.status_report().await.unwrap();
        assert_eq!(status.last_run.unwrap().run_id, report.summary.run_id);
    }

    #[tokio::test]
    async fn gate_held_rejects_roll_reset_and_run() {
        let ex = exchange(vec![Participant::dummy("a", 1), Participant::dummy("b", 2)]);
        let _held = ex.run_gate.lock().await;
        assert!(matches!(
            ex.run_redistribution().await,
            Err(GiftswapError::RedistributionInProgress)
        ));
        assert!(matches!(
            ex.roll_all().await,
            Err(GiftswapError::RedistributionInProgress)
        ));
        assert!(matches!(
            ex.reset_all().await,
            Err(GiftswapError::RedistributionInProgress)
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = ExchangeConfig {
            pairing: giftswap_types::PairingStrategy::RejectionSampling { max_attempts: 0 },
            ..ExchangeConfig::default()
        };
        assert!(matches!(
            GiftExchange::new(cfg, InMemoryRegistry::new(), StaticInventory::default()),
            Err(GiftswapError::Configuration(_))
        ));
    }
}
