//! Derangement engine.
//!
//! ```text
//! PairingEngine::assign(ids, rng) -> Assignment
//! ```
//!
//! Two strategies share one contract: the result is total, irreflexive and
//! bijective over `ids`. Circular shift always yields a single n-cycle;
//! rejection sampling yields a uniform derangement but may need several
//! draws, so it is capped and falls back to a circular shift. The result
//! is re-verified before it leaves the engine.

use std::collections::{BTreeMap, BTreeSet};

use giftswap_types::{GiftswapError, PairingStrategy, ParticipantId, Result, constants};
use rand::{Rng, seq::SliceRandom};

use crate::Assignment;

/// Stateless pairing engine parameterised by strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairingEngine {
    strategy: PairingStrategy,
}

impl PairingEngine {
    #[must_use]
    pub fn new(strategy: PairingStrategy) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub fn strategy(&self) -> PairingStrategy {
        self.strategy
    }

    /// Compute a derangement over `ids`.
    ///
    /// # Errors
    /// - `InsufficientParticipants` if fewer than two ids are given
    /// - `AssignmentIntegrity` if the computed mapping fails verification
    pub fn assign<R: Rng + ?Sized>(
        &self,
        ids: &BTreeSet<ParticipantId>,
        rng: &mut R,
    ) -> Result<Assignment> {
        if ids.len() < constants::MIN_PARTICIPANTS {
            return Err(GiftswapError::InsufficientParticipants { count: ids.len() });
        }

        let assignment = match self.strategy {
            PairingStrategy::CircularShift => circular_shift(ids, rng),
            PairingStrategy::RejectionSampling { max_attempts } => {
                rejection_sample(ids, rng, max_attempts).unwrap_or_else(|| {
                    tracing::warn!(
                        participants = ids.len(),
                        max_attempts,
                        "Rejection sampling exhausted, falling back to circular shift"
                    );
                    circular_shift(ids, rng)
                })
            }
        };

        if let Err(err) = assignment.verify(ids) {
            tracing::error!(error = %err, "Pairing produced an invalid assignment");
            return Err(err);
        }

        tracing::debug!(
            participants = ids.len(),
            cycles = assignment.cycle_lengths().len(),
            "Pairing computed"
        );
        Ok(assignment)
    }
}

/// Shuffle once and give to the next id in the shuffled ring.
///
/// Requires at least two ids for the result to be irreflexive.
pub fn circular_shift<R: Rng + ?Sized>(ids: &BTreeSet<ParticipantId>, rng: &mut R) -> Assignment {
    let mut ring: Vec<ParticipantId> = ids.iter().cloned().collect();
    ring.shuffle(rng);
    let n = ring.len();
    let pairs = ring
        .iter()
        .enumerate()
        .map(|(i, giver)| (giver.clone(), ring[(i + 1) % n].clone()))
        .collect();
    Assignment::from_pairs(pairs)
}

/// Draw uniform permutations until one has no fixed point.
///
/// Returns `None` after `max_attempts` failed draws.
pub fn rejection_sample<R: Rng + ?Sized>(
    ids: &BTreeSet<ParticipantId>,
    rng: &mut R,
    max_attempts: u32,
) -> Option<Assignment> {
    let givers: Vec<&ParticipantId> = ids.iter().collect();
    let mut recipients = givers.clone();
    for attempt in 1..=max_attempts {
        recipients.shuffle(rng);
        if givers.iter().zip(&recipients).all(|(g, r)| g != r) {
            tracing::trace!(attempt, "Derangement drawn");
            let pairs: BTreeMap<_, _> = givers
                .iter()
                .zip(&recipients)
                .map(|(g, r)| ((*g).clone(), (*r).clone()))
                .collect();
            return Some(Assignment::from_pairs(pairs));
        }
    }
    None
}
