//! Redistribution run lifecycle and reporting types.
//!
//! A run cycles through **IDLE → FETCHING_SNAPSHOT → RESOLVING → EMITTING
//! → IDLE**. Only one run may be in flight per process.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RunId, RunIssue, TransferRequest};

/// Phase of the redistribution orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in flight.
    #[default]
    Idle,
    /// Waiting on the custody provider for a fresh snapshot.
    FetchingSnapshot,
    /// Resolving ledgers against the snapshot.
    Resolving,
    /// Handing transfer requests back to the caller.
    Emitting,
}

impl RunPhase {
    /// Return the next phase in the cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::FetchingSnapshot,
            Self::FetchingSnapshot => Self::Resolving,
            Self::Resolving => Self::Emitting,
            Self::Emitting => Self::Idle,
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::FetchingSnapshot => write!(f, "FETCHING_SNAPSHOT"),
            Self::Resolving => write!(f, "RESOLVING"),
            Self::Emitting => write!(f, "EMITTING"),
        }
    }
}

/// Successful outcome of one redistribution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub summary: RunSummary,
    pub requests: Vec<TransferRequest>,
}

/// Bookkeeping for a completed run, retained for status reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Hex SHA-256 digest of the snapshot the run resolved against.
    pub snapshot_digest: String,
    pub snapshot_assets: usize,
    pub requests_emitted: usize,
    pub items_routed: usize,
    pub issues: Vec<RunIssue>,
}

/// Point-in-time overview of the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub participants: usize,
    pub assigned: usize,
    /// Participants with at least one item in custody.
    pub holding_items: usize,
    /// Total fingerprints across every ledger.
    pub ledger_items: usize,
    pub phase: RunPhase,
    pub last_run: Option<RunSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_phase_cycle() {
        assert_eq!(RunPhase::Idle.next(), RunPhase::FetchingSnapshot);
        assert_eq!(RunPhase::FetchingSnapshot.next(), RunPhase::Resolving);
        assert_eq!(RunPhase::Resolving.next(), RunPhase::Emitting);
        assert_eq!(RunPhase::Emitting.next(), RunPhase::Idle);
        assert_eq!(RunPhase::default(), RunPhase::Idle);
    }

    #[test]
    fn run_phase_display() {
        assert_eq!(format!("{}", RunPhase::FetchingSnapshot), "FETCHING_SNAPSHOT");
        assert_eq!(format!("{}", RunPhase::Emitting), "EMITTING");
    }

    #[test]
    fn run_phase_serde_roundtrip() {
        let phase = RunPhase::Resolving;
        let json = serde_json::to_string(&phase).unwrap();
        let back: RunPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, back);
    }
}
