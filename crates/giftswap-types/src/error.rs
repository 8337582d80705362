//! Error types for the Giftswap exchange.
//!
//! All errors use the `GS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Registry / signup errors
//! - 2xx: Pairing errors
//! - 3xx: Custody intake errors
//! - 4xx: Inventory errors
//! - 5xx: Redistribution errors
//! - 9xx: General / internal errors
//!
//! Per-item conditions (unmatched items, missing destinations) are not
//! errors; they are reported as [`crate::RunIssue`] next to a successful
//! result.

use thiserror::Error;

use crate::{AccountId, ParticipantId};

/// Central error enum for all Giftswap operations.
#[derive(Debug, Error)]
pub enum GiftswapError {
    // =================================================================
    // Registry / Signup Errors (1xx)
    // =================================================================
    /// No participant with this id is registered.
    #[error("GS_ERR_100: Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// A participant with this id already signed up.
    #[error("GS_ERR_101: Participant already registered: {0}")]
    DuplicateParticipant(ParticipantId),

    /// Signup request failed validation.
    #[error("GS_ERR_102: Invalid signup: {reason}")]
    InvalidSignup { reason: String },

    // =================================================================
    // Pairing Errors (2xx)
    // =================================================================
    /// A round needs at least two participants.
    #[error("GS_ERR_200: Insufficient participants: need at least 2, have {count}")]
    InsufficientParticipants { count: usize },

    /// A computed assignment is not a derangement. Never retried.
    #[error("GS_ERR_201: Assignment integrity violation: {reason}")]
    AssignmentIntegrity { reason: String },

    // =================================================================
    // Custody Intake Errors (3xx)
    // =================================================================
    /// An observed item cannot be fingerprinted.
    #[error("GS_ERR_300: Invalid item observation: {reason}")]
    InvalidObservation { reason: String },

    /// The offer asks for items or offers none; only pure gifts are taken.
    #[error("GS_ERR_301: Offer is not gift-only: {give} to give, {receive} to receive")]
    NotGiftOnly { give: usize, receive: usize },

    /// No participant sends from this custody-side account.
    #[error("GS_ERR_302: Unknown sender account: {0}")]
    UnknownSender(AccountId),

    // =================================================================
    // Inventory Errors (4xx)
    // =================================================================
    /// Snapshot fetch failed; abort the run and retry later.
    #[error("GS_ERR_400: Transient inventory fetch failure: {reason}")]
    TransientFetch { reason: String },

    // =================================================================
    // Redistribution Errors (5xx)
    // =================================================================
    /// Another redistribution run is already in flight.
    #[error("GS_ERR_500: Redistribution already in progress")]
    RedistributionInProgress,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("GS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("GS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("GS_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("GS_ERR_903: I/O error: {0}")]
    Io(String),
}

impl GiftswapError {
    /// Whether the same operation may succeed if retried later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransientFetch { .. } | Self::RedistributionInProgress | Self::Io(_)
        )
    }

    /// Whether this error signals a broken internal invariant.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AssignmentIntegrity { .. } | Self::Internal(_))
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, GiftswapError>;

impl From<std::io::Error> for GiftswapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GiftswapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
