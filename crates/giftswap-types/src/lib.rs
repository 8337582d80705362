//! # giftswap-types
//!
//! Shared types, errors, and configuration for the **Giftswap** exchange.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`AccountId`], [`AssetHandle`], [`RunId`], [`TransferId`]
//! - **Participant model**: [`Participant`], [`RecipientBrief`]
//! - **Item identity**: [`ItemFingerprint`]
//! - **Inventory model**: [`InventorySnapshot`], [`AssetRecord`], [`DescriptionRecord`],
//!   [`ContextScope`]
//! - **Provider wire format**: [`WireInventory`]
//! - **Run model**: [`RunPhase`], [`RunReport`], [`RunSummary`], [`StatusReport`]
//! - **Transfers**: [`TransferRequest`], [`RunIssue`]
//! - **Configuration**: [`ExchangeConfig`], [`PairingStrategy`]
//! - **Errors**: [`GiftswapError`] with `GS_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod fingerprint;
pub mod ids;
pub mod inventory;
pub mod participant;
pub mod run;
pub mod transfer;
pub mod wire;

// Re-export all primary types at crate root for ergonomic imports:
//   use giftswap_types::{Participant, ItemFingerprint, InventorySnapshot, ...};

pub use config::*;
pub use error::*;
pub use fingerprint::*;
pub use ids::*;
pub use inventory::*;
pub use participant::*;
pub use run::*;
pub use transfer::*;
pub use wire::*;

// Constants are accessed via `giftswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
