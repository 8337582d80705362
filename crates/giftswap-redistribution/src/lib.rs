//! # giftswap-redistribution
//!
//! **Redistribution plane for Giftswap.**
//!
//! Gifts sit in a shared custody account until an admin triggers a run.
//! A run fetches one fresh inventory snapshot, re-identifies every ledger
//! item inside it, and emits one transfer request per giver addressed to
//! that giver's assigned recipient.
//!
//! ```text
//! IDLE → FETCHING_SNAPSHOT → RESOLVING → EMITTING → IDLE
//! ```
//!
//! - [`GiftExchange`]: the service, single-flight runs plus signup, rolls,
//!   intake and admin resets
//! - [`redistribute`]: the pure planner behind a run
//! - [`ParticipantRegistry`] / [`InventorySource`]: collaborator seams
//! - [`InMemoryRegistry`] / [`JsonFileRegistry`]: registry backends
//!
//! Issuing the transfers is the caller's job; a run only plans them.

pub mod collaborators;
pub mod exchange;
pub mod planner;
pub mod registry;
pub mod telemetry;

pub use collaborators::{InventorySource, ParticipantRegistry, StaticInventory};
pub use exchange::{GiftExchange, ReceiptOutcome};
pub use planner::{RedistributionPlan, redistribute};
pub use registry::{InMemoryRegistry, JsonFileRegistry};
pub use telemetry::{LogFormat, init_tracing};
