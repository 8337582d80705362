//! # giftswap-pairing
//!
//! **Pairing engine for Giftswap.**
//!
//! Turns a participant-id set into a derangement: every participant gives
//! to exactly one other participant and receives from exactly one. The
//! engine is pure and synchronous; randomness is injected by the caller.
//!
//! - [`PairingEngine`]: strategy-driven assignment with a verification fuse
//! - [`Assignment`]: the round-scoped giver → recipient mapping
//! - [`apply_assignment`]: re-roll semantics over participant records

pub mod assignment;
pub mod engine;
pub mod round;

pub use assignment::Assignment;
pub use engine::{PairingEngine, circular_shift, rejection_sample};
pub use round::{apply_assignment, current_assignment};
