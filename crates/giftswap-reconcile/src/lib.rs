//! # giftswap-reconcile
//!
//! **Inventory reconciliation for Giftswap.**
//!
//! Custody handles are reissued on every transfer, so items recorded in a
//! ledger are re-identified inside a fresh snapshot by their durable
//! fingerprints. This crate is pure: no I/O, no shared state.
//!
//! - **No double-claiming**: a consumed-handle set spans every resolution
//!   made through one [`Reconciler`]
//! - **No substitution**: every attribute a fingerprint specifies must match
//! - **No aborts**: unmatched fingerprints are reported, the batch goes on

pub mod digest;
pub mod predicate;
pub mod reconciler;

pub use digest::{compute_snapshot_digest, snapshot_digest_hex};
pub use reconciler::{Reconciler, Resolution, resolve};
