//! # giftswap-custody
//!
//! **Custody intake plane**: everything that happens before gifts are
//! redistributed.
//!
//! 1. **Signup**: validates trade links and interests, derives the sender account
//! 2. **Offer intake**: accepts gift-only offers and attributes them to a participant
//! 3. **Fingerprinting**: derives a durable identity from each observed item
//! 4. **Ledger**: appends fingerprints to the sender's custody ledger
//!
//! ```text
//! IncomingOffer → offer::accept() → fingerprint::extract() → ledger::append()
//! ```

pub mod fingerprint;
pub mod ledger;
pub mod offer;
pub mod signup;

pub use fingerprint::{ObservedItem, extract};
pub use ledger::LedgerStats;
pub use offer::{AcceptedGift, IncomingOffer};
pub use signup::{SignupPolicy, SignupRequest};
