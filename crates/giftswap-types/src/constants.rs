//! System-wide constants for the Giftswap exchange.

/// Maximum absolute difference between two wear floats that still counts
/// as the same item. Only absorbs floating-point noise from re-serialisation.
pub const WEAR_FLOAT_TOLERANCE: f64 = 1e-6;

/// Canonical instance identifier for assets that carry none.
pub const NO_INSTANCE: &str = "0";

/// Default cap on rejection-sampling draws before falling back to a
/// circular shift. With P(derangement) ~ 1/e, 64 draws fail with
/// probability below 1e-12.
pub const DEFAULT_MAX_PAIRING_ATTEMPTS: u32 = 64;

/// Minimum number of participants for a pairing round.
pub const MIN_PARTICIPANTS: usize = 2;

/// Default minimum number of interests a signup must declare.
pub const DEFAULT_MIN_INTERESTS: usize = 3;

/// Default custody inventory application (CS2).
pub const DEFAULT_APP_ID: u32 = 730;

/// Default custody inventory context within the application.
pub const DEFAULT_CONTEXT_ID: u64 = 2;

/// Default participants file for the JSON registry.
pub const DEFAULT_PARTICIPANTS_PATH: &str = "participants.json";

/// SteamID64 individual-account prefix: universe 1, type 1, instance 1.
pub const STEAM_ID64_BASE: u64 = (1 << 56) | (1 << 52) | (1 << 32);

/// Query parameter carrying the 32-bit account number in a trade link.
pub const TRADE_LINK_PARTNER_PARAM: &str = "partner=";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Giftswap";
