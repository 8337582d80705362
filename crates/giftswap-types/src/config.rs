//! Configuration for a Giftswap exchange.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ContextScope, GiftswapError, Result, constants};

/// How a pairing round turns a participant set into a derangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Shuffle once and give to the next id in the ring. Always a single
    /// n-cycle.
    CircularShift,
    /// Redraw uniform permutations until one has no fixed point, then fall
    /// back to a circular shift after `max_attempts` draws.
    RejectionSampling { max_attempts: u32 },
}

impl Default for PairingStrategy {
    fn default() -> Self {
        Self::RejectionSampling {
            max_attempts: constants::DEFAULT_MAX_PAIRING_ATTEMPTS,
        }
    }
}

/// Exchange-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Inventory scope gifts are held and redistributed in.
    pub scope: ContextScope,
    pub pairing: PairingStrategy,
    /// Minimum declared interests for a signup.
    pub min_interests: usize,
    /// Participants file used by the JSON registry.
    pub participants_path: PathBuf,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            scope: ContextScope::default(),
            pairing: PairingStrategy::default(),
            min_interests: constants::DEFAULT_MIN_INTERESTS,
            participants_path: PathBuf::from(constants::DEFAULT_PARTICIPANTS_PATH),
        }
    }
}

impl ExchangeConfig {
    /// Reject settings the engines cannot honour.
    pub fn validate(&self) -> Result<()> {
        if let PairingStrategy::RejectionSampling { max_attempts: 0 } = self.pairing {
            return Err(GiftswapError::Configuration(
                "rejection sampling needs max_attempts > 0".to_string(),
            ));
        }
        if self.participants_path.as_os_str().is_empty() {
            return Err(GiftswapError::Configuration(
                "participants_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| GiftswapError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }
}
