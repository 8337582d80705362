//! Item fingerprint extraction.
//!
//! An [`ObservedItem`] is whatever the custody provider exposed about an
//! item at the moment it arrived. Extraction copies the class (mandatory)
//! and only those optional attributes the observation actually carries.
//! Nothing is ever defaulted: an attribute the provider did not expose
//! stays absent in the fingerprint.

use giftswap_types::{GiftswapError, ItemFingerprint, Result};
use serde::{Deserialize, Serialize};

/// Item as observed in an incoming offer. Field names follow the
/// provider's wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedItem {
    /// Ephemeral handle at the time of observation. Not part of the
    /// fingerprint; kept for logging only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assetid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instanceid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_hash_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_index: Option<u32>,
    /// Alternate name for the pattern attribute on older payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paintseed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f64>,
    /// Alternate name for the wear attribute on older payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paintwear: Option<f64>,
}

impl ObservedItem {
    /// Observation exposing only a class id.
    #[must_use]
    pub fn with_class(classid: impl Into<String>) -> Self {
        Self {
            classid: Some(classid.into()),
            ..Self::default()
        }
    }
}

/// Derive the durable identity of an observed item.
///
/// # Errors
/// Returns [`GiftswapError::InvalidObservation`] if the class id is
/// missing or blank, or the wear value is not a finite number in
/// `0.0..=1.0`.
pub fn extract(observed: &ObservedItem) -> Result<ItemFingerprint> {
    let class = observed
        .classid
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| GiftswapError::InvalidObservation {
            reason: format!(
                "item {} has no class id",
                observed.assetid.as_deref().unwrap_or("?")
            ),
        })?;

    let wear_float = observed.float_value.or(observed.paintwear);
    if let Some(wear) = wear_float {
        if !wear.is_finite() || !(0.0..=1.0).contains(&wear) {
            return Err(GiftswapError::InvalidObservation {
                reason: format!("wear {wear} of class {class} is outside 0..=1"),
            });
        }
    }

    Ok(ItemFingerprint {
        class_identifier: class.to_string(),
        instance_identifier: observed.instanceid.clone(),
        display_name: observed.market_hash_name.clone(),
        pattern_index: observed.pattern_index.or(observed.paintseed),
        wear_float,
    })
}
