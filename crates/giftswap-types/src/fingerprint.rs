//! Durable item identity.
//!
//! Custody handles are reissued on every transfer, so an item received
//! weeks ago is re-identified by the attributes intrinsic to the goods.
//! Every optional attribute is either present or absent; absence relaxes
//! matching, so it must never be written back as a null or zero value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity tuple of a received item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFingerprint {
    /// Catalog class. Always present.
    pub class_identifier: String,
    /// Catalog instance (variant) within the class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    /// Human-readable market name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Pattern / paint seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_index: Option<u32>,
    /// Wear value in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wear_float: Option<f64>,
}

impl ItemFingerprint {
    /// Fingerprint carrying only the catalog class.
    #[must_use]
    pub fn class_only(class_identifier: impl Into<String>) -> Self {
        Self {
            class_identifier: class_identifier.into(),
            instance_identifier: None,
            display_name: None,
            pattern_index: None,
            wear_float: None,
        }
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance_identifier = Some(instance.into());
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_pattern_index(mut self, pattern: u32) -> Self {
        self.pattern_index = Some(pattern);
        self
    }

    #[must_use]
    pub fn with_wear_float(mut self, wear: f64) -> Self {
        self.wear_float = Some(wear);
        self
    }

    /// True when none of the description-level attributes are specified.
    /// Such a fingerprint matches any asset of its class.
    #[must_use]
    pub fn has_description_attributes(&self) -> bool {
        self.display_name.is_some() || self.pattern_index.is_some() || self.wear_float.is_some()
    }
}

impl fmt::Display for ItemFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_identifier)?;
        if let Some(instance) = &self.instance_identifier {
            write!(f, "/{instance}")?;
        }
        if let Some(name) = &self.display_name {
            write!(f, " \"{name}\"")?;
        }
        if let Some(pattern) = self.pattern_index {
            write!(f, " #{pattern}")?;
        }
        if let Some(wear) = self.wear_float {
            write!(f, " wear={wear}")?;
        }
        Ok(())
    }
}

/// Dummy fingerprints for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl ItemFingerprint {
    /// A fully specified fingerprint of the given class.
    pub fn dummy(class_identifier: &str) -> Self {
        Self::class_only(class_identifier)
            .with_instance("188530139")
            .with_display_name(format!("{class_identifier} (Field-Tested)"))
            .with_pattern_index(661)
            .with_wear_float(0.1532)
    }
}
