//! Custody inventory snapshot model.
//!
//! A snapshot is a point-in-time enumeration of the custody account. It
//! is fetched fresh for each redistribution run and discarded afterwards;
//! its handles become invalid after the next transfer.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{AssetHandle, constants};

/// The (application, context) pair an inventory is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextScope {
    pub app_id: u32,
    pub context_id: u64,
}

impl ContextScope {
    #[must_use]
    pub fn new(app_id: u32, context_id: u64) -> Self {
        Self { app_id, context_id }
    }
}

impl Default for ContextScope {
    fn default() -> Self {
        Self::new(constants::DEFAULT_APP_ID, constants::DEFAULT_CONTEXT_ID)
    }
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_id, self.context_id)
    }
}

/// One concrete, transferable item held in custody.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub ephemeral_handle: AssetHandle,
    pub class_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    pub context_scope: ContextScope,
}

impl AssetRecord {
    #[must_use]
    pub fn new(
        handle: impl Into<String>,
        class_identifier: impl Into<String>,
        context_scope: ContextScope,
    ) -> Self {
        Self {
            ephemeral_handle: AssetHandle::new(handle),
            class_identifier: class_identifier.into(),
            instance_identifier: None,
            context_scope,
        }
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance_identifier = Some(instance.into());
        self
    }

    /// Instance id, with a missing one read as the canonical "none" value.
    #[must_use]
    pub fn instance_or_none(&self) -> &str {
        self.instance_identifier
            .as_deref()
            .unwrap_or(constants::NO_INSTANCE)
    }
}

/// Catalog description shared by every asset of a (class, instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRecord {
    pub class_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wear_float: Option<f64>,
}

impl DescriptionRecord {
    #[must_use]
    pub fn new(class_identifier: impl Into<String>) -> Self {
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

    fn instance_or_none(&self) -> &str {
        self.instance_identifier
            .as_deref()
            .unwrap_or(constants::NO_INSTANCE)
    }
}

/// Point-in-time view of the custody account.
///
/// Assets keep the provider's native order, which is the tie-break order
/// among indistinguishable items. Descriptions are indexed by
/// (class, instance); the first description for a key wins.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    assets: Vec<AssetRecord>,
    descriptions: Vec<DescriptionRecord>,
    by_key: HashMap<(String, String), usize>,
    by_class: HashMap<String, usize>,
}

impl InventorySnapshot {
    #[must_use]
    pub fn new(assets: Vec<AssetRecord>, descriptions: Vec<DescriptionRecord>) -> Self {
        let mut by_key = HashMap::with_capacity(descriptions.len());
        let mut by_class = HashMap::with_capacity(descriptions.len());
        for (idx, desc) in descriptions.iter().enumerate() {
            by_key
                .entry((
                    desc.class_identifier.clone(),
                    desc.instance_or_none().to_string(),
                ))
                .or_insert(idx);
            by_class.entry(desc.class_identifier.clone()).or_insert(idx);
        }
        Self {
            assets,
            descriptions,
            by_key,
            by_class,
        }
    }

    /// Assets in the provider's native order.
    #[must_use]
    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    /// Exact (class, instance) description lookup. A `None` instance reads
    /// as the canonical "none" value.
    #[must_use]
    pub fn description(&self, class: &str, instance: Option<&str>) -> Option<&DescriptionRecord> {
        let key = (
            class.to_string(),
            instance.unwrap_or(constants::NO_INSTANCE).to_string(),
        );
        self.by_key.get(&key).map(|&idx| &self.descriptions[idx])
    }

    /// First description in native order sharing `class`.
    #[must_use]
    pub fn any_description_for_class(&self, class: &str) -> Option<&DescriptionRecord> {
        self.by_class.get(class).map(|&idx| &self.descriptions[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> ContextScope {
        ContextScope::default()
    }

    #[test]
    fn default_scope() {
        assert_eq!(scope(), ContextScope::new(730, 2));
        assert_eq!(format!("{}", scope()), "730/2");
    }

    #[test]
    fn missing_instance_reads_as_none_value() {
        let asset = AssetRecord::new("1", "X", scope());
        assert_eq!(asset.instance_or_none(), "0");
        let asset = asset.with_instance("42");
        assert_eq!(asset.instance_or_none(), "42");
    }

    #[test]
    fn description_lookup_uses_canonical_none() {
        let snap = InventorySnapshot::new(
            vec![],
            vec![
                DescriptionRecord::new("X").with_display_name("plain"),
                DescriptionRecord::new("X").with_instance("7").with_display_name("seven"),
            ],
        );
        assert_eq!(
            snap.description("X", None).unwrap().display_name.as_deref(),
            Some("plain")
        );
        assert_eq!(
            snap.description("X", Some("0")).unwrap().display_name.as_deref(),
            Some("plain")
        );
        assert_eq!(
            snap.description("X", Some("7")).unwrap().display_name.as_deref(),
            Some("seven")
        );
        assert!(snap.description("X", Some("8")).is_none());
        assert!(snap.description("Y", None).is_none());
    }

    #[test]
    fn first_description_wins() {
        let snap = InventorySnapshot::new(
            vec![],
            vec![
                DescriptionRecord::new("X").with_instance("1").with_pattern_index(1),
                DescriptionRecord::new("X").with_instance("1").with_pattern_index(2),
            ],
        );
        assert_eq!(snap.description("X", Some("1")).unwrap().pattern_index, Some(1));
        assert_eq!(snap.any_description_for_class("X").unwrap().pattern_index, Some(1));
    }

    #[test]
    fn assets_keep_native_order() {
        let snap = InventorySnapshot::new(
            vec![
                AssetRecord::new("b", "X", scope()),
                AssetRecord::new("a", "X", scope()),
            ],
            vec![],
        );
        let handles: Vec<_> = snap.assets().iter().map(|a| a.ephemeral_handle.0.as_str()).collect();
        assert_eq!(handles, ["b", "a"]);
        assert_eq!(snap.len(), 2);
        assert!(!snap.is_empty());
    }
}
