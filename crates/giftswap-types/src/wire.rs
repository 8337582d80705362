//! Custody provider wire format.
//!
//! The provider returns an inventory page as two parallel arrays: `assets`
//! (one entry per held item, numeric ids encoded as strings) and
//! `descriptions` (one entry per catalog class/instance).

use serde::{Deserialize, Serialize};

use crate::{
    AssetRecord, ContextScope, DescriptionRecord, GiftswapError, InventorySnapshot, Result,
};

/// One inventory page as served by the custody provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireInventory {
    #[serde(default)]
    pub assets: Vec<WireAsset>,
    #[serde(default)]
    pub descriptions: Vec<WireDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAsset {
    pub appid: u32,
    pub contextid: String,
    pub assetid: String,
    pub classid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instanceid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireDescription {
    pub classid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instanceid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_hash_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paintseed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paintwear: Option<f64>,
}

impl From<WireDescription> for DescriptionRecord {
    fn from(wire: WireDescription) -> Self {
        Self {
            class_identifier: wire.classid,
            instance_identifier: wire.instanceid,
            display_name: wire.market_hash_name,
            pattern_index: wire.pattern_index.or(wire.paintseed),
            wear_float: wire.float_value.or(wire.paintwear),
        }
    }
}

impl InventorySnapshot {
    /// Convert a provider page into a snapshot, keeping the native order.
    ///
    /// # Errors
    /// Returns [`GiftswapError::Serialization`] if a `contextid` is not a
    /// decimal integer.
    pub fn from_wire(wire: WireInventory) -> Result<Self> {
        let assets = wire
            .assets
            .into_iter()
            .map(|a| {
                let context_id = a.contextid.parse::<u64>().map_err(|e| {
                    GiftswapError::Serialization(format!(
                        "asset {} has invalid contextid {:?}: {e}",
                        a.assetid, a.contextid
                    ))
                })?;
                Ok(AssetRecord {
                    ephemeral_handle: crate::AssetHandle(a.assetid),
                    class_identifier: a.classid,
                    instance_identifier: a.instanceid,
                    context_scope: ContextScope::new(a.appid, context_id),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let descriptions = wire.descriptions.into_iter().map(Into::into).collect();
        Ok(Self::new(assets, descriptions))
    }

    /// Parse a provider JSON page.
    pub fn from_wire_json(json: &str) -> Result<Self> {
        let wire: WireInventory = serde_json::from_str(json)?;
        Self::from_wire(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "assets": [
            {"appid": 730, "contextid": "2", "assetid": "35021",
             "classid": "310776560", "instanceid": "302028390", "amount": "1"},
            {"appid": 730, "contextid": "2", "assetid": "35022", "classid": "469467368"}
        ],
        "descriptions": [
            {"classid": "310776560", "instanceid": "302028390",
             "market_hash_name": "AK-47 | Redline (Field-Tested)",
             "paintseed": 661, "paintwear": 0.1532},
            {"classid": "469467368", "market_hash_name": "Sticker | Katowice 2019",
             "pattern_index": 3, "paintseed": 9}
        ],
        "total_inventory_count": 2
    }"#;

    #[test]
    fn parses_provider_page() {
        let snap = InventorySnapshot::from_wire_json(PAGE).unwrap();
        assert_eq!(snap.len(), 2);
        let first = &snap.assets()[0];
        assert_eq!(first.ephemeral_handle.0, "35021");
        assert_eq!(first.context_scope, ContextScope::new(730, 2));
        assert_eq!(first.instance_identifier.as_deref(), Some("302028390"));
        assert!(snap.assets()[1].instance_identifier.is_none());

        let desc = snap.description("310776560", Some("302028390")).unwrap();
        assert_eq!(desc.pattern_index, Some(661));
        assert_eq!(desc.wear_float, Some(0.1532));
    }

    #[test]
    fn primary_pattern_attribute_wins_over_seed() {
        let snap = InventorySnapshot::from_wire_json(PAGE).unwrap();
        let desc = snap.description("469467368", None).unwrap();
        assert_eq!(desc.pattern_index, Some(3));
        assert!(desc.wear_float.is_none());
    }

    #[test]
    fn bad_context_id_rejected() {
        let json = r#"{"assets":[{"appid":730,"contextid":"two","assetid":"1","classid":"X"}]}"#;
        let err = InventorySnapshot::from_wire_json(json).unwrap_err();
        assert!(matches!(err, GiftswapError::Serialization(_)));
    }

    #[test]
    fn empty_page() {
        let snap = InventorySnapshot::from_wire_json("{}").unwrap();
        assert!(snap.is_empty());
    }
}
