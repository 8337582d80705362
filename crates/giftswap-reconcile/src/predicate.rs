//! Per-candidate matching predicates.
//!
//! A fingerprint matches a candidate asset when the class and scope agree,
//! the instance agrees (if the fingerprint names one), and every
//! description attribute the fingerprint specifies agrees with the
//! candidate's resolved description. Partial agreement is rejection.

use giftswap_types::{
    AssetRecord, ContextScope, DescriptionRecord, InventorySnapshot, ItemFingerprint, constants,
};

/// Class and scope filter. Consumption is tracked by the caller.
#[must_use]
pub fn class_and_scope_match(
    fingerprint: &ItemFingerprint,
    asset: &AssetRecord,
    scope: ContextScope,
) -> bool {
    asset.class_identifier == fingerprint.class_identifier && asset.context_scope == scope
}

/// Instance filter. A candidate without an instance compares as the
/// canonical "none" value.
#[must_use]
pub fn instance_match(fingerprint: &ItemFingerprint, asset: &AssetRecord) -> bool {
    fingerprint
        .instance_identifier
        .as_deref()
        .is_none_or(|wanted| asset.instance_or_none() == wanted)
}

/// Description for a candidate: exact (class, instance), then
/// (class, none), then any description of the class.
#[must_use]
pub fn resolve_description<'s>(
    snapshot: &'s InventorySnapshot,
    asset: &AssetRecord,
) -> Option<&'s DescriptionRecord> {
    snapshot
        .description(&asset.class_identifier, Some(asset.instance_or_none()))
        .or_else(|| snapshot.description(&asset.class_identifier, None))
        .or_else(|| snapshot.any_description_for_class(&asset.class_identifier))
}

/// Whether two wear values denote the same item.
#[must_use]
pub fn wear_matches(expected: f64, observed: f64) -> bool {
    (expected - observed).abs() <= constants::WEAR_FLOAT_TOLERANCE
}

/// Every description attribute the fingerprint specifies must match.
///
/// A fingerprint with no description attributes matches regardless of
/// whether a description resolved.
#[must_use]
pub fn attributes_match(
    fingerprint: &ItemFingerprint,
    description: Option<&DescriptionRecord>,
) -> bool {
    if !fingerprint.has_description_attributes() {
        return true;
    }
    let Some(desc) = description else {
        return false;
    };

    let name_ok = fingerprint
        .display_name
        .as_deref()
        .is_none_or(|name| desc.display_name.as_deref() == Some(name));
    let pattern_ok = fingerprint
        .pattern_index
        .is_none_or(|pattern| desc.pattern_index == Some(pattern));
    let wear_ok = fingerprint
        .wear_float
        .is_none_or(|wear| desc.wear_float.is_some_and(|w| wear_matches(wear, w)));

    name_ok && pattern_ok && wear_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> ContextScope {
        ContextScope::default()
    }

    #[test]
    fn scope_must_match() {
        let fp = ItemFingerprint::class_only("X");
        let here = AssetRecord::new("1", "X", scope());
        let elsewhere = AssetRecord::new("2", "X", ContextScope::new(440, 2));
        assert!(class_and_scope_match(&fp, &here, scope()));
        assert!(!class_and_scope_match(&fp, &elsewhere, scope()));
        assert!(!class_and_scope_match(&ItemFingerprint::class_only("Y"), &here, scope()));
    }

    #[test]
    fn instance_none_is_canonical_zero() {
        let bare = AssetRecord::new("1", "X", scope());
        let seven = AssetRecord::new("2", "X", scope()).with_instance("7");
        let any = ItemFingerprint::class_only("X");
        let zero = ItemFingerprint::class_only("X").with_instance("0");
        let want_seven = ItemFingerprint::class_only("X").with_instance("7");

        assert!(instance_match(&any, &bare));
        assert!(instance_match(&any, &seven));
        assert!(instance_match(&zero, &bare));
        assert!(!instance_match(&zero, &seven));
        assert!(instance_match(&want_seven, &seven));
        assert!(!instance_match(&want_seven, &bare));
    }

    #[test]
    fn description_fallback_chain() {
        let snap = InventorySnapshot::new(
            vec![],
            vec![
                DescriptionRecord::new("A").with_instance("5").with_pattern_index(5),
                DescriptionRecord::new("B").with_pattern_index(0),
                DescriptionRecord::new("C").with_instance("9").with_pattern_index(9),
            ],
        );
        let exact = AssetRecord::new("1", "A", scope()).with_instance("5");
        assert_eq!(resolve_description(&snap, &exact).unwrap().pattern_index, Some(5));

        let to_none = AssetRecord::new("2", "B", scope()).with_instance("3");
        assert_eq!(resolve_description(&snap, &to_none).unwrap().pattern_index, Some(0));

        let to_class = AssetRecord::new("3", "C", scope()).with_instance("1");
        assert_eq!(resolve_description(&snap, &to_class).unwrap().pattern_index, Some(9));

        let nothing = AssetRecord::new("4", "D", scope());
        assert!(resolve_description(&snap, &nothing).is_none());
    }

    #[test]
    fn wear_tolerance() {
        assert!(wear_matches(0.1532, 0.153_200_001));
        assert!(wear_matches(0.1532, 0.1532 + 1e-7));
        assert!(!wear_matches(0.1532, 0.1532 + 1e-4));
    }

    #[test]
    fn bare_fingerprint_ignores_description() {
        let fp = ItemFingerprint::class_only("X").with_instance("1");
        assert!(attributes_match(&fp, None));
        let desc = DescriptionRecord::new("X").with_pattern_index(8);
        assert!(attributes_match(&fp, Some(&desc)));
    }

    #[test]
    fn specified_attributes_need_a_description() {
        let fp = ItemFingerprint::class_only("X").with_pattern_index(7);
        assert!(!attributes_match(&fp, None));
    }

    #[test]
    fn partial_agreement_rejected() {
        let desc = DescriptionRecord::new("X")
            .with_display_name("AK-47 | Redline (FT)")
            .with_pattern_index(661)
            .with_wear_float(0.1532);
        let all = ItemFingerprint::class_only("X")
            .with_display_name("AK-47 | Redline (FT)")
            .with_pattern_index(661)
            .with_wear_float(0.153_200_000_4);
        assert!(attributes_match(&all, Some(&desc)));

        let wrong_pattern = all.clone().with_pattern_index(662);
        assert!(!attributes_match(&wrong_pattern, Some(&desc)));

        let wrong_name = all.clone().with_display_name("AK-47 | Redline (MW)");
        assert!(!attributes_match(&wrong_name, Some(&desc)));
    }

    #[test]
    fn attribute_absent_from_description_rejects() {
        let desc = DescriptionRecord::new("X").with_pattern_index(1);
        let fp = ItemFingerprint::class_only("X").with_wear_float(0.5);
        assert!(!attributes_match(&fp, Some(&desc)));
    }
}
