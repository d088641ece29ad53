//! Property-based tests for snapshot decoding.
//!
//! Whatever the backend sends, decoding a list of members must never fail or
//! panic, and every member entry with a name must survive.

use gimsync_core::{Container, MemberName, decode_group_update};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// Arbitrary JSON values, a few levels deep.
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9_]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,6}", inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Keys the decoder understands, so fuzzed values actually reach decoders.
fn known_key() -> impl Strategy<Value = String> {
    let mut keys: Vec<String> = Container::ALL.iter().map(|c| c.key().to_string()).collect();
    keys.extend(
        [
            "last_updated",
            "coordinates",
            "interacting",
            "stats",
            "skills",
            "quests",
            "diaries",
            "collection_log",
        ]
        .map(String::from),
    );
    prop::sample::select(keys)
}

fn member_strategy() -> impl Strategy<Value = (String, Value)> {
    (
        "[A-Za-z]{1,8}",
        prop::collection::vec((known_key(), json_strategy()), 0..8),
    )
        .prop_map(|(name, fields)| {
            let mut object: Map<String, Value> = fields.into_iter().collect();
            object.insert("name".to_string(), Value::String(name.clone()));
            (name, Value::Object(object))
        })
}

proptest! {
    #[test]
    fn prop_member_lists_always_decode(members in prop::collection::vec(member_strategy(), 0..6)) {
        let names: std::collections::BTreeSet<_> = members.iter().map(|(n, _)| n.clone()).collect();
        let root = Value::Array(members.into_iter().map(|(_, v)| v).collect());

        let update = decode_group_update(&root);
        prop_assert!(update.is_ok());

        let update = update.unwrap_or_default();
        for name in names {
            prop_assert!(update.contains_key(&MemberName::new(name)));
        }
    }

    #[test]
    fn prop_decoded_containers_have_no_empty_stacks(
        members in prop::collection::vec(member_strategy(), 0..6),
    ) {
        let root = Value::Array(members.into_iter().map(|(_, v)| v).collect());
        let update = decode_group_update(&root).unwrap_or_default();

        for partial in update.values() {
            let keyed = [&partial.bank, &partial.quiver, &partial.rune_pouch];
            for bank in keyed.into_iter().flatten() {
                prop_assert!(bank.values().all(|stack| stack.quantity > 0));
            }
        }
    }

    #[test]
    fn prop_arbitrary_roots_never_panic(root in json_strategy()) {
        let result = decode_group_update(&root);
        prop_assert_eq!(result.is_err(), !(root.is_array() || root.is_object()));
    }
}
