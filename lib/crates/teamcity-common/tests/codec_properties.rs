//! Property-based tests for the parameter name codec and collection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use teamcity_common::{Parameter, ParameterCollection, ParameterKind, decode, encode};

fn kind() -> impl Strategy<Value = ParameterKind> {
    prop_oneof![
        Just(ParameterKind::Configuration),
        Just(ParameterKind::System),
        Just(ParameterKind::EnvironmentVariable),
    ]
}

/// Any non-empty name, bare prefixes included.
fn any_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("system.".to_string()),
        Just("env.".to_string()),
        Just("system.env.".to_string()),
        "[a-z.]{1,16}",
    ]
}

/// Names that never start with a kind prefix.
fn plain_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_.]{0,24}".prop_filter("prefixed name", |n| {
        !n.starts_with("system.") && !n.starts_with("env.")
    })
}

proptest! {
    /// Encode then decode restores kind, name and value below the ambiguity
    /// boundary.
    #[test]
    fn prop_decode_inverts_encode(kind in kind(), name in plain_name(), value in ".{0,32}") {
        let original = Parameter::new(kind, name.clone(), value.clone()).unwrap();
        let property = original.property();
        let decoded = decode(&property.name, property.value).unwrap();
        prop_assert_eq!(decoded.kind(), kind);
        prop_assert_eq!(decoded.name(), name.as_str());
        prop_assert_eq!(decoded.value(), value.as_str());
    }

    /// Value always survives, whatever the name.
    #[test]
    fn prop_value_always_survives(kind in kind(), name in any_name(), value in ".{0,32}") {
        let original = Parameter::new(kind, name, value.clone()).unwrap();
        let property = original.property();
        let decoded = decode(&property.name, property.value).unwrap();
        prop_assert_eq!(decoded.value(), value.as_str());
        prop_assert_eq!(decoded.encoded_name(), original.encoded_name());
    }

    /// Equal `(kind, name)` pairs always encode identically.
    #[test]
    fn prop_encode_is_deterministic(kind in kind(), name in "[a-z]{1,16}") {
        prop_assert_eq!(encode(kind, &name), encode(kind, &name));
        prop_assert!(encode(kind, &name).ends_with(&name));
    }

    /// Replacing keeps the length and the first-insert position; `count`
    /// tracks the property list.
    #[test]
    fn prop_replace_keeps_position(
        entries in prop::collection::vec((kind(), "[a-z]{1,6}", "[a-z]{0,6}"), 1..20),
        pick in any::<prop::sample::Index>(),
        new_value in "[a-z]{0,6}",
    ) {
        let mut collection = ParameterCollection::new();
        for (kind, name, value) in &entries {
            collection.add_or_replace(*kind, name.clone(), value.clone()).unwrap();
        }
        let before: Vec<String> = collection.iter().map(Parameter::encoded_name).collect();

        let (kind, name, _) = &entries[pick.index(entries.len())];
        collection.add_or_replace(*kind, name.clone(), new_value.clone()).unwrap();

        let after: Vec<String> = collection.iter().map(Parameter::encoded_name).collect();
        prop_assert_eq!(&before, &after);
        prop_assert_eq!(collection.get(*kind, name).unwrap().value(), new_value.as_str());

        let json: serde_json::Value = serde_json::from_str(&collection.to_json().unwrap()).unwrap();
        let listed = json["property"].as_array().unwrap().len();
        prop_assert_eq!(json["count"].as_u64().unwrap(), listed as u64);
        prop_assert_eq!(listed, collection.len());
    }

    /// Reading back a serialized collection reproduces it.
    #[test]
    fn prop_collection_reads_back(
        entries in prop::collection::vec((kind(), plain_name(), "[a-z]{0,6}"), 0..12),
    ) {
        let collection: ParameterCollection = entries
            .into_iter()
            .map(|(kind, name, value)| Parameter::new(kind, name, value).unwrap())
            .collect();
        let json = collection.to_json().unwrap();
        let back = ParameterCollection::from_json(json.as_bytes()).unwrap();
        prop_assert_eq!(back, collection);
    }

    /// Whatever the names, a serialized collection reads back with the same
    /// stored names and values.
    #[test]
    fn prop_any_collection_reads_back(
        entries in prop::collection::vec((kind(), any_name(), "[a-z]{0,6}"), 0..12),
    ) {
        let collection: ParameterCollection = entries
            .into_iter()
            .map(|(kind, name, value)| Parameter::new(kind, name, value).unwrap())
            .collect();
        let json = collection.to_json().unwrap();
        let back = ParameterCollection::from_json(json.as_bytes()).unwrap();
        prop_assert_eq!(back.len(), collection.len());
        prop_assert_eq!(back.properties(), collection.properties());
    }
}
