//! ConfigMap JSON boundary tests
//!
//! The stored JSON must read back as exactly the map that was written, and
//! anything that is not a flat object of strings must be refused at the
//! boundary rather than half-decoded.

use envcfg_core::errors::RecordError;
use envcfg_core::ConfigMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

proptest! {
    #[test]
    fn stored_json_reads_back_as_same_map(
        entries in prop::collection::btree_map("[A-Z_]{1,12}", ".{0,24}", 0..16)
    ) {
        let map = ConfigMap::from(entries.clone());
        let text = map.to_json().unwrap();
        let back = ConfigMap::parse_json(&text).unwrap();
        prop_assert_eq!(BTreeMap::from(back), entries);
    }
}

#[test]
fn test_key_order_in_text_does_not_matter() {
    let a = ConfigMap::parse_json(r#"{"B":"2","A":"1"}"#).unwrap();
    let b = ConfigMap::parse_json(r#"{"A":"1","B":"2"}"#).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_escaped_characters_survive() {
    let mut map = ConfigMap::new();
    map.insert("QUOTE", "say \"hi\"");
    map.insert("NEWLINE", "a\nb");
    map.insert("UNICODE", "ümlaut ✓");

    let back = ConfigMap::parse_json(&map.to_json().unwrap()).unwrap();
    assert_eq!(back, map);
}

#[test]
fn test_rich_shapes_are_rejected_with_reason() {
    let cases = [
        (r#"[]"#, "array"),
        (r#""text""#, "string"),
        (r#"12"#, "number"),
        (r#"true"#, "boolean"),
    ];
    for (text, found) in cases {
        match ConfigMap::parse_json(text) {
            Err(RecordError::ConfigNotObject { found: got }) => assert_eq!(got, found),
            other => panic!("expected ConfigNotObject for {}, got {:?}", text, other),
        }
    }
}

#[test]
fn test_non_string_member_names_the_key() {
    let err = ConfigMap::parse_json(r#"{"OK":"x","LIST":["a"]}"#).unwrap_err();
    assert_eq!(
        err,
        RecordError::NonStringValue {
            key: "LIST".to_string(),
            found: "array".to_string()
        }
    );
    assert!(err.to_string().contains("LIST"));
}
