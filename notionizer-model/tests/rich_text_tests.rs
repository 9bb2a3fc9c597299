use notionizer_model::rich_text::{from_plain, is_rich_text_array, to_plain, wrap};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn fragments_join_with_space() {
    let raw = json!([{"plain_text": "a"}, {"plain_text": "b"}]);
    assert_eq!(to_plain(&raw), "a b");
}

#[test]
fn nbsp_becomes_space() {
    let raw = json!([{"plain_text": "a\u{a0}b"}]);
    assert_eq!(to_plain(&raw), "a b");
}

#[test]
fn falls_back_to_text_content() {
    let raw = json!([{"text": {"content": "hi"}}]);
    assert_eq!(to_plain(&raw), "hi");
}

#[test]
fn empty_and_null() {
    assert_eq!(to_plain(&json!([])), "");
    assert_eq!(to_plain(&json!(null)), "");
}

#[test]
fn plain_string_roundtrip() {
    assert_eq!(to_plain(&from_plain("x")), "x");
}

#[test]
fn wrap_passes_arrays_through() {
    let raw = json!([{"plain_text": "keep"}]);
    assert_eq!(wrap(&raw), raw);
    assert_eq!(wrap(&json!("s")), from_plain("s"));
}

#[test]
fn detects_rich_text_arrays() {
    assert!(is_rich_text_array(&from_plain("x")));
    assert!(!is_rich_text_array(&json!([])));
    assert!(!is_rich_text_array(&json!([1, 2])));
}

proptest! {
    #[test]
    fn from_plain_then_to_plain_is_identity(s in "[^\u{a0}]*") {
        prop_assert_eq!(to_plain(&from_plain(&s)), s);
    }

    #[test]
    fn fragment_count_matches_separators(parts in proptest::collection::vec("[a-z]{1,8}", 1..6)) {
        let raw = serde_json::Value::Array(
            parts.iter().map(|p| json!({"plain_text": p})).collect(),
        );
        prop_assert_eq!(to_plain(&raw), parts.join(" "));
    }
}
