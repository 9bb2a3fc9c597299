use notionizer_model::{LocalType, ModelError, PropertyKind, PropertyTypeRegistry};
use notionizer_types::ObjectKind;
use pretty_assertions::assert_eq;
use serde_json::json;

fn registry() -> PropertyTypeRegistry {
    PropertyTypeRegistry::standard()
}

// ── Resolution ───────────────────────────────────────────────────

#[test]
fn every_page_kind_resolves() {
    let reg = registry();
    for kind in PropertyKind::ALL {
        if kind == PropertyKind::Text {
            continue;
        }
        let d = reg.resolve(ObjectKind::Page, kind.as_wire()).unwrap();
        assert_eq!(d.kind(), kind);
    }
}

#[test]
fn every_database_kind_resolves() {
    let reg = registry();
    for kind in PropertyKind::ALL {
        assert!(reg.resolve(ObjectKind::Database, kind.as_wire()).is_ok(), "{kind}");
    }
}

#[test]
fn text_is_database_only() {
    let err = registry().resolve(ObjectKind::Page, "text").unwrap_err();
    assert_eq!(err, ModelError::Schema { wire_type: "text".into() });
}

#[test]
fn unknown_tag_is_schema_error() {
    let err = registry().resolve(ObjectKind::Page, "unique_id").unwrap_err();
    assert_eq!(err.to_string(), "unrecognized property type 'unique_id'");
}

// ── Mutability ───────────────────────────────────────────────────

#[test]
fn computed_kinds_are_immutable_everywhere() {
    let reg = registry();
    for owner in [ObjectKind::Page, ObjectKind::Database] {
        for kind in PropertyKind::ALL.into_iter().filter(PropertyKind::is_computed) {
            assert!(!reg.descriptor(owner, kind).unwrap().is_mutable(), "{owner} {kind}");
        }
    }
}

#[test]
fn relation_is_row_writable_only() {
    let reg = registry();
    assert!(reg.descriptor(ObjectKind::Page, PropertyKind::Relation).unwrap().is_mutable());
    assert!(!reg.descriptor(ObjectKind::Database, PropertyKind::Relation).unwrap().is_mutable());
}

#[test]
fn validate_rejects_immutable() {
    let d = *registry().descriptor(ObjectKind::Page, PropertyKind::Formula).unwrap();
    let err = d.validate("Total", &json!(1)).unwrap_err();
    assert_eq!(err, ModelError::Immutable { name: "Total".into() });
}

#[test]
fn validate_names_expected_and_actual() {
    let d = *registry().descriptor(ObjectKind::Page, PropertyKind::Number).unwrap();
    let err = d.validate("Price", &json!("ten")).unwrap_err();
    assert_eq!(
        err,
        ModelError::Validation {
            name: "Price".into(),
            expected: "number".into(),
            actual: LocalType::String,
        }
    );
    assert_eq!(err.to_string(), "property 'Price' expects number, got string");
}

#[test]
fn accepted_types() {
    let reg = registry();
    let page = |k| reg.descriptor(ObjectKind::Page, k).unwrap();
    assert!(page(PropertyKind::Title).accepts(&json!("x")));
    assert!(page(PropertyKind::Title).accepts(&json!([])));
    assert!(!page(PropertyKind::Title).accepts(&json!(1)));
    assert!(page(PropertyKind::Checkbox).accepts(&json!(true)));
    assert!(!page(PropertyKind::Checkbox).accepts(&json!("true")));
    assert!(page(PropertyKind::Select).accepts(&json!({"name": "a"})));
    assert!(!page(PropertyKind::MultiSelect).accepts(&json!("a")));
    assert!(page(PropertyKind::Date).accepts(&json!("2021-01-01")));
}

// ── Update payloads ──────────────────────────────────────────────

#[test]
fn title_payload_wraps_string() {
    let d = *registry().descriptor(ObjectKind::Page, PropertyKind::Title).unwrap();
    assert_eq!(
        d.to_update_payload(&json!("x")),
        json!({"title": [{"text": {"content": "x"}, "plain_text": "x"}]})
    );
}

#[test]
fn text_column_payload_uses_rich_text_key() {
    let d = *registry().descriptor(ObjectKind::Database, PropertyKind::Text).unwrap();
    let payload = d.to_update_payload(&json!("memo"));
    assert!(payload.get("rich_text").is_some());
}

#[test]
fn scalar_payloads() {
    let reg = registry();
    let p = |k, v| reg.descriptor(ObjectKind::Page, k).unwrap().to_update_payload(&v);
    assert_eq!(p(PropertyKind::Number, json!(3)), json!({"number": 3}));
    assert_eq!(p(PropertyKind::Checkbox, json!(false)), json!({"checkbox": false}));
    assert_eq!(p(PropertyKind::Url, json!("https://a.b")), json!({"url": "https://a.b"}));
    assert_eq!(
        p(PropertyKind::PhoneNumber, json!("010")),
        json!({"phone_number": "010"})
    );
}

#[test]
fn choice_payloads() {
    let reg = registry();
    let p = |k, v| reg.descriptor(ObjectKind::Page, k).unwrap().to_update_payload(&v);
    assert_eq!(p(PropertyKind::Select, json!("a")), json!({"select": {"name": "a"}}));
    assert_eq!(p(PropertyKind::Status, json!("Done")), json!({"status": {"name": "Done"}}));
    assert_eq!(
        p(PropertyKind::Select, json!({"id": "x1"})),
        json!({"select": {"id": "x1"}})
    );
    assert_eq!(
        p(PropertyKind::MultiSelect, json!(["a", {"name": "b"}])),
        json!({"multi_select": [{"name": "a"}, {"name": "b"}]})
    );
}

#[test]
fn date_payloads() {
    let d = *registry().descriptor(ObjectKind::Page, PropertyKind::Date).unwrap();
    assert_eq!(
        d.to_update_payload(&json!("2021-01-01~2021-01-05")),
        json!({"date": {"start": "2021-01-01", "end": "2021-01-05"}})
    );
    assert_eq!(
        d.to_update_payload(&json!("2021-01-01")),
        json!({"date": {"start": "2021-01-01", "end": null}})
    );
    assert_eq!(d.to_update_payload(&json!("")), json!({"date": null}));
}

#[test]
fn open_ended_date_range_has_null_end() {
    let d = *registry().descriptor(ObjectKind::Page, PropertyKind::Date).unwrap();
    assert_eq!(
        d.to_update_payload(&json!("2022-01-01~")),
        json!({"date": {"start": "2022-01-01", "end": null}})
    );
}

#[test]
fn reference_and_file_payloads() {
    let reg = registry();
    let p = |k, v| reg.descriptor(ObjectKind::Page, k).unwrap().to_update_payload(&v);
    assert_eq!(p(PropertyKind::People, json!(["u1"])), json!({"people": [{"id": "u1"}]}));
    assert_eq!(p(PropertyKind::Relation, json!(["p1"])), json!({"relation": [{"id": "p1"}]}));
    assert_eq!(
        p(PropertyKind::Files, json!(["https://x/y.png"])),
        json!({"files": [{
            "name": "https://x/y.png",
            "type": "external",
            "external": {"url": "https://x/y.png"}
        }]})
    );
}
