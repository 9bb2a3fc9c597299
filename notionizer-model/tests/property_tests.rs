use notionizer_model::{
    ModelError, PropertyKind, PropertyObject, PropertyTypeRegistry, PropertyValue, Scope,
};
use notionizer_types::{ObjectId, ObjectKind};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn row(name: &str, raw: Value) -> PropertyObject {
    let reg = PropertyTypeRegistry::standard();
    PropertyObject::resolve(&reg, ObjectId::new_random(), ObjectKind::Page, name, raw).unwrap()
}

fn column(name: &str, raw: Value) -> PropertyObject {
    let reg = PropertyTypeRegistry::standard();
    PropertyObject::resolve(&reg, ObjectId::new_random(), ObjectKind::Database, name, raw)
        .unwrap()
}

fn text(s: &str) -> PropertyValue {
    PropertyValue::from(s)
}

// ── Row normalization ────────────────────────────────────────────

#[test]
fn title_joins_fragments() {
    let p = row(
        "Name",
        json!({"id": "title", "type": "title", "title": [{"plain_text": "a"}, {"plain_text": "b"}]}),
    );
    assert_eq!(p.value(), text("a b"));
    assert_eq!(p.scope(), Scope::Row);
    assert_eq!(p.id(), Some("title"));
}

#[test]
fn number_and_checkbox() {
    assert_eq!(row("N", json!({"type": "number", "number": 2})).value(), PropertyValue::from(2));
    assert_eq!(row("N", json!({"type": "number", "number": null})).value(), PropertyValue::Null);
    assert_eq!(
        row("C", json!({"type": "checkbox", "checkbox": true})).value(),
        PropertyValue::Bool(true)
    );
}

#[test]
fn select_yields_choice_name() {
    let p = row("S", json!({"type": "select", "select": {"id": "1", "name": "High", "color": "red"}}));
    assert_eq!(p.value(), text("High"));
    let empty = row("S", json!({"type": "select", "select": null}));
    assert_eq!(empty.value(), PropertyValue::Null);
}

#[test]
fn multi_valued_kinds_yield_lists() {
    let tags = row(
        "Tags",
        json!({"type": "multi_select", "multi_select": [{"name": "a"}, {"name": "b\u{a0}c"}]}),
    );
    assert_eq!(tags.value(), PropertyValue::List(vec![text("a"), text("b c")]));

    let rel = row("Rel", json!({"type": "relation", "relation": [{"id": "p1"}, {"id": "p2"}]}));
    assert_eq!(rel.value(), PropertyValue::List(vec![text("p1"), text("p2")]));

    let people = row(
        "Owner",
        json!({"type": "people", "people": [{"object": "user", "id": "u1", "name": "Kim"}]}),
    );
    assert_eq!(people.value(), PropertyValue::List(vec![text("Kim")]));
}

#[test]
fn date_forms() {
    let range = row(
        "When",
        json!({"type": "date", "date": {"start": "2021-01-01", "end": "2021-01-03"}}),
    );
    assert_eq!(range.value(), text("2021-01-01~2021-01-03"));
    let single = row("When", json!({"type": "date", "date": {"start": "2021-01-01", "end": null}}));
    assert_eq!(single.value(), text("2021-01-01"));
    let absent = row("When", json!({"type": "date", "date": null}));
    assert_eq!(absent.value(), text(""));
}

#[test]
fn formula_unwraps_envelopes() {
    let num = row("F", json!({"type": "formula", "formula": {"type": "number", "number": 7}}));
    assert_eq!(num.value(), PropertyValue::from(7));
    let date = row(
        "F",
        json!({"type": "formula", "formula": {"type": "date", "date": {"start": "2022-02-02"}}}),
    );
    assert_eq!(date.value(), text("2022-02-02"));
}

#[test]
fn rollup_unwraps_arrays_elementwise() {
    let p = row(
        "R",
        json!({"type": "rollup", "rollup": {"type": "array", "function": "show_original", "array": [
            {"type": "number", "number": 1},
            {"type": "title", "title": [{"plain_text": "x"}]}
        ]}}),
    );
    assert_eq!(
        p.value(),
        PropertyValue::List(vec![PropertyValue::from(1), text("x")])
    );
}

#[test]
fn created_by_yields_user_name() {
    let p = row(
        "By",
        json!({"type": "created_by", "created_by": {"object": "user", "id": "u9"}}),
    );
    assert_eq!(p.value(), text("u9"));
}

// ── Row writes ───────────────────────────────────────────────────

#[test]
fn prepare_update_keys_by_name() {
    let p = row("Price", json!({"type": "number", "number": 1}));
    assert_eq!(p.prepare_update(&json!(5)).unwrap(), json!({"Price": {"number": 5}}));
    assert_eq!(p.value(), PropertyValue::from(1));
}

#[test]
fn title_accepts_plain_string() {
    let p = row("Name", json!({"type": "title", "title": []}));
    assert_eq!(
        p.prepare_update(&json!("x")).unwrap(),
        json!({"Name": {"title": [{"text": {"content": "x"}, "plain_text": "x"}]}})
    );
}

#[test]
fn prepare_update_validation_error() {
    let p = row("Done", json!({"type": "checkbox", "checkbox": false}));
    let err = p.prepare_update(&json!("yes")).unwrap_err();
    assert!(matches!(err, ModelError::Validation { ref name, .. } if name == "Done"));
}

#[test]
fn computed_property_is_immutable() {
    let p = row("Created", json!({"type": "created_time", "created_time": "2021-01-01T00:00:00.000Z"}));
    assert!(!p.is_mutable());
    for value in [json!("2022-01-01T00:00:00.000Z"), json!("2021-01-01T00:00:00.000Z")] {
        assert_eq!(
            p.prepare_update(&value).unwrap_err(),
            ModelError::Immutable { name: "Created".into() }
        );
    }
}

#[test]
fn catch_all_fails_writes_with_schema_error() {
    let p = PropertyObject::catch_all(
        ObjectId::new_random(),
        ObjectKind::Page,
        "Id",
        json!({"type": "unique_id", "unique_id": {"type": "number", "number": 42}}),
    )
    .unwrap();
    assert!(p.is_catch_all());
    assert_eq!(p.kind(), None);
    assert_eq!(p.value(), PropertyValue::from(42));
    assert_eq!(
        p.prepare_update(&json!(1)).unwrap_err(),
        ModelError::Schema { wire_type: "unique_id".into() }
    );
}

#[test]
fn missing_type_tag_is_malformed() {
    let reg = PropertyTypeRegistry::standard();
    let err = PropertyObject::resolve(&reg, ObjectId::new_random(), ObjectKind::Page, "X", json!({}))
        .unwrap_err();
    assert!(matches!(err, ModelError::Malformed { .. }));
}

// ── Schema scope ─────────────────────────────────────────────────

#[test]
fn database_rich_text_is_tracked_as_text() {
    let p = column("Memo", json!({"id": "m", "name": "Memo", "type": "rich_text", "rich_text": {}}));
    assert_eq!(p.kind(), Some(PropertyKind::Text));
    assert_eq!(p.wire_type(), "text");
    assert_eq!(p.scope(), Scope::Schema);
}

#[test]
fn schema_value_is_configuration() {
    let p = column(
        "Price",
        json!({"id": "p", "name": "Price", "type": "number", "number": {"format": "won"}}),
    );
    assert_eq!(p.value(), PropertyValue::Json(json!({"format": "won"})));
}

#[test]
fn select_options() {
    let p = column(
        "Status",
        json!({"name": "Status", "type": "select", "select": {"options": [
            {"id": "1", "name": "Todo"}, {"id": "2", "name": "Done"}
        ]}}),
    );
    assert_eq!(p.options(), vec!["Todo".to_string(), "Done".to_string()]);
    let n = column("N", json!({"name": "N", "type": "number", "number": {}}));
    assert!(n.options().is_empty());
}

#[test]
fn rename_and_retype_payloads() {
    let p = column("Old", json!({"name": "Old", "type": "number", "number": {}}));
    assert_eq!(p.prepare_rename("New").unwrap(), json!({"Old": {"name": "New"}}));
    assert_eq!(
        p.prepare_retype(PropertyKind::Select).unwrap(),
        json!({"Old": {"type": "select", "select": {}}})
    );
    assert_eq!(
        p.prepare_retype(PropertyKind::Text).unwrap(),
        json!({"Old": {"type": "rich_text", "rich_text": {}}})
    );
}

#[test]
fn retype_to_configured_kind_is_rejected() {
    let p = column("Old", json!({"name": "Old", "type": "number", "number": {}}));
    assert!(matches!(
        p.prepare_retype(PropertyKind::Formula),
        Err(ModelError::Malformed { .. })
    ));
}

#[test]
fn rename_rejects_empty_name() {
    let p = column("Old", json!({"name": "Old", "type": "number", "number": {}}));
    assert!(p.prepare_rename("  ").is_err());
}

#[test]
fn row_objects_cannot_be_renamed() {
    let p = row("Price", json!({"type": "number", "number": 1}));
    assert_eq!(
        p.prepare_rename("Cost").unwrap_err(),
        ModelError::Immutable { name: "Price".into() }
    );
}

#[test]
fn column_validates_new_row_input() {
    let p = column("Price", json!({"name": "Price", "type": "number", "number": {}}));
    assert_eq!(p.payload_for(&json!(3)).unwrap(), json!({"number": 3}));
    assert!(p.payload_for(&json!("3")).is_err());
    assert!(p.prepare_update(&json!(3)).is_err());
}
