use notionizer_model::{PropertiesCollection, PropertyTypeRegistry};
use notionizer_query::{BoolOp, Direction, QueryCompiler, SortKey, compile};
use notionizer_types::{ObjectId, ObjectKind};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn schema() -> PropertiesCollection {
    let raw = json!({
        "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
        "Number": {"id": "n", "name": "Number", "type": "number", "number": {"format": "number"}},
        "Done": {"id": "d", "name": "Done", "type": "checkbox", "checkbox": {}},
        "Stage": {"id": "s", "name": "Stage", "type": "select", "select": {"options": []}},
        "State": {"id": "st", "name": "State", "type": "status", "status": {"options": []}},
        "Tags": {"id": "t", "name": "Tags", "type": "multi_select", "multi_select": {"options": []}},
        "Due date": {"id": "dd", "name": "Due date", "type": "date", "date": {}},
        "Memo": {"id": "m", "name": "Memo", "type": "rich_text", "rich_text": {}},
        "Owner": {"id": "o", "name": "Owner", "type": "people", "people": {}},
        "Docs": {"id": "f", "name": "Docs", "type": "files", "files": {}},
        "Links": {"id": "r", "name": "Links", "type": "relation", "relation": {"database_id": "x"}},
        "Total": {"id": "fx", "name": "Total", "type": "formula", "formula": {"expression": "1"}},
        "Ticket": {"id": "u", "name": "Ticket", "type": "unique_id", "unique_id": {}},
        "Created": {"id": "c", "name": "Created", "type": "created_time", "created_time": {}}
    });
    PropertiesCollection::build(
        &PropertyTypeRegistry::standard(),
        ObjectId::new_random(),
        ObjectKind::Database,
        &raw,
    )
    .unwrap()
}

fn compiled(expr: &str) -> Value {
    compile(expr, &schema()).unwrap().to_json()
}

// ── Comparisons ──────────────────────────────────────────────────

#[test]
fn simple_number_equality_defaults_to_or() {
    assert_eq!(
        compiled("Number == 2"),
        json!({"or": [{"property": "Number", "number": {"equals": 2}}]})
    );
}

#[test]
fn is_and_is_not_are_aliases() {
    assert_eq!(compiled("Number is 2"), compiled("Number == 2"));
    assert_eq!(
        compiled("Number is not 2"),
        json!({"or": [{"property": "Number", "number": {"does_not_equal": 2}}]})
    );
}

#[test]
fn text_family_covers_title_and_rich_text() {
    assert_eq!(
        compiled("Name == 'milk'"),
        json!({"or": [{"property": "Name", "title": {"equals": "milk"}}]})
    );
    assert_eq!(
        compiled("Memo != \"x\""),
        json!({"or": [{"property": "Memo", "rich_text": {"does_not_equal": "x"}}]})
    );
}

#[test]
fn checkbox_takes_booleans() {
    assert_eq!(
        compiled("Done == False"),
        json!({"or": [{"property": "Done", "checkbox": {"equals": false}}]})
    );
}

#[test]
fn select_and_status() {
    assert_eq!(
        compiled("Stage == 'High'"),
        json!({"or": [{"property": "Stage", "select": {"equals": "High"}}]})
    );
    assert_eq!(
        compiled("State != 'Done'"),
        json!({"or": [{"property": "State", "status": {"does_not_equal": "Done"}}]})
    );
}

#[test]
fn multi_valued_families_use_contains() {
    assert_eq!(
        compiled("Tags == 'home'"),
        json!({"or": [{"property": "Tags", "multi_select": {"contains": "home"}}]})
    );
    assert_eq!(
        compiled("Owner != 'u1'"),
        json!({"or": [{"property": "Owner", "people": {"does_not_contain": "u1"}}]})
    );
    assert_eq!(
        compiled("Links is 'p1'"),
        json!({"or": [{"property": "Links", "relation": {"contains": "p1"}}]})
    );
}

#[test]
fn quoted_names_and_dates() {
    assert_eq!(
        compiled("`Due date` == '2022-03-25'"),
        json!({"or": [{"property": "Due date", "date": {"equals": "2022-03-25"}}]})
    );
    assert_eq!(
        compiled("Created == '2022-03-25'"),
        json!({"or": [{"property": "Created", "created_time": {"equals": "2022-03-25"}}]})
    );
}

#[test]
fn homogeneous_connectives() {
    assert_eq!(
        compiled("Number == 1 and Done == True and Stage == 'a'"),
        json!({"and": [
            {"property": "Number", "number": {"equals": 1}},
            {"property": "Done", "checkbox": {"equals": true}},
            {"property": "Stage", "select": {"equals": "a"}}
        ]})
    );
    let tree = compile("Number == 1 or Number == 2", &schema()).unwrap();
    assert_eq!(tree.op(), BoolOp::Or);
    assert_eq!(tree.len(), 2);
}

// ── Existence ────────────────────────────────────────────────────

#[test]
fn bare_name_is_not_empty() {
    assert_eq!(
        compiled("Stage"),
        json!({"or": [{"property": "Stage", "select": {"is_not_empty": true}}]})
    );
}

#[test]
fn not_name_is_empty() {
    assert_eq!(
        compiled("not Docs"),
        json!({"or": [{"property": "Docs", "files": {"is_empty": true}}]})
    );
}

#[test]
fn checkbox_existence_means_checked() {
    assert_eq!(
        compiled("Done"),
        json!({"or": [{"property": "Done", "checkbox": {"equals": true}}]})
    );
    assert_eq!(
        compiled("not Done"),
        json!({"or": [{"property": "Done", "checkbox": {"equals": false}}]})
    );
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn literal_mismatch_names_property() {
    let err = compile("Number == \"x\"", &schema()).unwrap_err();
    assert!(err.message().contains("Number"));
    assert_eq!(err.property(), Some("Number"));
    assert_eq!(err.column(), 10);
    assert_eq!(err.snippet(), "\"x\"");
}

#[test]
fn unknown_property_names_it() {
    let err = compile("Ghost == 1", &schema()).unwrap_err();
    assert!(err.message().contains("Ghost"));
    assert_eq!(err.column(), 0);
    assert_eq!(err.to_string(), "unknown property 'Ghost'\nGhost == 1\n^^^^^");
}

#[test]
fn caret_points_at_second_term() {
    let err = compile("Number == 1 and Ghost == 2", &schema()).unwrap_err();
    assert_eq!(err.column(), 16);
    assert!(err.to_string().ends_with("\n                ^^^^^"));
}

#[test]
fn formula_cannot_be_filtered() {
    let err = compile("Total == 1", &schema()).unwrap_err();
    assert!(err.message().contains("Total"));
}

#[test]
fn unregistered_type_cannot_be_filtered() {
    let err = compile("Ticket", &schema()).unwrap_err();
    assert!(err.message().contains("unique_id"));
}

#[test]
fn date_inequality_rejected() {
    let err = compile("`Due date` != '2022-01-01'", &schema()).unwrap_err();
    assert!(err.message().contains("Due date"));
    assert_eq!(err.snippet(), "!=");
}

#[test]
fn files_comparison_rejected() {
    let err = compile("Docs == 'a.png'", &schema()).unwrap_err();
    assert!(err.message().contains("existence"));
}

#[test]
fn checkbox_needs_boolean() {
    let err = compile("Done == 1", &schema()).unwrap_err();
    assert!(err.message().contains("boolean"));
}

// ── Sorts ────────────────────────────────────────────────────────

#[test]
fn checked_property_sort() {
    let schema = schema();
    let compiler = QueryCompiler::new(&schema);
    let sort = compiler.sort("Number", Direction::Descending).unwrap();
    assert_eq!(sort.key, SortKey::Property("Number".into()));
    assert!(compiler.sort("Ghost", Direction::Ascending).is_err());
}
