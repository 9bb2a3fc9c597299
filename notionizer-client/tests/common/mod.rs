#![allow(dead_code)]

use notionizer_client::NotionClient;
use notionizer_client::transport::mock::MockTransport;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const DB_ID: &str = "a8aec433-84f4-47ed-8439-0e8e42c2e089";
pub const PAGE_ID: &str = "59833787-2cf9-4fdf-8782-e53db20768a5";
pub const PAGE_ID_2: &str = "0a3d2c6e-4c0c-4bfa-9a62-5f6ab2a0e9a1";
pub const PAGE_ID_3: &str = "c6f1b0a2-3f6e-4a53-9d0f-1b2c3d4e5f60";

/// Routes `tracing` output to the test harness; set `RUST_LOG` to see it.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn client() -> (NotionClient, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = NotionClient::new(mock.clone());
    (client, mock)
}

pub fn rich(text: &str) -> Value {
    json!([{
        "type": "text",
        "text": {"content": text, "link": null},
        "plain_text": text,
        "href": null
    }])
}

pub fn database_json(title: &str) -> Value {
    json!({
        "object": "database",
        "id": DB_ID,
        "created_time": "2021-05-10T12:00:00.000Z",
        "last_edited_time": "2021-05-11T08:30:00.000Z",
        "created_by": {"object": "user", "id": "u1"},
        "last_edited_by": {"object": "user", "id": "u1"},
        "parent": {"type": "workspace", "workspace": true},
        "url": "https://www.notion.so/a8aec43384f447ed84390e8e42c2e089",
        "title": rich(title),
        "icon": null,
        "cover": null,
        "archived": false,
        "properties": {
            "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
            "Number": {"id": "n", "name": "Number", "type": "number", "number": {"format": "number"}},
            "Done": {"id": "d", "name": "Done", "type": "checkbox", "checkbox": {}},
            "Stage": {"id": "s", "name": "Stage", "type": "select", "select": {"options": [
                {"id": "o1", "name": "Todo", "color": "red"},
                {"id": "o2", "name": "Doing", "color": "blue"}
            ]}},
            "Tags": {"id": "t", "name": "Tags", "type": "multi_select", "multi_select": {"options": []}},
            "Due": {"id": "du", "name": "Due", "type": "date", "date": {}},
            "Links": {"id": "r", "name": "Links", "type": "relation", "relation": {"database_id": DB_ID}},
            "Total": {"id": "fx", "name": "Total", "type": "formula", "formula": {"expression": "prop(\"Number\") * 2"}}
        }
    })
}

pub fn page_json(id: &str, name: &str, number: f64, done: bool) -> Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": "2021-05-12T09:00:00.000Z",
        "last_edited_time": "2021-05-12T09:00:00.000Z",
        "created_by": {"object": "user", "id": "u1"},
        "last_edited_by": {"object": "user", "id": "u1"},
        "parent": {"type": "database_id", "database_id": DB_ID},
        "url": format!("https://www.notion.so/{}", id.replace('-', "")),
        "icon": null,
        "cover": null,
        "archived": false,
        "properties": {
            "Name": {"id": "title", "type": "title", "title": rich(name)},
            "Number": {"id": "n", "type": "number", "number": number},
            "Done": {"id": "d", "type": "checkbox", "checkbox": done},
            "Stage": {"id": "s", "type": "select", "select": {"id": "o1", "name": "Todo", "color": "red"}},
            "Tags": {"id": "t", "type": "multi_select", "multi_select": [
                {"id": "a", "name": "a"}, {"id": "b", "name": "b"}
            ]},
            "Due": {"id": "du", "type": "date", "date": {"start": "2022-03-25", "end": null, "time_zone": null}},
            "Links": {"id": "r", "type": "relation", "relation": []},
            "Total": {"id": "fx", "type": "formula", "formula": {"type": "number", "number": number * 2.0}}
        }
    })
}

pub fn query_page(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}
