mod common;

use common::*;
use mockito::Matcher;
use notionizer_client::{ClientConfig, ClientError, HttpTransport, NotionClient, Transport};
use notionizer_types::ObjectId;
use pretty_assertions::assert_eq;
use serde_json::json;

fn config(server: &mockito::Server) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/v1/", server.url()),
        ..ClientConfig::default()
    }
}

// ── Requests ────────────────────────────────────────────────────

#[test]
fn get_sends_auth_and_version_headers() {
    init_tracing();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", format!("/v1/pages/{PAGE_ID}").as_str())
        .match_header("authorization", "Bearer secret_abc")
        .match_header("notion-version", "2022-06-28")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_json(PAGE_ID, "Milk", 1.0, false).to_string())
        .create();

    let client = NotionClient::from_token("secret_abc", config(&server)).unwrap();
    let page = client.get_page(ObjectId::parse(PAGE_ID).unwrap()).unwrap();

    mock.assert();
    assert_eq!(page.title(), "Milk");
}

#[test]
fn patch_sends_json_body() {
    init_tracing();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PATCH", format!("/v1/pages/{PAGE_ID}").as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"archived": true})))
        .with_status(200)
        .with_body(page_json(PAGE_ID, "Milk", 1.0, false).to_string())
        .create();

    let transport = HttpTransport::new("t", &config(&server)).unwrap();
    let body = transport
        .patch(&format!("/pages/{PAGE_ID}"), &json!({"archived": true}))
        .unwrap();

    mock.assert();
    assert_eq!(body["id"], PAGE_ID);
}

#[test]
fn query_pages_through_http() {
    init_tracing();
    let mut server = mockito::Server::new();
    let path = format!("/v1/databases/{DB_ID}/query");
    let first = server
        .mock("POST", path.as_str())
        .match_body(Matcher::Json(json!({})))
        .with_status(200)
        .with_body(query_page(vec![page_json(PAGE_ID, "one", 1.0, false)], Some("next")).to_string())
        .create();
    let second = server
        .mock("POST", path.as_str())
        .match_body(Matcher::Json(json!({"start_cursor": "next"})))
        .with_status(200)
        .with_body(query_page(vec![page_json(PAGE_ID_2, "two", 2.0, false)], None).to_string())
        .create();

    let client = NotionClient::from_token("t", config(&server)).unwrap();
    let db = client.database_from_json(database_json("Groceries")).unwrap();
    let titles: Vec<String> = db
        .query(None, None, None)
        .unwrap()
        .map(|row| row.unwrap().title())
        .collect();

    first.assert();
    second.assert();
    assert_eq!(titles, vec!["one", "two"]);
}

// ── Errors ──────────────────────────────────────────────────────

#[test]
fn error_body_becomes_transport_error() {
    init_tracing();
    let mut server = mockito::Server::new();
    server
        .mock("GET", Matcher::Any)
        .with_status(404)
        .with_body(
            json!({
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": "Could not find page"
            })
            .to_string(),
        )
        .create();

    let client = NotionClient::from_token("t", config(&server)).unwrap();
    let err = client.get_page(ObjectId::parse(PAGE_ID).unwrap()).unwrap_err();

    let transport = err.transport().unwrap();
    assert_eq!(transport.status, 404);
    assert_eq!(transport.code, "object_not_found");
    assert_eq!(err.to_string(), "[404] object_not_found: Could not find page");
}

#[test]
fn non_json_failure_keeps_status() {
    init_tracing();
    let mut server = mockito::Server::new();
    server
        .mock("GET", Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create();

    let transport = HttpTransport::new("t", &config(&server)).unwrap();
    let err = transport.get("users/me").unwrap_err();

    let ClientError::Transport(err) = err else {
        panic!("expected a transport error, got {err}");
    };
    assert_eq!(err.status, 502);
    assert_eq!(err.message, "bad gateway");
}

#[test]
fn rate_limit_is_detected() {
    init_tracing();
    let mut server = mockito::Server::new();
    server
        .mock("POST", Matcher::Any)
        .with_status(429)
        .with_body(
            json!({"object": "error", "status": 429, "code": "rate_limited", "message": "slow"})
                .to_string(),
        )
        .create();

    let transport = HttpTransport::new("t", &config(&server)).unwrap();
    let err = transport.post("search", &json!({})).unwrap_err();
    assert!(err.is_rate_limited());
}

#[test]
fn invalid_token_is_a_config_error() {
    let err = HttpTransport::new("bad\ntoken", &ClientConfig::default()).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
