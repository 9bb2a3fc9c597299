//! Transport abstraction.
//!
//! The object model only needs three verbs against paths relative to the
//! API root. [`HttpTransport`] talks to the real service; [`mock`] replays
//! queued responses for tests.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, TransportError};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Blocking JSON transport.
///
/// Implementations return the decoded body, or [`TransportError`] when the
/// body is an error object. Nothing is retried at this layer; wrap an
/// implementation to add retries.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> ClientResult<Value>;
    fn post(&self, path: &str, body: &Value) -> ClientResult<Value>;
    fn patch(&self, path: &str, body: &Value) -> ClientResult<Value>;
}

/// Turns an `{"object": "error"}` body into an error.
pub fn check_response(body: Value, status: u16) -> ClientResult<Value> {
    match TransportError::from_body(&body, status) {
        Some(err) => Err(err.into()),
        None => Ok(body),
    }
}

/// Transport over the service's REST API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a client sending `Authorization: Bearer <token>` and
    /// `Notion-Version` with every request.
    pub fn new(token: &str, config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::Config(format!("token: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "notion-version",
            HeaderValue::from_str(&config.notion_version)
                .map_err(|e| ClientError::Config(format!("notion version: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> ClientResult<Value> {
        debug!(method, path, "sending request");
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(TransportError::new(status.as_u16(), "http_error", text).into());
            }
            Err(e) => return Err(e.into()),
        };
        let body = check_response(body, status.as_u16())?;
        if !status.is_success() {
            return Err(TransportError::new(
                status.as_u16(),
                "http_error",
                format!("unexpected status for {method} {path}"),
            )
            .into());
        }
        debug!(method, path, status = status.as_u16(), "request complete");
        Ok(body)
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> ClientResult<Value> {
        self.send("GET", path, self.client.get(self.url(path)))
    }

    fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.send("POST", path, self.client.post(self.url(path)).json(body))
    }

    fn patch(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.send("PATCH", path, self.client.patch(self.url(path)).json(body))
    }
}

/// Mock transport for testing.
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Method {
        Get,
        Post,
        Patch,
    }

    /// One request seen by the mock.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub method: Method,
        pub path: String,
        pub body: Option<Value>,
    }

    /// Replays queued responses in order and records every call.
    ///
    /// Queued JSON goes through [`check_response`], so an error-shaped body
    /// fails the call like the real service would.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Value>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response body.
        pub fn push_response(&self, body: Value) {
            self.responses.lock().push_back(body);
        }

        /// Queues a service error.
        pub fn push_error(&self, status: u16, code: &str, message: &str) {
            self.push_response(serde_json::json!({
                "object": "error",
                "status": status,
                "code": code,
                "message": message,
            }));
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().clone()
        }

        pub fn count(&self, method: Method) -> usize {
            self.calls.lock().iter().filter(|c| c.method == method).count()
        }

        pub fn last_call(&self) -> Option<RecordedCall> {
            self.calls.lock().last().cloned()
        }

        /// Responses not consumed yet.
        pub fn pending(&self) -> usize {
            self.responses.lock().len()
        }

        fn respond(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
            self.calls.lock().push(RecordedCall {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            let next = self.responses.lock().pop_front();
            match next {
                Some(response) => check_response(response, 200),
                None => Err(ClientError::UnexpectedResponse(format!(
                    "no response queued for {method:?} {path}"
                ))),
            }
        }
    }

    impl Transport for MockTransport {
        fn get(&self, path: &str) -> ClientResult<Value> {
            self.respond(Method::Get, path, None)
        }

        fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
            self.respond(Method::Post, path, Some(body))
        }

        fn patch(&self, path: &str, body: &Value) -> ClientResult<Value> {
            self.respond(Method::Patch, path, Some(body))
        }
    }
}
