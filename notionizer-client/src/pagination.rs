//! Lazily paginated query results.

use crate::client::ClientContext;
use crate::error::{ClientError, ClientResult};
use crate::page::Page;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// One response of `POST databases/<id>/query`.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Rows of a database query, fetched one service page at a time.
///
/// The first request is made when the query is issued. Each further request
/// is made only when the buffered rows run out and the previous response
/// reported `has_more`. Rows are cached as they are yielded. After an error
/// is yielded the iterator is finished.
pub struct QueryRows {
    ctx: Arc<ClientContext>,
    path: String,
    body: Map<String, Value>,
    buffer: VecDeque<Value>,
    next_cursor: Option<String>,
    requests: usize,
    done: bool,
}

impl QueryRows {
    pub(crate) fn start(
        ctx: Arc<ClientContext>,
        path: String,
        body: Map<String, Value>,
    ) -> ClientResult<Self> {
        let mut rows = Self {
            ctx,
            path,
            body,
            buffer: VecDeque::new(),
            next_cursor: None,
            requests: 0,
            done: false,
        };
        rows.fetch(None)?;
        Ok(rows)
    }

    /// Number of requests made so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// True when more rows may be fetched after the buffered ones.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    fn fetch(&mut self, cursor: Option<String>) -> ClientResult<()> {
        let mut body = self.body.clone();
        if let Some(cursor) = cursor {
            body.insert("start_cursor".to_string(), Value::String(cursor));
        }
        debug!(path = %self.path, request = self.requests + 1, "querying database");
        let response = self.ctx.transport.post(&self.path, &Value::Object(body))?;
        self.requests += 1;

        let page: QueryResponse = serde_json::from_value(response)
            .map_err(|e| ClientError::UnexpectedResponse(format!("query response: {e}")))?;
        self.next_cursor = if page.has_more { page.next_cursor } else { None };
        self.buffer.extend(page.results);
        Ok(())
    }

    fn next_row(&mut self) -> Option<ClientResult<Page>> {
        loop {
            if let Some(raw) = self.buffer.pop_front() {
                return Some(self.ctx.absorb(raw).and_then(Page::try_from));
            }
            let cursor = self.next_cursor.take()?;
            if let Err(err) = self.fetch(Some(cursor)) {
                return Some(Err(err));
            }
        }
    }
}

impl Iterator for QueryRows {
    type Item = ClientResult<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_row();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl std::fmt::Debug for QueryRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRows")
            .field("path", &self.path)
            .field("buffered", &self.buffer.len())
            .field("requests", &self.requests)
            .field("done", &self.done)
            .finish()
    }
}
