//! In-memory transport for tests
//!
//! Responses are keyed by path plus the full query string (including
//! `offset`). Unknown requests answer 404 so a missing script shows up as a
//! failed fetch rather than a hang.

use crate::error::Result;
use crate::transport::{Params, Response, Transport};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// Build the lookup key for a request
pub fn request_key(path: &str, params: &Params) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for an exact request
    pub fn respond(&self, path: &str, params: &Params, response: Response) {
        let key = request_key(path, params);
        lock(&self.responses).insert(key, response);
    }

    /// Register a paged collection: one envelope per entry of `pages`, at the
    /// offsets a client would request them, followed by an empty page.
    pub fn paged(&self, path: &str, params: &Params, pages: Vec<Vec<Value>>) {
        let total: usize = pages.iter().map(Vec::len).sum();
        let mut offset = 0;
        for rows in pages.into_iter().chain(std::iter::once(Vec::new())) {
            let len = rows.len();
            let mut page_params = params.clone();
            if offset > 0 {
                page_params.insert("offset".to_string(), offset.to_string());
            }
            self.respond(
                path,
                &page_params,
                Response::ok(json!({ "total": total, "rows": rows })),
            );
            offset += len;
        }
    }

    /// Every request issued so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, params: &Params) -> Result<Response> {
        let key = request_key(path, params);
        lock(&self.calls).push(key.clone());
        Ok(lock(&self.responses)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Response::new(404, Value::Null)))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
