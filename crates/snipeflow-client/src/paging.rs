//! Paginated retrieval
//!
//! Snipe-IT list endpoints answer with an envelope `{ "total": n, "rows": [...] }`
//! and take an `offset` query parameter. [`PagingClient::fetch`] walks the
//! offsets until the backend returns an empty page and hands back one logical
//! collection. Endpoints that answer with a bare object are passed through.

use crate::error::{ClientError, Result};
use crate::transport::{Params, Transport};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A backend record
pub type Record = serde_json::Map<String, Value>;

/// Result of a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Non-paginated endpoint, returned unchanged
    Single(Record),
    /// Every page concatenated in arrival order
    Page(Page),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// `total` reported by the first envelope, if any
    pub total: Option<u64>,
    pub rows: Vec<Record>,
}

impl Document {
    pub fn into_rows(self) -> Option<Vec<Record>> {
        match self {
            Document::Page(page) => Some(page.rows),
            Document::Single(_) => None,
        }
    }
}

/// What to do when a continuation page fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the rows of the pages that succeeded and stop
    #[default]
    KeepPrefix,
    /// Fail the whole fetch, including when a later page is not a `rows` envelope
    Strict,
}

/// Client that turns paged endpoints into single collections
#[derive(Clone)]
pub struct PagingClient {
    transport: Arc<dyn Transport>,
    policy: MergePolicy,
}

impl PagingClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: MergePolicy::default(),
        }
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch `path` with `params`, following pagination.
    ///
    /// `operation` names the caller and tags [`ClientError::RequestFailed`].
    /// Pages are requested strictly one after another since each offset is
    /// the running row count.
    pub async fn fetch(&self, operation: &str, path: &str, params: &Params) -> Result<Document> {
        let mut offset = 0usize;
        let mut total = None;
        let mut rows: Vec<Record> = Vec::new();

        loop {
            let first = offset == 0;
            let mut page_params = params.clone();
            if offset > 0 {
                page_params.insert("offset".to_string(), offset.to_string());
            }

            debug!(operation, path, offset, "Fetching page");
            let outcome = match self.transport.get(path, &page_params).await {
                Ok(response) if response.is_success() => Ok(response.body),
                Ok(response) => {
                    debug!(operation, path, status = response.status, "Non-success status");
                    Err(ClientError::request_failed(operation))
                }
                Err(e) => Err(e),
            };

            let body = match outcome {
                Ok(body) => body,
                Err(e) if first || self.policy == MergePolicy::Strict => return Err(e),
                Err(e) => {
                    warn!(
                        operation,
                        path,
                        offset,
                        kept = rows.len(),
                        error = %e,
                        "Continuation page failed, keeping rows retrieved so far"
                    );
                    break;
                }
            };

            let Value::Object(envelope) = body else {
                if first || self.policy == MergePolicy::Strict {
                    return Err(ClientError::unexpected_body(operation));
                }
                warn!(operation, path, offset, "Continuation page is not an object, stopping");
                break;
            };

            let Some(Value::Array(page_rows)) = envelope.get("rows") else {
                if first {
                    return Ok(Document::Single(envelope));
                }
                if self.policy == MergePolicy::Strict {
                    return Err(ClientError::unexpected_body(operation));
                }
                warn!(operation, path, offset, "Continuation page has no rows, stopping");
                break;
            };

            if first {
                total = envelope.get("total").and_then(Value::as_u64);
            }
            if page_rows.is_empty() {
                break;
            }

            offset += page_rows.len();
            for row in page_rows {
                match row {
                    Value::Object(record) => rows.push(record.clone()),
                    other => warn!(operation, path, row = %other, "Skipping non-object row"),
                }
            }
        }

        if let Some(total) = total
            && total as usize != rows.len()
        {
            debug!(
                operation,
                path,
                total,
                received = rows.len(),
                "Row count differs from reported total"
            );
        }

        Ok(Document::Page(Page { total, rows }))
    }
}
