//! HTTP transport abstraction
//!
//! The paging client only needs a JSON-speaking GET. [`HttpTransport`] is the
//! reqwest implementation used by the CLI; tests plug in
//! [`MockTransport`](crate::mock::MockTransport).

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Query parameters, kept sorted so request identity is stable
pub type Params = BTreeMap<String, String>;

/// Raw response from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Response {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// JSON GET capability
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `path` (relative to the API root) with `params`
    async fn get(&self, path: &str, params: &Params) -> Result<Response>;
}

/// Snipe-IT API transport over reqwest with bearer authentication
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl HttpTransport {
    /// Create a transport for `api_url` (e.g. `https://host/api/v1/`)
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let api_url = api_url.into();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(api_url));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_url,
            api_token: api_token.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `path` is relative to the API root and already segment-encoded
    fn request_url(&self, path: &str) -> Result<reqwest::Url> {
        let url = format!("{}{}", self.api_url, path);
        reqwest::Url::parse(&url).map_err(|_| ClientError::InvalidUrl(url))
    }
}

/// Percent-encode one path segment (`/`, `#`, `?` and `%` included)
pub fn encode_segment(segment: &str) -> Result<String> {
    let mut url = reqwest::Url::parse("http://localhost/")
        .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(segment.to_string()))?
        .clear()
        .push(segment);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Decode a response body; error pages are frequently HTML, so only a 200
/// must carry JSON
fn decode_body(status: u16, text: &str) -> Result<serde_json::Value> {
    match serde_json::from_str(text) {
        Ok(body) => Ok(body),
        Err(_) if status != 200 => Ok(serde_json::Value::Null),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, params: &Params) -> Result<Response> {
        let url = self.request_url(path)?;

        let response = self
            .client
            .get(url)
            .query(params)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = decode_body(status, &text)?;

        Ok(Response { status, body })
    }
}
