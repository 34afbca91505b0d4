//! Snipe-IT REST client for snipeflow
//!
//! This crate issues authenticated GET requests against the Snipe-IT API and
//! folds paginated list endpoints into single collections.
//!
//! # Example
//!
//! ```ignore
//! use snipeflow_client::{HttpTransport, PagingClient, Params};
//! use std::sync::Arc;
//!
//! let transport = HttpTransport::new("https://snipeit.example.org/api/v1/", token)?;
//! let client = PagingClient::new(Arc::new(transport));
//!
//! let mut params = Params::new();
//! params.insert("category_id".to_string(), "1".to_string());
//! let rows = client.fetch("active_laptops", "hardware", &params).await?;
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod paging;
pub mod transport;

pub use error::{ClientError, Result};
pub use paging::{Document, MergePolicy, Page, PagingClient, Record};
pub use transport::{HttpTransport, Params, Response, Transport, encode_segment};
