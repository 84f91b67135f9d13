//! Remote product catalog access.
//!
//! # Architecture
//!
//! - [`CatalogSource`] is the seam between the picker and the network: one
//!   async call per page, `search` + `page` + `limit` in, products out
//! - [`CatalogClient`] implements it over the REST search endpoint with
//!   `reqwest`, authenticating with an `x-api-key` header
//! - Unfiltered pages are cached in memory via `moka`; searches never are
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_picker::catalog::{CatalogClient, CatalogQuery, CatalogSource};
//!
//! let client = CatalogClient::new(&config)?;
//! let products = client.search(&CatalogQuery::new("shirt", 1, 10)).await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod types;

use std::future::Future;

pub use client::CatalogClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when fetching catalog pages.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API key cannot be sent as a header value.
    #[error("Invalid API key header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// A paginated product catalog.
///
/// Implementations perform one request per call and do not retry; retrying is
/// driven by the next user action.
pub trait CatalogSource {
    /// Fetch one page of products matching `query`.
    ///
    /// Returns fewer than `query.limit` products when the catalog is
    /// exhausted.
    fn search(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}
