//! Catalog search API client implementation.
//!
//! Plain REST over `reqwest`: `GET <endpoint>?search=&page=&limit=` with the
//! API key in an `x-api-key` header. Unfiltered pages are cached using `moka`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use crate::config::{CatalogConfig, api_key_value};

use super::cache::PageKey;
use super::conversions::parse_page;
use super::types::{CatalogQuery, Product};
use super::{CatalogError, CatalogSource};

/// Maximum number of cached pages.
const CACHE_CAPACITY: u64 = 200;

/// Characters of a response body kept in logs and error messages.
const BODY_PREVIEW_CHARS: usize = 200;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog product search API.
///
/// Cheap to clone; clones share the HTTP connection pool and page cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Option<Cache<PageKey, Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(api_key_value(config))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = config.cache_enabled().then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.endpoint.clone(),
                cache,
            }),
        })
    }

    /// Build the request URL for a query.
    #[must_use]
    pub fn request_url(&self, query: &CatalogQuery) -> Url {
        build_request_url(&self.inner.endpoint, query)
    }

    /// Fetch one page from the network, bypassing the cache.
    async fn fetch_page(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let url = self.request_url(query);
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let preview = preview(&body);
            tracing::error!(
                status = %status,
                body = %preview,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: preview,
            });
        }

        parse_page(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&body),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl CatalogSource for CatalogClient {
    #[instrument(skip(self), fields(search = %query.search, page = query.page, limit = query.limit))]
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let key = PageKey::for_query(query);

        if let (Some(cache), Some(key)) = (&self.inner.cache, key)
            && let Some(products) = cache.get(&key).await
        {
            debug!("Cache hit for catalog page");
            return Ok(products);
        }

        let products = self.fetch_page(query).await?;
        debug!(count = products.len(), "Fetched catalog page");

        if let (Some(cache), Some(key)) = (&self.inner.cache, key) {
            cache.insert(key, products.clone()).await;
        }

        Ok(products)
    }
}

/// Append `search`, `page` and `limit` to the endpoint, replacing any
/// existing values for those parameters.
fn build_request_url(endpoint: &Url, query: &CatalogQuery) -> Url {
    let mut url = endpoint.clone();
    let retained: Vec<(String, String)> = endpoint
        .query_pairs()
        .filter(|(k, _)| !matches!(k.as_ref(), "search" | "page" | "limit"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("search", &query.search)
        .append_pair("page", &query.page.to_string())
        .append_pair("limit", &query.limit.to_string());
    url
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
