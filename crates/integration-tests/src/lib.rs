//! Integration tests for Catalog Picker.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-picker-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `picker_scenarios` - Search, scroll, select and commit through a session
//! - `stale_responses` - Out-of-order and abandoned requests
//! - `list_editing` - Discounts, removal and drag-and-drop on the list
//! - `catalog_ids` - Identifier decoding as served by the catalog
//!
//! Tests run against [`StubCatalog`], an in-memory [`CatalogSource`]; no
//! network access is needed.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use catalog_picker::{CatalogError, CatalogQuery, CatalogSource, Product, Variant};
use catalog_picker_core::{Price, ProductId, VariantId};
use rust_decimal::Decimal;

/// In-memory catalog that filters by title and paginates like the real API.
#[derive(Debug, Default)]
pub struct StubCatalog {
    products: Vec<Product>,
    failures: AtomicUsize,
    requests: Mutex<Vec<CatalogQuery>>,
}

impl StubCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    /// Fail the next `count` requests with a server error.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Every query served so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<CatalogQuery> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl CatalogSource for StubCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(query.clone());
        }
        if self.take_failure() {
            return Err(CatalogError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }

        let needle = query.search.to_lowercase();
        let limit = query.limit as usize;
        let skip = (query.page.saturating_sub(1) as usize) * limit;
        Ok(self
            .products
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// A product titled `title` with `variants` variants priced at `price`.
#[must_use]
pub fn product(id: &str, title: &str, variants: usize, price: i64) -> Product {
    let price = Price::from_amount(Decimal::from(price));
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price,
        available: 10,
        image: None,
        variants: (0..variants)
            .map(|i| Variant {
                id: VariantId::new(format!("{id}-v{i}")),
                product_id: ProductId::new(id),
                title: format!("Size {i}"),
                price,
                checked: false,
            })
            .collect(),
        ..Product::default()
    }
}

/// `count` products titled `"{title} {n}"` with IDs `"{prefix}{n}"`.
#[must_use]
pub fn products(prefix: &str, title: &str, count: usize) -> Vec<Product> {
    (0..count)
        .map(|n| product(&format!("{prefix}{n}"), &format!("{title} {n}"), 2, 20))
        .collect()
}
