//! The product picker modal.
//!
//! A [`PickerSession`] ties the query engine to the selection reconciler for
//! the lifetime of one open modal: it is opened for a list position, fetches
//! and accumulates catalog pages, tracks checkbox state over the fetched
//! products, and on commit writes the checked products into the caller's
//! list. Closing it drops everything transient.

use catalog_picker_core::CheckState;
use tracing::{debug, instrument};

use crate::catalog::{CatalogError, CatalogSource, Product};
use crate::list::OrderedCollection;
use crate::query::{Completion, FetchTicket, QueryEngine};
use crate::selection::{self, SelectionError};

/// State of one picker modal.
#[derive(Debug, Clone)]
pub struct PickerSession {
    engine: QueryEngine,
    open: bool,
    insertion_position: usize,
}

impl PickerSession {
    /// A closed session fetching `page_size` products per page.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            engine: QueryEngine::new(page_size),
            open: false,
            insertion_position: 0,
        }
    }

    /// Whether the modal is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// List position that a commit starts writing at.
    #[must_use]
    pub const fn insertion_position(&self) -> usize {
        self.insertion_position
    }

    /// The query engine, for rendering results and status.
    #[must_use]
    pub const fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Fetched products with their selection state.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.engine.results()
    }

    /// Open the modal for a list position and request the first page of the
    /// unfiltered catalog.
    #[instrument(skip(self))]
    pub fn open(&mut self, insertion_position: usize) -> FetchTicket {
        self.engine.reset();
        self.open = true;
        self.insertion_position = insertion_position;
        self.engine.start()
    }

    /// Close the modal, discarding results, selection and in-flight requests.
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        self.engine.reset();
        self.open = false;
    }

    /// Submit search text (the Enter key).
    ///
    /// Returns `None` when closed, or when the text is unchanged and the last
    /// request did not fail.
    #[instrument(skip(self))]
    pub fn submit_search(&mut self, text: &str) -> Option<FetchTicket> {
        if !self.open {
            return None;
        }
        if text == self.engine.search() && self.engine.error().is_none() {
            debug!("Search unchanged, not refetching");
            return None;
        }
        Some(self.engine.set_search(text))
    }

    /// The infinite-scroll sentinel became visible.
    pub fn on_sentinel_visible(&mut self) -> Option<FetchTicket> {
        if !self.open {
            return None;
        }
        self.engine.next_page()
    }

    /// Apply the outcome of a ticket's request.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<Product>, CatalogError>,
    ) -> Completion {
        self.engine.complete(ticket, outcome)
    }

    /// Run a ticket's request against `source` and apply the outcome.
    pub async fn fetch<S>(&mut self, source: &S, ticket: FetchTicket) -> Completion
    where
        S: CatalogSource + ?Sized,
    {
        self.engine.fetch(source, ticket).await
    }

    /// Check or uncheck a fetched product and all its variants.
    ///
    /// # Errors
    ///
    /// Returns an error if `product_index` is out of range.
    pub fn toggle_product(
        &mut self,
        product_index: usize,
        checked: bool,
    ) -> Result<(), SelectionError> {
        selection::toggle_product(self.engine.results_mut(), product_index, checked)
    }

    /// Check or uncheck one variant of a fetched product.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range.
    pub fn toggle_variant(
        &mut self,
        product_index: usize,
        variant_index: usize,
        checked: bool,
    ) -> Result<CheckState, SelectionError> {
        selection::toggle_variant(
            self.engine.results_mut(),
            product_index,
            variant_index,
            checked,
        )
    }

    /// Number of fully checked products.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        selection::checked_products(self.engine.results()).count()
    }

    /// Write the checked products into `collection` at the insertion
    /// position, then close the modal.
    ///
    /// Returns the number of products written. On error the modal stays open.
    ///
    /// # Errors
    ///
    /// Propagates errors from the collection.
    #[instrument(skip(self, collection), fields(position = self.insertion_position))]
    pub fn commit<C>(&mut self, collection: &mut C) -> Result<usize, SelectionError>
    where
        C: OrderedCollection + ?Sized,
    {
        let written = selection::commit(
            self.engine.results(),
            self.insertion_position,
            collection,
        )?;
        self.close();
        Ok(written)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use catalog_picker_core::{ProductId, VariantId};

    use super::*;
    use crate::catalog::{CatalogQuery, Variant};
    use crate::list::ProductList;

    /// Serves `total` products, `variants` variants each, for any search.
    struct FixedCatalog {
        total: usize,
        variants: usize,
    }

    impl CatalogSource for FixedCatalog {
        async fn search(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
            let limit = query.limit as usize;
            let start = (query.page as usize - 1) * limit;
            let end = (start + limit).min(self.total);
            Ok((start..end)
                .map(|i| Product {
                    id: ProductId::new(format!("{}{i}", query.search)),
                    variants: (0..self.variants)
                        .map(|v| Variant {
                            id: VariantId::new(format!("{i}-{v}")),
                            product_id: ProductId::new(i.to_string()),
                            title: format!("Variant {v}"),
                            price: catalog_picker_core::Price::default(),
                            checked: false,
                        })
                        .collect(),
                    ..Product::default()
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_open_fetch_and_scroll() {
        let catalog = FixedCatalog {
            total: 14,
            variants: 0,
        };
        let mut session = PickerSession::new(10);

        let ticket = session.open(0);
        session.fetch(&catalog, ticket).await;
        assert_eq!(session.products().len(), 10);
        assert!(session.engine().has_more());

        let ticket = session.on_sentinel_visible().unwrap();
        session.fetch(&catalog, ticket).await;
        assert_eq!(session.products().len(), 14);
        assert!(session.engine().is_exhausted());
        assert!(session.on_sentinel_visible().is_none());
    }

    #[tokio::test]
    async fn test_selection_survives_next_page() {
        let catalog = FixedCatalog {
            total: 4,
            variants: 2,
        };
        let mut session = PickerSession::new(2);
        let ticket = session.open(0);
        session.fetch(&catalog, ticket).await;
        session.toggle_product(1, true).unwrap();

        let ticket = session.on_sentinel_visible().unwrap();
        session.fetch(&catalog, ticket).await;
        session.toggle_variant(3, 0, true).unwrap();

        assert_eq!(session.products().len(), 4);
        assert_eq!(session.products()[1].checked, CheckState::Checked);
        assert_eq!(session.products()[3].checked, CheckState::Partial);
        assert_eq!(session.checked_count(), 1);
    }

    #[test]
    fn test_closed_session_ignores_input() {
        let mut session = PickerSession::new(10);
        assert!(session.submit_search("shirt").is_none());
        assert!(session.on_sentinel_visible().is_none());
    }

    #[tokio::test]
    async fn test_same_search_not_refetched() {
        let catalog = FixedCatalog {
            total: 3,
            variants: 0,
        };
        let mut session = PickerSession::new(10);
        let ticket = session.open(0);
        session.fetch(&catalog, ticket).await;

        let ticket = session.submit_search("mug").unwrap();
        session.fetch(&catalog, ticket).await;
        assert!(session.submit_search("mug").is_none());
        assert!(session.submit_search("").is_some());
    }

    #[tokio::test]
    async fn test_commit_writes_and_closes() {
        let catalog = FixedCatalog {
            total: 3,
            variants: 1,
        };
        let mut list = ProductList::new();
        list.push_placeholder();

        let mut session = PickerSession::new(10);
        let ticket = session.open(1);
        session.fetch(&catalog, ticket).await;
        session.toggle_product(0, true).unwrap();
        session.toggle_product(2, true).unwrap();

        assert_eq!(session.commit(&mut list).unwrap(), 2);
        assert!(!session.is_open());
        assert!(session.products().is_empty());

        let ids: Vec<&str> = list.products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["", "0", "2"]);
    }

    #[tokio::test]
    async fn test_close_abandons_in_flight_fetch() {
        let catalog = FixedCatalog {
            total: 3,
            variants: 0,
        };
        let mut session = PickerSession::new(10);
        let ticket = session.open(0);
        session.close();

        assert_eq!(session.fetch(&catalog, ticket).await, Completion::Stale);
        assert!(session.products().is_empty());
        assert_eq!(session.engine().search(), "");
    }
}
