//! Incremental catalog fetch state machine.
//!
//! The engine never performs I/O on its own. Every transition into
//! `Loading` hands out a [`FetchTicket`]; the caller runs the request and
//! feeds the outcome back through [`QueryEngine::complete`]. Tickets carry a
//! sequence number, and only the most recently issued ticket may change
//! state, so a slow response for an old search can never overwrite a newer
//! one.

use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogQuery, CatalogSource, Product};

/// Where the engine is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last request succeeded.
    Loaded,
    /// The last request failed.
    Error,
}

/// Permission to run one catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a ticket does nothing until its request is run and completed"]
pub struct FetchTicket {
    seq: u64,
    query: CatalogQuery,
}

impl FetchTicket {
    /// The request to run.
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Sequence number of this ticket.
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

/// What applying a completed request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A newer ticket was issued; the result was dropped.
    Stale,
    /// Results were stored.
    Loaded { received: usize, has_more: bool },
    /// The request failed; results were cleared.
    Failed,
}

/// Search, pagination and accumulated results for the picker.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    search: String,
    page: u32,
    limit: u32,
    results: Vec<Product>,
    phase: QueryPhase,
    error: Option<String>,
    has_more: bool,
    loaded_page: u32,
    issued: u64,
}

impl QueryEngine {
    /// Create an idle engine requesting `limit` products per page.
    ///
    /// A zero limit is treated as one.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            search: String::new(),
            page: 1,
            limit: limit.max(1),
            results: Vec::new(),
            phase: QueryPhase::Idle,
            error: None,
            has_more: false,
            loaded_page: 0,
            issued: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// All products fetched for the current search, across pages.
    #[must_use]
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub(crate) fn results_mut(&mut self) -> &mut [Product] {
        &mut self.results
    }

    #[must_use]
    pub const fn phase(&self) -> QueryPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, QueryPhase::Loading)
    }

    /// Message of the last failure, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether the catalog has been read to the end for this search.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.phase, QueryPhase::Loaded) && !self.has_more
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Request the first page for the current search.
    pub fn start(&mut self) -> FetchTicket {
        self.page = 1;
        self.loaded_page = 0;
        self.results.clear();
        self.has_more = false;
        self.issue()
    }

    /// Change the search text and request its first page.
    ///
    /// Supersedes any outstanding request.
    pub fn set_search(&mut self, search: impl Into<String>) -> FetchTicket {
        self.search = search.into();
        self.start()
    }

    /// Request the next page, as triggered by the scroll sentinel.
    ///
    /// Returns `None` while loading or when the catalog is exhausted. A
    /// failure cleared the accumulated results, so after one the search is
    /// reloaded from its first page.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        match self.phase {
            QueryPhase::Loading | QueryPhase::Idle => None,
            QueryPhase::Error => Some(self.start()),
            QueryPhase::Loaded if self.has_more => {
                self.page += 1;
                Some(self.issue())
            }
            QueryPhase::Loaded => None,
        }
    }

    /// Reload the current search from its first page after a failure.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        matches!(self.phase, QueryPhase::Error).then(|| self.start())
    }

    /// Apply the outcome of a ticket's request.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<Product>, CatalogError>,
    ) -> Completion {
        if ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                search = %ticket.query.search,
                page = ticket.query.page,
                "Discarding stale catalog response"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(products) => {
                let received = products.len();
                if ticket.query.page == 1 {
                    self.results = products;
                } else {
                    self.results.extend(products);
                }
                self.has_more = u32::try_from(received).is_ok_and(|n| n == self.limit);
                self.loaded_page = ticket.query.page;
                self.error = None;
                self.phase = QueryPhase::Loaded;

                debug!(
                    page = ticket.query.page,
                    received,
                    total = self.results.len(),
                    has_more = self.has_more,
                    "Catalog page loaded"
                );
                Completion::Loaded {
                    received,
                    has_more: self.has_more,
                }
            }
            Err(err) => {
                warn!(
                    error = %err,
                    search = %ticket.query.search,
                    page = ticket.query.page,
                    "Catalog fetch failed"
                );
                self.results.clear();
                self.has_more = false;
                self.loaded_page = 0;
                self.error = Some(err.to_string());
                self.phase = QueryPhase::Error;
                Completion::Failed
            }
        }
    }

    /// Run a ticket's request against `source` and apply the outcome.
    pub async fn fetch<S>(&mut self, source: &S, ticket: FetchTicket) -> Completion
    where
        S: CatalogSource + ?Sized,
    {
        let outcome = source.search(ticket.query()).await;
        self.complete(&ticket, outcome)
    }

    /// Make every outstanding ticket stale without changing results.
    ///
    /// An abandoned page request is rolled back, so the next scroll asks for
    /// the same page again.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        if self.is_loading() {
            self.page = self.loaded_page.max(1);
            self.phase = if self.loaded_page == 0 {
                QueryPhase::Idle
            } else {
                QueryPhase::Loaded
            };
        }
    }

    /// Clear search, page and results, and abandon outstanding requests.
    pub fn reset(&mut self) {
        self.invalidate();
        self.search.clear();
        self.page = 1;
        self.loaded_page = 0;
        self.results.clear();
        self.phase = QueryPhase::Idle;
        self.error = None;
        self.has_more = false;
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        self.phase = QueryPhase::Loading;
        self.error = None;
        FetchTicket {
            seq: self.issued,
            query: CatalogQuery::new(self.search.clone(), self.page, self.limit),
        }
    }
}
