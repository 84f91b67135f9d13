//! Cache types for catalog pages.

use super::types::CatalogQuery;

/// Cache key for an unfiltered catalog page.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct PageKey {
    pub page: u32,
    pub limit: u32,
}

impl PageKey {
    /// Key for a query, or `None` when the query carries search text.
    pub fn for_query(query: &CatalogQuery) -> Option<Self> {
        query.search.is_empty().then_some(Self {
            page: query.page,
            limit: query.limit,
        })
    }
}
