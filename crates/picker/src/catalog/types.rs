//! Domain types for catalog products.
//!
//! These types are separate from the raw wire records the search API returns
//! (see `conversions`), and carry the picker's selection state.

use catalog_picker_core::{CheckState, ImageId, Price, ProductId, VariantId};
use serde::{Deserialize, Serialize};

/// Query parameters for one catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search (may be empty).
    pub search: String,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl CatalogQuery {
    /// Build a query.
    #[must_use]
    pub fn new(search: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            search: search.into(),
            page,
            limit,
        }
    }
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Catalog image ID.
    pub id: Option<ImageId>,
    /// Image URL.
    pub src: String,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID.
    pub id: VariantId,
    /// Owning product ID as reported by the catalog.
    ///
    /// Informational only; ownership is containment in [`Product::variants`].
    pub product_id: ProductId,
    /// Variant title (e.g., "XS / Silver").
    pub title: String,
    /// Variant price.
    pub price: Price,
    /// Whether the variant is selected.
    pub checked: bool,
}

/// A catalog product together with its selection state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Product {
    /// Product ID. Empty for placeholder rows.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Display price.
    pub price: Price,
    /// Available quantity.
    pub available: i64,
    /// Optional image.
    pub image: Option<ProductImage>,
    /// Variants in catalog order.
    pub variants: Vec<Variant>,
    /// Tri-state selection.
    pub checked: CheckState,
}

impl Product {
    /// An empty placeholder row, shown before a product has been picked.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Whether this is a placeholder row.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }

    /// Recompute the tri-state flag from the variants.
    ///
    /// A product without variants keeps its directly-set flag.
    pub fn refresh_checked(&mut self) {
        if let Some(state) = CheckState::from_children(self.variants.iter().map(|v| v.checked)) {
            self.checked = state;
        }
    }

    /// Variants currently checked, in order.
    pub fn checked_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|v| v.checked)
    }
}
