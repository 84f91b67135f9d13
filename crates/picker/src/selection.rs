//! Tri-state selection over fetched products, and commit into a list.
//!
//! Toggles operate on the transient result list held by the query engine.
//! Nothing outside that list changes until [`commit`] writes the fully
//! checked products into the caller's [`OrderedCollection`].

use catalog_picker_core::{CheckState, DiscountError, LineKey, VariantId};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Product;
use crate::list::OrderedCollection;

/// Errors from selection and list operations.
///
/// These indicate the caller and the picker disagree about positions; they
/// are returned instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No product at this index of the result list.
    #[error("product index {index} out of range (len {len})")]
    ProductOutOfRange { index: usize, len: usize },

    /// No variant at this index of a product.
    #[error("variant index {index} out of range for product {product} (len {len})")]
    VariantOutOfRange {
        product: usize,
        index: usize,
        len: usize,
    },

    /// No entry at this position of an ordered list.
    #[error("position {position} out of range (len {len})")]
    PositionOutOfRange { position: usize, len: usize },

    /// Attempted to remove the only remaining list entry.
    #[error("cannot remove the last remaining entry")]
    LastEntry,

    /// A drag gesture referenced a row that is not in the list.
    #[error("unknown list line: {0}")]
    UnknownLine(LineKey),

    /// A variant ID is not among an entry's variant lines.
    #[error("unknown variant: {0}")]
    UnknownVariant(VariantId),

    /// A discount failed validation.
    #[error("invalid discount: {0}")]
    Discount(#[from] DiscountError),
}

/// Check or uncheck a product and all of its variants.
///
/// The product ends fully determined: `Checked` or `Unchecked`, never
/// `Partial`.
///
/// # Errors
///
/// Returns [`SelectionError::ProductOutOfRange`] for a bad index.
pub fn toggle_product(
    products: &mut [Product],
    product_index: usize,
    checked: bool,
) -> Result<(), SelectionError> {
    let product = product_mut(products, product_index)?;

    for variant in &mut product.variants {
        variant.checked = checked;
    }
    product.checked = CheckState::from(checked);

    debug!(product = %product.id, checked, "Toggled product");
    Ok(())
}

/// Check or uncheck one variant and recompute its product's state.
///
/// Returns the product's new state.
///
/// # Errors
///
/// Returns an error if either index is out of range.
pub fn toggle_variant(
    products: &mut [Product],
    product_index: usize,
    variant_index: usize,
    checked: bool,
) -> Result<CheckState, SelectionError> {
    let product = product_mut(products, product_index)?;

    let len = product.variants.len();
    let variant = product
        .variants
        .get_mut(variant_index)
        .ok_or(SelectionError::VariantOutOfRange {
            product: product_index,
            index: variant_index,
            len,
        })?;
    variant.checked = checked;
    product.refresh_checked();

    debug!(
        product = %product.id,
        variant_index,
        checked,
        state = %product.checked,
        "Toggled variant"
    );
    Ok(product.checked)
}

/// Products that are fully checked, in result order.
///
/// `Partial` products are not included.
pub fn checked_products(products: &[Product]) -> impl Iterator<Item = &Product> {
    products.iter().filter(|p| p.checked.is_checked())
}

/// Write every fully checked product into `collection`.
///
/// Products are written at consecutive positions starting at
/// `insertion_position`, overwriting existing entries and appending past the
/// end. An insertion position beyond the end of the collection starts at the
/// end. Only checked variants are carried over.
///
/// Returns the number of products written.
///
/// # Errors
///
/// Propagates any error from the collection.
pub fn commit<C>(
    products: &[Product],
    insertion_position: usize,
    collection: &mut C,
) -> Result<usize, SelectionError>
where
    C: OrderedCollection + ?Sized,
{
    let mut position = insertion_position.min(collection.len());
    let mut written = 0;

    for product in checked_products(products) {
        let mut committed = product.clone();
        committed.variants.retain(|v| v.checked);
        collection.add(position, committed)?;
        position += 1;
        written += 1;
    }

    info!(
        insertion_position,
        written,
        len = collection.len(),
        "Committed selection"
    );
    Ok(written)
}

fn product_mut(products: &mut [Product], index: usize) -> Result<&mut Product, SelectionError> {
    let len = products.len();
    products
        .get_mut(index)
        .ok_or(SelectionError::ProductOutOfRange { index, len })
}
