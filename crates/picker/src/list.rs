//! The caller-owned ordered product list.
//!
//! Each row is a [`ListEntry`] that carries its own discount state and its own
//! variant lines, so moving or removing a row moves or removes everything
//! attached to it. Positions are vector indices and therefore always
//! contiguous.

use catalog_picker_core::{Discount, LineKey, VariantId};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Product, Variant};
use crate::reorder::{ReorderGesture, reorder};
use crate::selection::SelectionError;

/// Write access to an ordered, position-keyed product collection.
///
/// This is the only way the selection commit touches the caller's list.
pub trait OrderedCollection {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the collection has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Put `product` at `position`, replacing the entry there or appending
    /// when `position == len()`. Unchecked variants are not kept.
    ///
    /// # Errors
    ///
    /// Returns an error when `position > len()`.
    fn add(&mut self, position: usize, product: Product) -> Result<(), SelectionError>;

    /// Remove the entry at `position`, shifting later entries down by one.
    ///
    /// # Errors
    ///
    /// Returns an error when `position` does not exist.
    fn remove(&mut self, position: usize) -> Result<Product, SelectionError>;
}

// =============================================================================
// Lines
// =============================================================================

/// A committed variant under a list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantLine {
    variant: Variant,
    discount_visible: bool,
    discount: Option<Discount>,
}

impl VariantLine {
    fn new(variant: Variant) -> Self {
        Self {
            variant,
            discount_visible: false,
            discount: None,
        }
    }

    #[must_use]
    pub const fn variant(&self) -> &Variant {
        &self.variant
    }

    #[must_use]
    pub const fn discount_visible(&self) -> bool {
        self.discount_visible
    }

    #[must_use]
    pub const fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }
}

/// One row of the ordered product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    key: LineKey,
    product: Product,
    discount_visible: bool,
    discount: Option<Discount>,
    variants: Vec<VariantLine>,
}

impl ListEntry {
    /// Build an entry; checked variants move out of the product into lines.
    fn new(key: LineKey, mut product: Product) -> Self {
        let variants = product
            .variants
            .drain(..)
            .filter(|v| v.checked)
            .map(VariantLine::new)
            .collect();

        Self {
            key,
            product,
            discount_visible: false,
            discount: None,
            variants,
        }
    }

    /// Stable row identity.
    #[must_use]
    pub const fn key(&self) -> LineKey {
        self.key
    }

    /// The product shown in this row.
    ///
    /// Its variants live in [`ListEntry::variant_lines`].
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Variant lines in display order.
    #[must_use]
    pub fn variant_lines(&self) -> &[VariantLine] {
        &self.variants
    }

    /// Take the product back out of the row, with its variant lines restored
    /// as variants in display order.
    #[must_use]
    pub fn into_product(self) -> Product {
        let mut product = self.product;
        product.variants = self.variants.into_iter().map(|line| line.variant).collect();
        product
    }

    /// Whether the discount editor is shown for this row.
    #[must_use]
    pub const fn discount_visible(&self) -> bool {
        self.discount_visible
    }

    /// Discount configured for this row.
    #[must_use]
    pub const fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    /// Flip the discount editor; returns the new visibility.
    pub const fn toggle_discount(&mut self) -> bool {
        self.discount_visible = !self.discount_visible;
        self.discount_visible
    }

    /// Set or clear this row's discount. Setting one also shows the editor.
    pub const fn set_discount(&mut self, discount: Option<Discount>) {
        if discount.is_some() {
            self.discount_visible = true;
        }
        self.discount = discount;
    }

    /// Position of a variant line by ID.
    #[must_use]
    pub fn variant_position(&self, id: &VariantId) -> Option<usize> {
        self.variants.iter().position(|line| &line.variant.id == id)
    }

    /// Flip the discount editor of one variant line.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn toggle_variant_discount(&mut self, index: usize) -> Result<bool, SelectionError> {
        let line = self.line_mut(index)?;
        line.discount_visible = !line.discount_visible;
        Ok(line.discount_visible)
    }

    /// Set or clear the discount of one variant line.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn set_variant_discount(
        &mut self,
        index: usize,
        discount: Option<Discount>,
    ) -> Result<(), SelectionError> {
        let line = self.line_mut(index)?;
        if discount.is_some() {
            line.discount_visible = true;
        }
        line.discount = discount;
        Ok(())
    }

    /// Remove a variant line by ID.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownVariant`] if no line has this ID.
    pub fn remove_variant(&mut self, id: &VariantId) -> Result<VariantLine, SelectionError> {
        let index = self
            .variant_position(id)
            .ok_or_else(|| SelectionError::UnknownVariant(id.clone()))?;
        Ok(self.variants.remove(index))
    }

    /// Move a variant line from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is out of range.
    pub fn reorder_variants(&mut self, source: usize, target: usize) -> Result<(), SelectionError> {
        reorder(&mut self.variants, source, target)
    }

    fn line_mut(&mut self, index: usize) -> Result<&mut VariantLine, SelectionError> {
        let len = self.variants.len();
        self.variants
            .get_mut(index)
            .ok_or(SelectionError::PositionOutOfRange {
                position: index,
                len,
            })
    }
}

impl ReorderGesture for ListEntry {
    type Key = VariantId;

    fn on_reorder_gesture(
        &mut self,
        source: &VariantId,
        target: &VariantId,
    ) -> Result<(), SelectionError> {
        let from = self
            .variant_position(source)
            .ok_or_else(|| SelectionError::UnknownVariant(source.clone()))?;
        let to = self
            .variant_position(target)
            .ok_or_else(|| SelectionError::UnknownVariant(target.clone()))?;
        self.reorder_variants(from, to)
    }
}

// =============================================================================
// ProductList
// =============================================================================

/// Ordered list of products being assembled on the editing screen.
///
/// Never empty: it starts with one placeholder row and refuses to remove its
/// last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductList {
    entries: Vec<ListEntry>,
    #[serde(skip)]
    next_key: LineKey,
}

impl Default for ProductList {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductList {
    /// A list with a single placeholder row.
    #[must_use]
    pub fn new() -> Self {
        let mut list = Self {
            entries: Vec::new(),
            next_key: LineKey::new(0),
        };
        list.push_placeholder();
        list
    }

    /// A list holding `products` in order, or a placeholder if there are none.
    #[must_use]
    pub fn with_products<I>(products: I) -> Self
    where
        I: IntoIterator<Item = Product>,
    {
        let mut list = Self {
            entries: Vec::new(),
            next_key: LineKey::new(0),
        };
        for product in products {
            let entry = list.new_entry(product);
            list.entries.push(entry);
        }
        if list.entries.is_empty() {
            list.push_placeholder();
        }
        list
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the list keeps at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order; the index is the position.
    #[must_use]
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// Products in display order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.entries.iter().map(ListEntry::product)
    }

    /// Entry at `position`.
    #[must_use]
    pub fn entry(&self, position: usize) -> Option<&ListEntry> {
        self.entries.get(position)
    }

    /// Mutable entry at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is out of range.
    pub fn entry_mut(&mut self, position: usize) -> Result<&mut ListEntry, SelectionError> {
        let len = self.entries.len();
        self.entries
            .get_mut(position)
            .ok_or(SelectionError::PositionOutOfRange { position, len })
    }

    /// Current position of a row.
    #[must_use]
    pub fn position_of(&self, key: LineKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Append an empty placeholder row.
    pub fn push_placeholder(&mut self) -> LineKey {
        let entry = self.new_entry(Product::placeholder());
        let key = entry.key;
        self.entries.push(entry);
        key
    }

    /// Put `product` at `position`, replacing the row there or appending at
    /// `len()`. A replaced row loses its discount state.
    ///
    /// # Errors
    ///
    /// Returns an error when `position > len()`.
    pub fn add(&mut self, position: usize, product: Product) -> Result<LineKey, SelectionError> {
        let len = self.entries.len();
        if position > len {
            return Err(SelectionError::PositionOutOfRange { position, len });
        }

        let entry = self.new_entry(product);
        let key = entry.key;
        if let Some(slot) = self.entries.get_mut(position) {
            *slot = entry;
        } else {
            self.entries.push(entry);
        }

        debug!(position, %key, "Added product to list");
        Ok(key)
    }

    /// Remove the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is out of range or it is the only row.
    pub fn remove(&mut self, position: usize) -> Result<ListEntry, SelectionError> {
        let len = self.entries.len();
        if position >= len {
            return Err(SelectionError::PositionOutOfRange { position, len });
        }
        if len == 1 {
            return Err(SelectionError::LastEntry);
        }

        let entry = self.entries.remove(position);
        debug!(position, key = %entry.key, "Removed product from list");
        Ok(entry)
    }

    /// Remove one variant line from the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the position or variant does not exist.
    pub fn remove_variant(
        &mut self,
        position: usize,
        id: &VariantId,
    ) -> Result<VariantLine, SelectionError> {
        self.entry_mut(position)?.remove_variant(id)
    }

    /// Flip the discount editor of the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is out of range.
    pub fn toggle_discount(&mut self, position: usize) -> Result<bool, SelectionError> {
        Ok(self.entry_mut(position)?.toggle_discount())
    }

    /// Set or clear the discount of the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is out of range.
    pub fn set_discount(
        &mut self,
        position: usize,
        discount: Option<Discount>,
    ) -> Result<(), SelectionError> {
        self.entry_mut(position)?.set_discount(discount);
        Ok(())
    }

    /// Move the row at `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is out of range.
    pub fn reorder(&mut self, source: usize, target: usize) -> Result<(), SelectionError> {
        reorder(&mut self.entries, source, target)?;
        debug!(source, target, "Reordered list");
        Ok(())
    }

    /// Move a variant line within the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the row or the source line does not exist.
    pub fn reorder_variants(
        &mut self,
        position: usize,
        source: usize,
        target: usize,
    ) -> Result<(), SelectionError> {
        self.entry_mut(position)?.reorder_variants(source, target)
    }

    fn new_entry(&mut self, product: Product) -> ListEntry {
        let key = self.next_key;
        self.next_key = key.next();
        ListEntry::new(key, product)
    }
}

impl OrderedCollection for ProductList {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn add(&mut self, position: usize, product: Product) -> Result<(), SelectionError> {
        Self::add(self, position, product).map(|_| ())
    }

    fn remove(&mut self, position: usize) -> Result<Product, SelectionError> {
        Self::remove(self, position).map(ListEntry::into_product)
    }
}

impl ReorderGesture for ProductList {
    type Key = LineKey;

    fn on_reorder_gesture(
        &mut self,
        source: &LineKey,
        target: &LineKey,
    ) -> Result<(), SelectionError> {
        let from = self
            .position_of(*source)
            .ok_or(SelectionError::UnknownLine(*source))?;
        let to = self
            .position_of(*target)
            .ok_or(SelectionError::UnknownLine(*target))?;
        self.reorder(from, to)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use catalog_picker_core::{DiscountKind, Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, variants: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_amount(Decimal::TEN),
            variants: variants
                .iter()
                .map(|v| Variant {
                    id: VariantId::new(*v),
                    product_id: ProductId::new(id),
                    title: (*v).to_string(),
                    price: Price::from_amount(Decimal::TEN),
                    checked: true,
                })
                .collect(),
            ..Product::default()
        }
    }

    fn ids(list: &ProductList) -> Vec<String> {
        list.products().map(|p| p.id.to_string()).collect()
    }

    fn five() -> ProductList {
        ProductList::with_products(["p0", "p1", "p2", "p3", "p4"].map(|id| product(id, &[])))
    }

    #[test]
    fn test_new_list_has_placeholder() {
        let list = ProductList::new();
        assert_eq!(list.len(), 1);
        assert!(list.entries()[0].product().is_placeholder());
    }

    #[test]
    fn test_add_overwrites_and_appends() {
        let mut list = ProductList::new();
        list.add(0, product("a", &[])).unwrap();
        list.add(1, product("b", &[])).unwrap();
        assert_eq!(ids(&list), ["a", "b"]);

        assert_eq!(
            list.add(3, product("c", &[])),
            Err(SelectionError::PositionOutOfRange { position: 3, len: 2 })
        );
    }

    #[test]
    fn test_add_keeps_only_checked_variants() {
        let mut p = product("a", &["v1", "v2"]);
        p.variants[1].checked = false;
        let list = ProductList::with_products([p]);
        let lines = list.entries()[0].variant_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].variant().id.as_str(), "v1");
    }

    #[test]
    fn test_remove_rekeys_positions() {
        let mut list = five();
        list.toggle_discount(3).unwrap();
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.product().id.as_str(), "p1");
        assert_eq!(ids(&list), ["p0", "p2", "p3", "p4"]);
        // The discount flag moved with its row
        assert!(list.entries()[2].discount_visible());
        assert!(!list.entries()[1].discount_visible());
    }

    #[test]
    fn test_collection_remove_returns_added_product() {
        let mut list = five();
        let added = product("new", &["v1", "v2", "v3"]);
        OrderedCollection::add(&mut list, 2, added.clone()).unwrap();
        list.reorder_variants(2, 0, 2).unwrap();

        let removed = OrderedCollection::remove(&mut list, 2).unwrap();
        let variants: Vec<&str> = removed.variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(variants, ["v2", "v3", "v1"]);

        OrderedCollection::add(&mut list, 2, added.clone()).unwrap();
        assert_eq!(OrderedCollection::remove(&mut list, 2).unwrap(), added);
    }

    #[test]
    fn test_remove_last_entry_refused() {
        let mut list = ProductList::new();
        assert_eq!(list.remove(0).unwrap_err(), SelectionError::LastEntry);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = five();
        assert!(matches!(
            list.remove(5),
            Err(SelectionError::PositionOutOfRange { position: 5, len: 5 })
        ));
    }

    #[test]
    fn test_reorder_moves_discount_state() {
        let mut list = five();
        list.toggle_discount(3).unwrap();
        list.reorder(3, 0).unwrap();
        assert_eq!(ids(&list), ["p3", "p0", "p1", "p2", "p4"]);
        assert!(list.entries()[0].discount_visible());
        assert!(list.entries().iter().skip(1).all(|e| !e.discount_visible()));
    }

    #[test]
    fn test_gesture_by_line_key() {
        let mut list = five();
        let source = list.entries()[4].key();
        let target = list.entries()[1].key();
        list.on_reorder_gesture(&source, &target).unwrap();
        assert_eq!(ids(&list), ["p0", "p4", "p1", "p2", "p3"]);
        assert_eq!(list.position_of(source), Some(1));
    }

    #[test]
    fn test_gesture_unknown_key() {
        let mut list = five();
        let known = list.entries()[0].key();
        let unknown = LineKey::new(999);
        assert_eq!(
            list.on_reorder_gesture(&unknown, &known),
            Err(SelectionError::UnknownLine(unknown))
        );
    }

    #[test]
    fn test_variant_reorder_and_gesture() {
        let mut list = ProductList::with_products([product("a", &["v0", "v1", "v2"])]);
        list.reorder_variants(0, 2, 0).unwrap();
        let order: Vec<&str> = list.entries()[0]
            .variant_lines()
            .iter()
            .map(|l| l.variant().id.as_str())
            .collect();
        assert_eq!(order, ["v2", "v0", "v1"]);

        let entry = list.entry_mut(0).unwrap();
        entry
            .on_reorder_gesture(&VariantId::new("v2"), &VariantId::new("v1"))
            .unwrap();
        let order: Vec<&str> = entry
            .variant_lines()
            .iter()
            .map(|l| l.variant().id.as_str())
            .collect();
        assert_eq!(order, ["v0", "v1", "v2"]);
    }

    #[test]
    fn test_remove_variant() {
        let mut list = ProductList::with_products([product("a", &["v0", "v1"])]);
        let removed = list.remove_variant(0, &VariantId::new("v0")).unwrap();
        assert_eq!(removed.variant().id.as_str(), "v0");
        assert_eq!(list.entries()[0].variant_lines().len(), 1);
        assert_eq!(
            list.remove_variant(0, &VariantId::new("v0")),
            Err(SelectionError::UnknownVariant(VariantId::new("v0")))
        );
    }

    #[test]
    fn test_variant_discount_flags_are_per_line() {
        let mut list = ProductList::with_products([product("a", &["v0", "v1"])]);
        let entry = list.entry_mut(0).unwrap();
        assert!(entry.toggle_variant_discount(1).unwrap());
        assert!(!entry.variant_lines()[0].discount_visible());
        assert!(!entry.discount_visible());
        assert!(entry.toggle_variant_discount(2).is_err());
    }

    #[test]
    fn test_set_discount_shows_editor() {
        let mut list = five();
        let discount = Discount::new(Decimal::new(15, 0), DiscountKind::Percent).unwrap();
        list.set_discount(2, Some(discount)).unwrap();
        let entry = &list.entries()[2];
        assert!(entry.discount_visible());
        assert_eq!(entry.discount(), Some(&discount));

        // Rows without variant lines have nothing to discount
        assert!(
            list.entry_mut(2)
                .unwrap()
                .set_variant_discount(0, Some(discount))
                .is_err()
        );
    }

    #[test]
    fn test_replaced_row_gets_fresh_key() {
        let mut list = ProductList::new();
        let old = list.entries()[0].key();
        let new = list.add(0, product("a", &[])).unwrap();
        assert_ne!(old, new);
        assert_eq!(list.position_of(old), None);
    }

    #[test]
    fn test_with_products_empty_gets_placeholder() {
        let list = ProductList::with_products(Vec::new());
        assert_eq!(list.len(), 1);
    }
}
