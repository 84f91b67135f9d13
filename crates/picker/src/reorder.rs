//! Drag-and-drop reordering of ordered sequences.
//!
//! The same move is used for top-level list entries and for the variant lines
//! inside one entry. Positions are plain indices, so after a move they are
//! contiguous `0..len` by construction.

use crate::selection::SelectionError;

/// Move the element at `source` so that it ends up at `target`.
///
/// Elements between the two positions shift by one toward `source`. A
/// `target` past the end clamps to the last position, and `source == target`
/// is a no-op. Moving `a` to `b` and then `b` back to `a` restores the
/// original order.
///
/// # Errors
///
/// Returns [`SelectionError::PositionOutOfRange`] if `source` does not exist.
///
/// # Example
///
/// ```
/// use catalog_picker::reorder::reorder;
///
/// let mut items = vec!["a", "b", "c", "d", "e"];
/// reorder(&mut items, 3, 0).unwrap();
/// assert_eq!(items, ["d", "a", "b", "c", "e"]);
/// ```
pub fn reorder<T>(items: &mut [T], source: usize, target: usize) -> Result<(), SelectionError> {
    let len = items.len();
    if source >= len {
        return Err(SelectionError::PositionOutOfRange {
            position: source,
            len,
        });
    }

    let target = target.min(len - 1);
    if source == target {
        return Ok(());
    }

    if source < target {
        if let Some(span) = items.get_mut(source..=target) {
            span.rotate_left(1);
        }
    } else if let Some(span) = items.get_mut(target..=source) {
        span.rotate_right(1);
    }

    Ok(())
}

/// Capability for applying drag gestures by item identity.
///
/// Pointer handling stays outside the picker: whatever input layer is in use
/// reports "item `source` was dropped on item `target`", and the implementor
/// resolves both keys to positions and applies [`reorder`].
pub trait ReorderGesture {
    /// Identity of a draggable item.
    type Key: ?Sized;

    /// Apply a drop of `source` onto `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if either key does not resolve to an item.
    fn on_reorder_gesture(
        &mut self,
        source: &Self::Key,
        target: &Self::Key,
    ) -> Result<(), SelectionError>;
}
