//! Selection status for catalog products.

use serde::{Deserialize, Serialize};

/// Tri-state checkbox status of a product.
///
/// For a product with variants the state is derived from the variants:
/// `Checked` when all are checked, `Unchecked` when none are, `Partial`
/// otherwise. A product without variants is only ever `Checked` or
/// `Unchecked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Checked,
    #[default]
    Unchecked,
    Partial,
}

impl CheckState {
    /// Derive the aggregate state from child checked flags.
    ///
    /// Returns `None` for an empty iterator, since a product without
    /// variants has no derived state.
    pub fn from_children<I>(children: I) -> Option<Self>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut any = false;
        let mut all = true;
        let mut seen = false;

        for checked in children {
            seen = true;
            any |= checked;
            all &= checked;
        }

        if !seen {
            return None;
        }

        Some(match (all, any) {
            (true, _) => Self::Checked,
            (false, false) => Self::Unchecked,
            (false, true) => Self::Partial,
        })
    }

    /// Whether the state is fully checked.
    ///
    /// `Partial` is not checked.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        matches!(self, Self::Checked)
    }
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checked => write!(f, "checked"),
            Self::Unchecked => write!(f, "unchecked"),
            Self::Partial => write!(f, "partial"),
        }
    }
}
