//! Per-line discount configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Discount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// The discount value is below zero.
    #[error("discount cannot be negative")]
    Negative,
    /// A percentage discount exceeds 100%.
    #[error("percentage discount must be at most {max}%")]
    PercentTooLarge {
        /// Maximum allowed percentage.
        max: Decimal,
    },
}

/// How a discount value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// A fixed amount off the price.
    #[default]
    Flat,
    /// A percentage off the price.
    Percent,
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flat => write!(f, "flat off"),
            Self::Percent => write!(f, "% off"),
        }
    }
}

impl std::str::FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "percent" => Ok(Self::Percent),
            _ => Err(format!("invalid discount kind: {s}")),
        }
    }
}

/// A validated discount attached to a list entry or variant line.
///
/// ## Constraints
///
/// - The value is never negative
/// - A `Percent` value is at most 100
///
/// ```
/// use catalog_picker_core::{Discount, DiscountKind};
/// use rust_decimal::Decimal;
///
/// assert!(Discount::new(Decimal::new(15, 0), DiscountKind::Percent).is_ok());
/// assert!(Discount::new(Decimal::new(150, 0), DiscountKind::Percent).is_err());
/// assert!(Discount::new(Decimal::new(-1, 0), DiscountKind::Flat).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiscountRecord")]
pub struct Discount {
    value: Decimal,
    kind: DiscountKind,
}

/// Unvalidated serialized form of a [`Discount`].
#[derive(Deserialize)]
struct DiscountRecord {
    value: Decimal,
    kind: DiscountKind,
}

impl TryFrom<DiscountRecord> for Discount {
    type Error = DiscountError;

    fn try_from(record: DiscountRecord) -> Result<Self, Self::Error> {
        Self::new(record.value, record.kind)
    }
}

impl Discount {
    /// Build a discount, validating its value against its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative, or if a percentage is
    /// larger than 100.
    pub fn new(value: Decimal, kind: DiscountKind) -> Result<Self, DiscountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DiscountError::Negative);
        }

        let max = Decimal::ONE_HUNDRED;
        if kind == DiscountKind::Percent && value > max {
            return Err(DiscountError::PercentTooLarge { max });
        }

        Ok(Self { value, kind })
    }

    /// The discount value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// How the value is applied.
    #[must_use]
    pub const fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// Apply the discount to an amount, never going below zero.
    #[must_use]
    pub fn apply(&self, amount: Decimal) -> Decimal {
        let reduced = match self.kind {
            DiscountKind::Flat => amount - self.value,
            DiscountKind::Percent => amount - amount * self.value / Decimal::ONE_HUNDRED,
        };
        reduced.max(Decimal::ZERO)
    }
}
