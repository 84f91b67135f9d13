//! Core types for the catalog picker.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod discount;
pub mod id;
pub mod price;
pub mod status;

pub use discount::{Discount, DiscountError, DiscountKind};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::CheckState;
