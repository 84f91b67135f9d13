//! Catalog Picker Core - Shared types library.
//!
//! This crate provides common types used across all catalog picker components:
//! - `picker` - Query engine, selection reconciler and ordered product list
//! - `cli` - Command-line front end for browsing and picking products
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, discounts and check states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
