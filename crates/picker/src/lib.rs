//! Catalog Picker - incremental catalog search and product selection.
//!
//! This crate backs the "select products" modal of a catalog-editing screen:
//! a user searches and scrolls a remote product catalog, checks products and
//! variants, and commits the selection into an ordered, reorderable list.
//!
//! # Architecture
//!
//! - [`catalog`] - `CatalogSource` trait and the REST `CatalogClient`
//! - [`query`] - Pagination / infinite-scroll state machine with stale
//!   response protection
//! - [`selection`] - Tri-state checkbox propagation and commit
//! - [`list`] - The caller-owned ordered product list with per-row discount
//!   state
//! - [`reorder`] - Drag-and-drop move algorithm and gesture capability
//! - [`session`] - One open picker modal tying the above together
//! - [`config`] - Environment configuration
//!
//! Rendering, pointer handling and persistence live outside this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_picker::{CatalogClient, CatalogConfig, PickerSession, ProductList};
//!
//! let config = CatalogConfig::from_env()?;
//! let client = CatalogClient::new(&config)?;
//! let mut list = ProductList::new();
//!
//! let mut session = PickerSession::new(config.page_size);
//! let ticket = session.open(0);
//! session.fetch(&client, ticket).await;
//! session.toggle_product(0, true)?;
//! session.commit(&mut list)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod list;
pub mod query;
pub mod reorder;
pub mod selection;
pub mod session;

pub use catalog::{CatalogClient, CatalogError, CatalogQuery, CatalogSource, Product, Variant};
pub use config::{CatalogConfig, ConfigError};
pub use list::{ListEntry, OrderedCollection, ProductList, VariantLine};
pub use query::{Completion, FetchTicket, QueryEngine, QueryPhase};
pub use reorder::{ReorderGesture, reorder};
pub use selection::SelectionError;
pub use session::PickerSession;
