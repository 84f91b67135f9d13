//! Subcommand implementations.

pub mod pick;
pub mod search;

use catalog_picker::{CatalogClient, CatalogConfig};
use thiserror::Error;

/// Errors shared by the subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] catalog_picker::ConfigError),

    /// The catalog client failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog_picker::CatalogError),

    /// A catalog request failed while paging.
    #[error("Catalog request failed: {0}")]
    Fetch(String),

    /// Selection or list operation failed.
    #[error("Selection error: {0}")]
    Selection(#[from] catalog_picker::SelectionError),

    /// Requested products were not found in the catalog.
    #[error("Products not found: {}", .0.join(", "))]
    NotFound(Vec<String>),

    /// Output serialization failed.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Load configuration from the environment and build a client.
fn connect() -> Result<(CatalogConfig, CatalogClient), CommandError> {
    let config = CatalogConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    let client = CatalogClient::new(&config)?;
    Ok((config, client))
}
