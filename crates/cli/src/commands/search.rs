//! Catalog browsing.
//!
//! # Usage
//!
//! ```bash
//! picker-cli search --query shirt --pages 2
//! ```

use catalog_picker::{Completion, Product, QueryEngine};
use tracing::info;

use super::{CommandError, connect};

/// Fetch up to `pages` pages for `query` and print one line per product.
///
/// # Errors
///
/// Returns an error if configuration is missing or a request fails.
pub async fn run(query: &str, pages: u32) -> Result<(), CommandError> {
    let (config, client) = connect()?;
    let mut engine = QueryEngine::new(config.page_size);

    let mut ticket = Some(engine.set_search(query));
    let mut fetched = 0;
    while let Some(current) = ticket.take() {
        match engine.fetch(&client, current).await {
            Completion::Failed => {
                return Err(CommandError::Fetch(
                    engine.error().unwrap_or_default().to_string(),
                ));
            }
            Completion::Loaded { .. } | Completion::Stale => {}
        }
        fetched += 1;
        if fetched < pages {
            ticket = engine.next_page();
        }
    }

    for product in engine.results() {
        print_product(product);
    }

    info!(
        products = engine.results().len(),
        pages = fetched,
        exhausted = engine.is_exhausted(),
        "Search finished"
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_product(product: &Product) {
    println!(
        "{:>14}  {:<40}  {:>10} {}  {} variant(s)",
        product.id.as_str(),
        product.title,
        product.price.display(),
        product.price.currency_code.code(),
        product.variants.len()
    );
}
