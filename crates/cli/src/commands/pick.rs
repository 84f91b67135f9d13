//! Product picking.
//!
//! Drives a picker session the way the editing screen does: open at a list
//! position, search, scroll until every requested product has been seen,
//! check them and commit.
//!
//! # Usage
//!
//! ```bash
//! picker-cli pick --query shirt --product 77 --product 80 --at 0
//! picker-cli pick --query shirt --product 77 --discount 15 --discount-kind percent
//! ```

use catalog_picker::{Completion, PickerSession, ProductList, SelectionError};
use catalog_picker_core::{Discount, DiscountKind, ProductId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::{CommandError, connect};

/// Arguments of one `pick` run.
#[derive(Debug)]
pub struct PickRequest<'a> {
    pub query: &'a str,
    pub product_ids: &'a [String],
    pub at: usize,
    pub max_pages: u32,
    pub discount: Option<(Decimal, DiscountKind)>,
}

/// Check the requested products among the search results and print the list.
///
/// # Errors
///
/// Returns an error if the discount is invalid, a request fails, a product is
/// never found, or the list rejects the commit.
pub async fn run(request: &PickRequest<'_>) -> Result<(), CommandError> {
    // Validate before touching the network
    let discount = request
        .discount
        .map(|(value, kind)| Discount::new(value, kind))
        .transpose()
        .map_err(SelectionError::from)?;

    let (config, client) = connect()?;
    let wanted: Vec<ProductId> = request.product_ids.iter().map(ProductId::new).collect();

    let mut list = ProductList::new();
    for _ in 0..request.at {
        list.push_placeholder();
    }

    let mut session = PickerSession::new(config.page_size);
    let opened = session.open(request.at);
    let mut ticket = Some(session.submit_search(request.query).unwrap_or(opened));

    let mut pages = 0;
    while let Some(current) = ticket.take() {
        if session.fetch(&client, current).await == Completion::Failed {
            return Err(CommandError::Fetch(
                session.engine().error().unwrap_or_default().to_string(),
            ));
        }
        pages += 1;

        let all_seen = wanted
            .iter()
            .all(|id| session.products().iter().any(|p| &p.id == id));
        if !all_seen && pages < request.max_pages {
            ticket = session.on_sentinel_visible();
        }
    }

    let mut missing = Vec::new();
    for id in &wanted {
        match session.products().iter().position(|p| &p.id == id) {
            Some(index) => session.toggle_product(index, true)?,
            None => missing.push(id.to_string()),
        }
    }
    if !missing.is_empty() {
        warn!(?missing, pages, "Requested products not found");
        return Err(CommandError::NotFound(missing));
    }

    let written = session.commit(&mut list)?;
    info!(written, position = request.at, "Products picked");

    if let Some(discount) = discount {
        apply_discount(&mut list, request.at, written, discount)?;
    }

    print_list(&list)
}

/// Attach `discount` to the `count` rows starting at `start`.
///
/// Returns the discounted price of each row.
fn apply_discount(
    list: &mut ProductList,
    start: usize,
    count: usize,
    discount: Discount,
) -> Result<Vec<Decimal>, SelectionError> {
    let start = start.min(list.len().saturating_sub(count));
    (start..start + count)
        .map(|position| {
            list.set_discount(position, Some(discount))?;
            let product = list
                .entry(position)
                .map(|entry| entry.product())
                .ok_or(SelectionError::PositionOutOfRange {
                    position,
                    len: list.len(),
                })?;
            let discounted = discount.apply(product.price.amount);
            info!(
                product = %product.id,
                price = %product.price.amount,
                discounted = %discounted,
                kind = %discount.kind(),
                "Discount applied"
            );
            Ok(discounted)
        })
        .collect()
}

#[allow(clippy::print_stdout)]
fn print_list(list: &ProductList) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(list)?);
    Ok(())
}
