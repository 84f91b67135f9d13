//! Conversions from catalog wire records to domain types.
//!
//! The search endpoint returns either `null` or a JSON array of product
//! records. IDs arrive as numbers, prices as numbers or decimal strings, and
//! most fields may be missing.

use catalog_picker_core::{CheckState, ImageId, Price, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::types::{Product, ProductImage, Variant};

#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    available: Option<i64>,
    #[serde(default)]
    image: Option<ImageRecord>,
    #[serde(default)]
    variants: Option<Vec<VariantRecord>>,
}

#[derive(Debug, Deserialize)]
struct VariantRecord {
    id: VariantId,
    #[serde(default)]
    product_id: Option<ProductId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    #[serde(default)]
    id: Option<ImageId>,
    #[serde(default)]
    src: Option<String>,
}

/// Parse a page body into domain products.
///
/// A `null` body is an empty page.
pub(crate) fn parse_page(body: &str) -> Result<Vec<Product>, serde_json::Error> {
    let records: Option<Vec<ProductRecord>> = serde_json::from_str(body)?;
    Ok(records
        .unwrap_or_default()
        .into_iter()
        .map(convert_product)
        .collect())
}

fn convert_product(record: ProductRecord) -> Product {
    let variants: Vec<Variant> = record
        .variants
        .unwrap_or_default()
        .into_iter()
        .map(|v| convert_variant(v, &record.id))
        .collect();

    // Fall back to the cheapest variant when the product has no price of its own
    let price = record
        .price
        .or_else(|| variants.iter().map(|v| v.price.amount).min())
        .unwrap_or_default();

    Product {
        id: record.id,
        title: record.title,
        price: Price::from_amount(price),
        available: record.available.unwrap_or_default(),
        image: record.image.and_then(convert_image),
        variants,
        checked: CheckState::Unchecked,
    }
}

fn convert_variant(record: VariantRecord, owner: &ProductId) -> Variant {
    Variant {
        id: record.id,
        product_id: record.product_id.unwrap_or_else(|| owner.clone()),
        title: record.title,
        price: Price::from_amount(record.price.unwrap_or_default()),
        checked: false,
    }
}

fn convert_image(record: ImageRecord) -> Option<ProductImage> {
    let src = record.src.filter(|s| !s.is_empty())?;
    Some(ProductImage { id: record.id, src })
}
