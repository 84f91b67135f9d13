//! End-to-end picker flows: open, search, scroll, select, commit.
//!
//! Run with: cargo test -p catalog-picker-integration-tests

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use catalog_picker::{Completion, PickerSession, ProductList, QueryPhase, reorder};
use catalog_picker_core::CheckState;
use catalog_picker_integration_tests::{StubCatalog, product, products};

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_search_then_scroll_to_end() {
    let mut catalog_products = products("s", "Shirt", 14);
    catalog_products.extend(products("m", "Mug", 5));
    let catalog = StubCatalog::new(catalog_products);

    let mut session = PickerSession::new(10);
    let opened = session.open(0);
    let ticket = session.submit_search("shirt").unwrap();

    // The open ticket was superseded by the search
    assert_eq!(session.fetch(&catalog, opened).await, Completion::Stale);
    assert_eq!(
        session.fetch(&catalog, ticket).await,
        Completion::Loaded {
            received: 10,
            has_more: true
        }
    );
    assert_eq!(session.products().len(), 10);

    let ticket = session.on_sentinel_visible().unwrap();
    assert_eq!(ticket.query().page, 2);
    assert_eq!(
        session.fetch(&catalog, ticket).await,
        Completion::Loaded {
            received: 4,
            has_more: false
        }
    );

    assert_eq!(session.products().len(), 14);
    assert!(session.engine().is_exhausted());
    assert!(session.on_sentinel_visible().is_none());
    assert!(session.products().iter().all(|p| p.title.starts_with("Shirt")));
}

#[tokio::test]
async fn test_exact_page_multiple_needs_one_empty_page() {
    let catalog = StubCatalog::new(products("p", "Plate", 10));
    let mut session = PickerSession::new(10);

    let ticket = session.open(0);
    session.fetch(&catalog, ticket).await;
    assert!(session.engine().has_more());

    let ticket = session.on_sentinel_visible().unwrap();
    assert_eq!(
        session.fetch(&catalog, ticket).await,
        Completion::Loaded {
            received: 0,
            has_more: false
        }
    );
    assert_eq!(session.products().len(), 10);
}

#[tokio::test]
async fn test_empty_result() {
    let catalog = StubCatalog::new(products("p", "Plate", 3));
    let mut session = PickerSession::new(10);
    let _ = session.open(0);

    let ticket = session.submit_search("lamp").unwrap();
    session.fetch(&catalog, ticket).await;

    assert!(session.products().is_empty());
    assert_eq!(session.engine().phase(), QueryPhase::Loaded);
    assert!(session.engine().is_exhausted());
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_failure_then_recovery() {
    let catalog = StubCatalog::new(products("s", "Shirt", 12));
    let mut session = PickerSession::new(10);

    catalog.fail_next(1);
    let ticket = session.open(0);
    assert_eq!(session.fetch(&catalog, ticket).await, Completion::Failed);
    assert_eq!(session.engine().phase(), QueryPhase::Error);
    assert!(session.products().is_empty());
    assert!(session.engine().error().unwrap().contains("503"));

    // Resubmitting the same search is allowed after a failure
    let ticket = session.submit_search("").unwrap();
    session.fetch(&catalog, ticket).await;
    assert_eq!(session.products().len(), 10);
    assert!(session.engine().error().is_none());
}

#[tokio::test]
async fn test_failed_scroll_reloads_from_first_page() {
    let catalog = StubCatalog::new(products("s", "Shirt", 25));
    let mut session = PickerSession::new(10);
    let ticket = session.open(0);
    session.fetch(&catalog, ticket).await;

    catalog.fail_next(1);
    let ticket = session.on_sentinel_visible().unwrap();
    session.fetch(&catalog, ticket).await;
    assert!(session.products().is_empty());

    let ticket = session.on_sentinel_visible().unwrap();
    assert_eq!(ticket.query().page, 1);
    session.fetch(&catalog, ticket).await;
    assert_eq!(session.products().len(), 10);

    let pages: Vec<u32> = catalog.requests().iter().map(|q| q.page).collect();
    assert_eq!(pages, [1, 2, 1]);
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_variant_checks_roll_up() {
    let catalog = StubCatalog::new(vec![product("77", "Fog Linen Shirt", 3, 99)]);
    let mut session = PickerSession::new(10);
    let ticket = session.open(0);
    session.fetch(&catalog, ticket).await;

    assert_eq!(session.toggle_variant(0, 0, true).unwrap(), CheckState::Partial);
    assert_eq!(session.toggle_variant(0, 1, true).unwrap(), CheckState::Partial);
    assert_eq!(session.toggle_variant(0, 2, true).unwrap(), CheckState::Checked);

    session.toggle_product(0, false).unwrap();
    assert!(session.products()[0].variants.iter().all(|v| !v.checked));
    assert_eq!(session.products()[0].checked, CheckState::Unchecked);
}

#[tokio::test]
async fn test_commit_at_position_overwrites() {
    let catalog = StubCatalog::new(products("s", "Shirt", 5));
    let mut list = ProductList::with_products([
        product("x0", "Old 0", 1, 5),
        product("x1", "Old 1", 1, 5),
        product("x2", "Old 2", 1, 5),
        product("x3", "Old 3", 1, 5),
    ]);

    let mut session = PickerSession::new(10);
    let ticket = session.open(2);
    session.fetch(&catalog, ticket).await;
    session.toggle_product(1, true).unwrap();
    session.toggle_product(3, true).unwrap();
    // Partial products are not committed
    session.toggle_variant(4, 0, true).unwrap();

    assert_eq!(session.commit(&mut list).unwrap(), 2);

    let ids: Vec<&str> = list.products().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["x0", "x1", "s1", "s3"]);
    assert!(!session.is_open());
}

#[tokio::test]
async fn test_commit_carries_variant_lines() {
    let catalog = StubCatalog::new(vec![product("9", "Tote", 3, 30)]);
    let mut list = ProductList::new();

    let mut session = PickerSession::new(10);
    let ticket = session.open(0);
    session.fetch(&catalog, ticket).await;
    session.toggle_product(0, true).unwrap();
    session.toggle_variant(0, 2, false).unwrap();
    assert_eq!(session.checked_count(), 0);
    session.toggle_variant(0, 2, true).unwrap();
    assert_eq!(session.checked_count(), 1);

    session.commit(&mut list).unwrap();
    let entry = list.entry(0).unwrap();
    assert_eq!(entry.product().id.as_str(), "9");
    let variants: Vec<&str> = entry
        .variant_lines()
        .iter()
        .map(|line| line.variant().id.as_str())
        .collect();
    assert_eq!(variants, ["9-v0", "9-v1", "9-v2"]);
    assert!(entry.variant_lines().iter().all(|line| !line.discount_visible()));
}

#[tokio::test]
async fn test_commit_then_reorder() {
    let catalog = StubCatalog::new(products("s", "Shirt", 5));
    let mut list = ProductList::new();

    let mut session = PickerSession::new(10);
    let ticket = session.open(0);
    session.fetch(&catalog, ticket).await;
    for i in 0..5 {
        session.toggle_product(i, true).unwrap();
    }
    session.commit(&mut list).unwrap();
    assert_eq!(list.len(), 5);

    list.reorder(3, 0).unwrap();
    let ids: Vec<&str> = list.products().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["s3", "s0", "s1", "s2", "s4"]);
}

#[test]
fn test_reorder_slice_round_trip() {
    let original = vec!['a', 'b', 'c', 'd', 'e'];
    for source in 0..original.len() {
        for target in 0..original.len() {
            let mut items = original.clone();
            reorder(&mut items, source, target).unwrap();
            assert_eq!(items[target], original[source]);
            reorder(&mut items, target, source).unwrap();
            assert_eq!(items, original, "{source} -> {target}");
        }
    }
}
