//! Listing, filter, and debounce working together: pagination over a
//! real (fake) catalog, filter changes triggering reloads from the first
//! page, and debounced free-text search.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use peachstand_core::{CategoryId, NewProduct, Price, Product};
use peachstand_integration_tests::{FakeCatalog, FakeIdentity, TestStorefront, init_tracing, product};
use peachstand_stores::debounce::Debounced;

/// Twenty products: even ids are kitchen mugs, odd ids are garden
/// planters, prices rising by a dollar each.
fn seed() -> Vec<Product> {
    (1..=20u64)
        .map(|i| {
            let (kind, category) = if i % 2 == 0 {
                ("Mug", "kitchen")
            } else {
                ("Planter", "garden")
            };
            product(
                &format!("p{i:02}"),
                &format!("{kind} {i:02}"),
                i * 100,
                category,
            )
        })
        .collect()
}

fn storefront() -> TestStorefront {
    init_tracing();
    TestStorefront::new(FakeCatalog::new(seed()), FakeIdentity::new())
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_initial_page_and_load_more_accumulate() {
    let ctx = storefront();
    let filter = ctx.filter.snapshot();
    let page_size = ctx.config.page_size;

    ctx.products
        .load_products(&filter, page_size, 1, true)
        .await
        .unwrap();
    let snap = ctx.products.snapshot();
    assert_eq!(snap.products.len(), 8);
    assert!(snap.has_next_page);
    assert_eq!(snap.total_count, 20);

    ctx.products
        .load_products(&filter, page_size, 2, false)
        .await
        .unwrap();
    assert_eq!(ctx.products.snapshot().products.len(), 16);

    ctx.products
        .load_products(&filter, page_size, 3, false)
        .await
        .unwrap();
    let snap = ctx.products.snapshot();
    assert_eq!(snap.products.len(), 20);
    assert!(!snap.has_next_page, "catalog exhausted");
}

// =============================================================================
// Filter-driven reloads
// =============================================================================

#[tokio::test]
async fn test_category_change_reloads_from_the_first_page() {
    let ctx = storefront();
    let page_size = ctx.config.page_size;
    let mut filter_rx = ctx.filter.subscribe();

    ctx.products
        .load_products(&ctx.filter.snapshot(), page_size, 1, true)
        .await
        .unwrap();

    ctx.filter.set_category(Some(CategoryId::new("kitchen")));
    filter_rx.changed().await.unwrap();
    let narrowed = filter_rx.borrow_and_update().clone();
    ctx.products
        .load_products(&narrowed, page_size, 1, true)
        .await
        .unwrap();

    let snap = ctx.products.snapshot();
    assert_eq!(snap.total_count, 10, "ten kitchen products in the catalog");
    assert_eq!(snap.products.len(), 8, "first page only");
    assert!(snap.has_next_page);
    assert!(
        snap.products
            .iter()
            .all(|p| p.category == CategoryId::new("kitchen"))
    );
}

#[tokio::test]
async fn test_price_bounds_narrow_the_listing() {
    let ctx = storefront();
    ctx.filter.set_min_price(Some(Price::new(500)));
    ctx.filter.set_max_price(Some(Price::new(1000)));

    ctx.products
        .load_products(&ctx.filter.snapshot(), ctx.config.page_size, 1, true)
        .await
        .unwrap();

    let snap = ctx.products.snapshot();
    assert_eq!(snap.total_count, 6);
    assert!(
        snap.products
            .iter()
            .all(|p| p.price >= Price::new(500) && p.price <= Price::new(1000))
    );
}

#[tokio::test(start_paused = true)]
async fn test_title_search_is_debounced_before_reloading() {
    let ctx = storefront();
    let filter = ctx.filter.clone();
    let search = Debounced::new(ctx.config.debounce_window, move |title: String| {
        filter.set_title(title);
    });

    search.call("m".to_owned());
    tokio::time::sleep(ctx.config.debounce_window / 2).await;
    search.call("mu".to_owned());
    tokio::time::sleep(ctx.config.debounce_window / 2).await;
    search.call("mug".to_owned());

    // Still typing: the filter has not moved, so nothing reloaded
    assert!(ctx.filter.snapshot().title.is_empty());

    tokio::time::sleep(ctx.config.debounce_window + Duration::from_millis(1)).await;
    assert_eq!(ctx.filter.snapshot().title, "mug");

    ctx.products
        .load_products(&ctx.filter.snapshot(), ctx.config.page_size, 1, true)
        .await
        .unwrap();
    let snap = ctx.products.snapshot();
    assert_eq!(snap.total_count, 10, "matches are case-insensitive");
    assert!(snap.products.iter().all(|p| p.title.contains("Mug")));
}

// =============================================================================
// Product creation
// =============================================================================

#[tokio::test]
async fn test_new_product_leads_the_listing() {
    let ctx = storefront();
    ctx.products
        .load_products(&ctx.filter.snapshot(), ctx.config.page_size, 1, true)
        .await
        .unwrap();

    let created = ctx
        .products
        .add_product(NewProduct {
            title: "Fresh Peach Crate".to_owned(),
            price: Price::new(2500),
            category: CategoryId::new("garden"),
            image: String::new(),
            description: "A crate of fresh peaches".to_owned(),
        })
        .await
        .unwrap();

    let snap = ctx.products.snapshot();
    assert_eq!(snap.products.first().unwrap().id, created.id);
    assert_eq!(snap.total_count, 21);

    // A fresh initial load sees the new product first as well
    ctx.products
        .load_products(&ctx.filter.snapshot(), ctx.config.page_size, 1, true)
        .await
        .unwrap();
    let snap = ctx.products.snapshot();
    assert_eq!(snap.products.first().unwrap().id, created.id);
    assert_eq!(snap.total_count, 21);
}
