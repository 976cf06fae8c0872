//! Checkout fanning out across the stores: a successful purchase clears
//! the cart in memory and on disk and raises a toast; a failed one
//! leaves the cart for a retry.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use peachstand_core::{Email, User};
use peachstand_integration_tests::{FakeCatalog, FakeIdentity, TestStorefront, init_tracing, product};
use peachstand_stores::api::{ApiError, Order};
use peachstand_stores::toast::ToastKind;

fn order() -> Order {
    Order {
        name: "Amy Archer".to_owned(),
        address: "1 Orchard Lane".to_owned(),
        phone: "555-0134".to_owned(),
        requests: "Leave at the door".to_owned(),
        payment: "card".to_owned(),
    }
}

async fn logged_in_with_cart() -> (TestStorefront, User) {
    init_tracing();
    let ctx = TestStorefront::new(
        FakeCatalog::default(),
        FakeIdentity::with_account("amy@example.com", "hunter2", "Amy"),
    );
    let user = ctx
        .session
        .login(&Email::parse("amy@example.com").unwrap(), "hunter2")
        .await
        .unwrap();
    ctx.cart.init_cart(&user.id).unwrap();
    ctx.cart
        .add_item(product("p1", "Mug", 1200, "kitchen"), &user.id, 2)
        .unwrap();
    ctx.cart
        .add_item(product("p2", "Teapot", 4800, "kitchen"), &user.id, 1)
        .unwrap();
    (ctx, user)
}

#[tokio::test(start_paused = true)]
async fn test_successful_checkout_clears_cart_everywhere() {
    let (ctx, user) = logged_in_with_cart().await;

    let receipt = ctx.purchase.place_order(&order(), &user).await.unwrap();
    assert!(!receipt.order_id.is_empty());

    // The purchase service saw the full cart for the right user
    let placed = ctx.purchase_api.placed();
    assert_eq!(placed.len(), 1);
    let placed = placed.first().unwrap();
    assert_eq!(placed.user_id, user.id);
    assert_eq!(placed.cart.len(), 2);
    assert_eq!(placed.order.address, "1 Orchard Lane");

    // Cart gone from memory and from the durable copy
    assert!(ctx.cart.snapshot().items.is_empty());
    assert!(ctx.cart_storage.load(&user.id).unwrap().is_empty());

    let toast = ctx.toast.snapshot();
    assert!(toast.is_visible);
    assert_eq!(toast.kind, ToastKind::Success);
}

#[tokio::test(start_paused = true)]
async fn test_failed_checkout_preserves_the_cart_for_retry() {
    let (ctx, user) = logged_in_with_cart().await;
    ctx.purchase_api
        .fail_next(ApiError::Network("payment gateway unreachable".to_owned()));

    let result = ctx.purchase.place_order(&order(), &user).await;
    assert!(result.is_err());

    assert_eq!(ctx.cart.snapshot().total_count, 3, "nothing lost");
    assert_eq!(ctx.cart_storage.load(&user.id).unwrap().len(), 2);
    assert!(ctx.purchase_api.placed().is_empty());

    let toast = ctx.toast.snapshot();
    assert!(toast.is_visible);
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(ctx.purchase.snapshot().error.is_some());

    // The retry goes through and recovers completely
    let receipt = ctx.purchase.place_order(&order(), &user).await.unwrap();
    assert!(!receipt.order_id.is_empty());
    assert!(ctx.cart.snapshot().items.is_empty());
    assert!(ctx.purchase.snapshot().error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_checkout_toast_dismisses_on_its_own() {
    let (ctx, user) = logged_in_with_cart().await;

    ctx.purchase.place_order(&order(), &user).await.unwrap();
    assert!(ctx.toast.snapshot().is_visible);

    tokio::time::sleep(ctx.config.toast_timeout + Duration::from_millis(1)).await;
    assert!(!ctx.toast.snapshot().is_visible);
}
