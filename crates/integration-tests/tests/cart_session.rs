//! Integration tests for a cart session over file-backed storage.
//!
//! These tests drive the provider the way the app does: open on launch,
//! mutate through handles, and reopen to check what survived.

#![allow(clippy::unwrap_used)]

use go_marketplace_core::{CartChange, ProductId};
use go_marketplace_integration_tests::{TestContext, product};
use go_marketplace_storefront::CartError;

fn id(value: &str) -> ProductId {
    ProductId::from(value)
}

fn quantities(cart: &go_marketplace_core::Cart) -> Vec<(String, u32)> {
    cart.items()
        .iter()
        .map(|item| (item.id.to_string(), item.quantity.get()))
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_to_empty_cart() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    let cart = provider.handle();

    assert_eq!(cart.add_to_cart(product("x")).unwrap(), CartChange::Added);

    let items = cart.products().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items.items()[0].title, "Product x");
    assert_eq!(items.items()[0].quantity.get(), 1);
}

#[tokio::test]
async fn test_add_existing_product_bumps_quantity() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    let cart = provider.handle();

    cart.add_to_cart(product("x")).unwrap();
    assert_eq!(cart.add_to_cart(product("x")).unwrap(), CartChange::Incremented);

    assert_eq!(quantities(&cart.products().unwrap()), [("x".to_string(), 2)]);
}

#[tokio::test]
async fn test_decrement_last_unit_empties_cart() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    let cart = provider.handle();

    cart.add_to_cart(product("a")).unwrap();
    assert_eq!(cart.decrement(&id("a")).unwrap(), CartChange::Removed);
    assert!(cart.products().unwrap().is_empty());

    provider.shutdown().await;
    assert!(ctx.persisted().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_decrement_from_three() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    let cart = provider.handle();

    cart.add_to_cart(product("x")).unwrap();
    cart.increment(&id("x")).unwrap();
    cart.increment(&id("x")).unwrap();
    assert_eq!(cart.decrement(&id("x")).unwrap(), CartChange::Decremented);

    assert_eq!(quantities(&cart.products().unwrap()), [("x".to_string(), 2)]);
}

// =============================================================================
// Persistence Across Sessions
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new();

    let first = ctx.open().await;
    let cart = first.handle();
    cart.add_to_cart(product("c")).unwrap();
    cart.add_to_cart(product("a")).unwrap();
    cart.add_to_cart(product("b")).unwrap();
    cart.increment(&id("a")).unwrap();
    let before = cart.products().unwrap();
    first.shutdown().await;

    let second = ctx.open().await;
    let after = second.handle().products().unwrap();

    assert_eq!(after, before);
    assert_eq!(
        quantities(&after),
        [
            ("c".to_string(), 1),
            ("a".to_string(), 2),
            ("b".to_string(), 1)
        ]
    );
}

#[tokio::test]
async fn test_fresh_device_starts_empty() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;

    assert!(provider.handle().products().unwrap().is_empty());
    assert!(!ctx.record_path().exists());
}

#[tokio::test]
async fn test_corrupt_record_is_replaced() {
    let ctx = TestContext::new();
    std::fs::write(ctx.record_path(), "not a cart").unwrap();

    let provider = ctx.open().await;
    let cart = provider.handle();
    assert!(cart.products().unwrap().is_empty());

    cart.add_to_cart(product("new")).unwrap();
    provider.shutdown().await;

    assert_eq!(quantities(&ctx.persisted().await.unwrap()), [("new".to_string(), 1)]);
}

#[tokio::test]
async fn test_unknown_ids_leave_record_untouched() {
    let ctx = TestContext::new();

    let provider = ctx.open().await;
    provider.handle().add_to_cart(product("a")).unwrap();
    provider.shutdown().await;
    let written = std::fs::read_to_string(ctx.record_path()).unwrap();

    let provider = ctx.open().await;
    let cart = provider.handle();
    assert_eq!(cart.increment(&id("zzz")).unwrap(), CartChange::Unchanged);
    assert_eq!(cart.decrement(&id("zzz")).unwrap(), CartChange::Unchanged);
    provider.shutdown().await;

    assert_eq!(std::fs::read_to_string(ctx.record_path()).unwrap(), written);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_consumers_lose_no_updates() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;

    let ids = ["p0", "p1", "p2", "p3"];
    for product_id in ids {
        provider.handle().add_to_cart(product(product_id)).unwrap();
    }

    let mut tasks = Vec::new();
    for product_id in ids {
        for _ in 0..4 {
            let cart = provider.handle();
            let target = id(product_id);
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    cart.increment(&target).unwrap();
                }
            }));
        }
    }
    for task in tasks {
        task.await.unwrap();
    }

    let expected = 1 + 4 * 50;
    let cart = provider.handle().products().unwrap();
    for product_id in ids {
        assert_eq!(cart.get(&id(product_id)).unwrap().quantity.get(), expected);
    }

    provider.shutdown().await;
    assert_eq!(ctx.persisted().await.unwrap(), cart);
}

// =============================================================================
// Provider Scope
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shutdown_saves_changes_racing_it() {
    for _ in 0..20 {
        let ctx = TestContext::new();
        let provider = ctx.open().await;
        provider.handle().add_to_cart(product("race")).unwrap();

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let cart = provider.handle();
                tokio::spawn(async move {
                    let mut applied = 0_u64;
                    while cart.increment(&id("race")).is_ok() {
                        applied += 1;
                        tokio::task::yield_now().await;
                    }
                    applied
                })
            })
            .collect();

        tokio::task::yield_now().await;
        provider.shutdown().await;

        let mut applied = 0;
        for task in tasks {
            applied += task.await.unwrap();
        }

        let saved = ctx.persisted().await.unwrap();
        assert_eq!(saved.item_count(), 1 + applied);
    }
}

#[tokio::test]
async fn test_handles_outlive_provider() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    let cart = provider.handle();
    let clone = cart.clone();

    provider.shutdown().await;

    assert!(matches!(cart.products(), Err(CartError::NoProvider)));
    assert!(matches!(
        clone.add_to_cart(product("late")),
        Err(CartError::NoProvider)
    ));
}

#[tokio::test]
async fn test_subscriber_sees_every_state() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    let cart = provider.handle();
    let mut rx = cart.subscribe().unwrap();

    cart.add_to_cart(product("a")).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().item_count(), 1);

    cart.decrement(&id("a")).unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_empty());
}
