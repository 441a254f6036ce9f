//! Integration tests for the on-device cart record format.
//!
//! The record is shared with earlier app builds, so these tests pin the
//! JSON shape: a bare array of line items keyed `id`, `title`, `image_url`,
//! `price`, `quantity`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use go_marketplace_core::{Price, Product};
use go_marketplace_integration_tests::{TestContext, product};

/// A record as written by a previous build of the mobile app.
const LEGACY_RECORD: &str = r#"[
  {"id":"1","title":"Camiseta","image_url":"https://cdn.example/1.png","price":29.9,"quantity":3},
  {"id":"2","title":"Caneca","image_url":"https://cdn.example/2.png","price":15,"quantity":1}
]"#;

#[tokio::test]
async fn test_reads_legacy_record() {
    let ctx = TestContext::new();
    std::fs::write(ctx.record_path(), LEGACY_RECORD).unwrap();

    let provider = ctx.open().await;
    let cart = provider.handle().products().unwrap();

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.items()[0].title, "Camiseta");
    assert_eq!(cart.items()[0].price, "29.9".parse::<Price>().unwrap());
    assert_eq!(cart.items()[1].price, Price::from_cents(1500));
}

#[tokio::test]
async fn test_written_record_shape() {
    let ctx = TestContext::new();
    let provider = ctx.open().await;
    provider.handle().add_to_cart(product("sku")).unwrap();
    provider.shutdown().await;

    let raw = std::fs::read_to_string(ctx.record_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "sku");
    assert_eq!(items[0]["title"], "Product sku");
    assert_eq!(items[0]["image_url"], "https://cdn.example/sku.png");
    assert!(items[0]["price"].is_number());
    assert_eq!(items[0]["quantity"], 1);
}

#[tokio::test]
async fn test_legacy_record_round_trips() {
    let ctx = TestContext::new();
    std::fs::write(ctx.record_path(), LEGACY_RECORD).unwrap();

    // Touch the cart so it is rewritten, then undo the change.
    let provider = ctx.open().await;
    let cart = provider.handle();
    let original = cart.products().unwrap();
    cart.increment(&"2".into()).unwrap();
    cart.decrement(&"2".into()).unwrap();
    provider.shutdown().await;

    assert_eq!(ctx.persisted().await.unwrap(), original);
}

#[tokio::test]
async fn test_record_with_zero_quantity_is_rejected() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.record_path(),
        r#"[{"id":"1","title":"T","image_url":"u","price":1,"quantity":0}]"#,
    )
    .unwrap();

    let provider = ctx.open().await;
    assert!(provider.handle().products().unwrap().is_empty());
}

#[tokio::test]
async fn test_record_with_duplicate_ids_is_rejected() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.record_path(),
        r#"[
            {"id":"1","title":"T","image_url":"u","price":1,"quantity":1},
            {"id":"1","title":"T","image_url":"u","price":1,"quantity":2}
        ]"#,
    )
    .unwrap();

    let provider = ctx.open().await;
    assert!(provider.handle().products().unwrap().is_empty());
}

#[tokio::test]
async fn test_exact_prices_survive_restart() {
    let ctx = TestContext::new();
    let precise: Price = "0.1234567890123456789".parse().unwrap();
    let huge: Price = "79228162514264337593543950335".parse().unwrap();

    let provider = ctx.open().await;
    let cart = provider.handle();
    cart.add_to_cart(Product::new("precise", "Precise", "u", precise))
        .unwrap();
    cart.add_to_cart(Product::new("huge", "Huge", "u", huge)).unwrap();
    let before = cart.products().unwrap();
    provider.shutdown().await;

    let reopened = ctx.open().await;
    let after = reopened.handle().products().unwrap();

    assert_eq!(after, before);
    assert_eq!(after.items()[0].price.amount().to_string(), "0.1234567890123456789");
    assert_eq!(after.items()[1].price, huge);
}
