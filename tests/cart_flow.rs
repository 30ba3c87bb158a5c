mod common;

use std::sync::Arc;

use common::{VanishingCatalog, add_product, add_request, fixture, money};
use storefront_api::{
    dto::cart::UpdateCartItemRequest,
    error::AppError,
    services::cart_service,
    store::CartStore,
};

#[tokio::test]
async fn adding_past_stock_keeps_existing_quantity() -> anyhow::Result<()> {
    let fx = fixture();
    let product = add_product(&fx.store, "Yoga Mat", "14.99", 5).await?;

    let resp = cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 2)).await?;
    let view = resp.data.expect("cart view");
    assert_eq!(view.item_count, 2);
    assert_eq!(view.total, money("29.98"));

    let err = cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 4))
        .await
        .expect_err("6 exceeds stock of 5");
    assert!(matches!(err, AppError::OutOfStock(_)));
    assert_eq!(
        err.to_string(),
        "Only 5 items available. You already have 2 in cart."
    );

    let cart = fx.store.load("u1").await?.expect("cart saved");
    assert_eq!(cart.item(product.id).map(|i| i.quantity), Some(2));
    assert_eq!(cart.total(), money("29.98"));

    Ok(())
}

#[tokio::test]
async fn add_guards() -> anyhow::Result<()> {
    let fx = fixture();
    let product = add_product(&fx.store, "Water Bottle", "6.99", 3).await?;

    let zero = cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 0)).await;
    assert!(matches!(zero, Err(AppError::Validation(_))));

    let too_many = cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 4)).await;
    assert!(
        matches!(&too_many, Err(AppError::OutOfStock(msg)) if msg == "Only 3 items available in stock")
    );

    let missing =
        cart_service::add_to_cart(&fx.state, add_request("u1", uuid::Uuid::new_v4(), 1)).await;
    assert!(matches!(missing, Err(AppError::NotFound(msg)) if msg == "Product not found"));

    fx.store.update_product(product.id, |p| p.is_active = false).await;
    let inactive = cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 1)).await;
    assert!(
        matches!(inactive, Err(AppError::ProductUnavailable(msg)) if msg == "Product is not available")
    );

    assert!(fx.store.load("u1").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn price_snapshot_survives_catalog_change() -> anyhow::Result<()> {
    let fx = fixture();
    let product = add_product(&fx.store, "Chef Knife", "29.99", 10).await?;

    cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 1)).await?;
    fx.store
        .update_product(product.id, |p| p.price = money("39.99"))
        .await;
    let resp = cart_service::add_to_cart(&fx.state, add_request("u1", product.id, 2)).await?;

    let view = resp.data.expect("cart view");
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].price, money("29.99"));
    assert_eq!(view.items[0].quantity, 3);
    assert_eq!(view.items[0].subtotal, money("89.97"));
    assert_eq!(view.total, money("89.97"));

    Ok(())
}

#[tokio::test]
async fn update_remove_and_clear() -> anyhow::Result<()> {
    let fx = fixture();
    let mat = add_product(&fx.store, "Yoga Mat", "14.99", 10).await?;
    let bottle = add_product(&fx.store, "Water Bottle", "6.99", 10).await?;

    cart_service::add_to_cart(&fx.state, add_request("u1", mat.id, 1)).await?;
    cart_service::add_to_cart(&fx.state, add_request("u1", bottle.id, 1)).await?;

    let resp = cart_service::update_item(
        &fx.state,
        "u1",
        mat.id,
        UpdateCartItemRequest { quantity: Some(3) },
    )
    .await?;
    assert_eq!(resp.message, "Cart updated");
    let view = resp.data.expect("cart view");
    assert_eq!(view.total, money("51.96"));
    assert_eq!(view.item_count, 4);

    let over = cart_service::update_item(
        &fx.state,
        "u1",
        mat.id,
        UpdateCartItemRequest { quantity: Some(11) },
    )
    .await;
    assert!(matches!(over, Err(AppError::OutOfStock(_))));

    let negative = cart_service::update_item(
        &fx.state,
        "u1",
        mat.id,
        UpdateCartItemRequest { quantity: Some(-1) },
    )
    .await;
    assert!(matches!(negative, Err(AppError::Validation(_))));

    let resp = cart_service::update_item(
        &fx.state,
        "u1",
        mat.id,
        UpdateCartItemRequest { quantity: Some(0) },
    )
    .await?;
    assert_eq!(resp.message, "Item removed from cart");
    assert_eq!(resp.data.expect("cart view").total, money("6.99"));

    let gone = cart_service::update_item(
        &fx.state,
        "u1",
        mat.id,
        UpdateCartItemRequest { quantity: Some(1) },
    )
    .await;
    assert!(matches!(gone, Err(AppError::NotFound(msg)) if msg == "Item not found in cart"));

    // Removing something that is not there is not an error.
    cart_service::remove_item(&fx.state, "u1", mat.id).await?;
    let view = cart_service::remove_item(&fx.state, "u1", bottle.id)
        .await?
        .data
        .expect("cart view");
    assert!(view.items.is_empty());
    assert_eq!(view.total, money("0"));

    cart_service::add_to_cart(&fx.state, add_request("u1", bottle.id, 2)).await?;
    let view = cart_service::clear_cart(&fx.state, "u1")
        .await?
        .data
        .expect("cart view");
    assert_eq!(view.item_count, 0);
    assert!(fx.store.load("u1").await?.is_some_and(|c| c.is_empty()));

    Ok(())
}

#[tokio::test]
async fn viewing_prunes_vanished_products() -> anyhow::Result<()> {
    let fx = fixture();
    let catalog = Arc::new(VanishingCatalog::new(fx.store.clone()));
    let state = fx.state.clone().with_catalog(catalog.clone());

    let keep = add_product(&fx.store, "Yoga Mat", "14.99", 10).await?;
    let lose = add_product(&fx.store, "Gaming Mouse", "39.99", 10).await?;
    cart_service::add_to_cart(&state, add_request("u1", keep.id, 1)).await?;
    cart_service::add_to_cart(&state, add_request("u1", lose.id, 1)).await?;

    catalog.hide(lose.id);

    let view = cart_service::get_cart(&state, "u1")
        .await?
        .data
        .expect("cart view");
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product_id, keep.id);
    assert_eq!(view.items[0].name, "Yoga Mat");
    assert_eq!(view.total, money("14.99"));

    let stored = fx.store.load("u1").await?.expect("cart saved");
    assert!(stored.item(lose.id).is_none());
    assert_eq!(stored.total(), money("14.99"));

    Ok(())
}

#[tokio::test]
async fn unknown_user_gets_empty_cart() -> anyhow::Result<()> {
    let fx = fixture();
    let view = cart_service::get_cart(&fx.state, "nobody")
        .await?
        .data
        .expect("cart view");
    assert!(view.items.is_empty());
    assert_eq!(view.item_count, 0);
    Ok(())
}
