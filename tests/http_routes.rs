mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{add_product, coupon, fixture};
use serde_json::{Value, json};
use storefront_api::{
    domain::DiscountType, routes::app, seed::seed_demo_data, store::CouponStore,
};

#[tokio::test]
async fn health_and_unknown_routes() -> anyhow::Result<()> {
    let fx = fixture();
    let server = TestServer::try_new(app(fx.state))?;

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");

    let response = server.get("/api/nowhere").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["path"], "/api/nowhere");

    Ok(())
}

#[tokio::test]
async fn browse_catalog() -> anyhow::Result<()> {
    let fx = fixture();
    seed_demo_data(fx.store.as_ref(), fx.store.as_ref()).await?;
    let server = TestServer::try_new(app(fx.state))?;

    let response = server
        .get("/api/products")
        .add_query_param("category", "Home & Garden")
        .add_query_param("sort", "price_asc")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let items = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(body["meta"]["count"], items.len());
    assert!(!items.is_empty());
    assert!(items.iter().all(|p| p["category"] == "Home & Garden"));
    assert!(items.iter().all(|p| p["inStock"] == true));
    let prices: Vec<f64> = items.iter().filter_map(|p| p["price"].as_f64()).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));

    let response = server
        .get("/api/products")
        .add_query_param("search", "YOGA")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["name"], "Yoga Mat Premium");

    let response = server
        .get("/api/products")
        .add_query_param("minPrice", "abc")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/products/categories/list").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["data"],
        json!(["Electronics", "Clothing", "Home & Garden", "Sports", "Books"])
    );

    let response = server
        .get(&format!("/api/products/{}", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Product not found");
    assert_eq!(body["data"]["error"], "Product not found");

    Ok(())
}

#[tokio::test]
async fn cart_to_order_over_http() -> anyhow::Result<()> {
    let fx = fixture();
    let mat = add_product(&fx.store, "Yoga Mat", "7.50", 10).await?;
    let server = TestServer::try_new(app(fx.state))?;

    let response = server
        .post("/api/cart")
        .json(&json!({ "userId": "web-1", "productId": mat.id, "quantity": 2 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Item added to cart");
    assert_eq!(body["data"]["itemCount"], 2);
    assert_eq!(body["data"]["total"].as_f64(), Some(15.0));
    assert_eq!(body["data"]["items"][0]["stock"], 10);

    // userId defaults to the guest cart and quantity to one.
    let response = server
        .post("/api/cart")
        .json(&json!({ "productId": mat.id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = server.get("/api/cart/guest").await.json();
    assert_eq!(body["data"]["itemCount"], 1);

    let response = server
        .put(&format!("/api/cart/web-1/item/{}", mat.id))
        .json(&json!({ "quantity": 11 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Only 10 items available in stock");

    let response = server
        .post("/api/coupons/apply")
        .json(&json!({ "code": "nothing", "cartTotal": 15.0 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .post("/api/checkout")
        .json(&json!({
            "userId": "web-1",
            "customerInfo": { "name": "Grace", "email": "grace@example.com" },
            "notes": "Leave at the door"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Order placed successfully");
    let order_number = body["data"]["orderNumber"].as_str().unwrap_or_default().to_string();
    assert!(order_number.starts_with("ORD-"));
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["items"][0]["subtotal"].as_f64(), Some(15.0));

    let body: Value = server.get("/api/cart/web-1").await.json();
    assert_eq!(body["data"]["itemCount"], 0);
    assert_eq!(body["data"]["total"].as_f64(), Some(0.0));

    let response = server.get("/api/checkout/orders/web-1").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["orderNumber"], order_number.as_str());
    assert_eq!(body["data"][0]["notes"], "Leave at the door");

    let response = server
        .get(&format!("/api/checkout/order/{order_number}"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["customerInfo"]["email"], "grace@example.com");

    let response = server
        .post("/api/checkout")
        .json(&json!({
            "userId": "web-1",
            "customerInfo": { "name": "Grace", "email": "grace@example.com" }
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Cart is empty");

    Ok(())
}

#[tokio::test]
async fn wishlist_over_http() -> anyhow::Result<()> {
    let fx = fixture();
    let mat = add_product(&fx.store, "Yoga Mat", "7.50", 0).await?;
    let server = TestServer::try_new(app(fx.state))?;

    let body: Value = server.get("/api/wishlist/w1").await.json();
    assert_eq!(body["data"], json!([]));

    for _ in 0..2 {
        let response = server
            .post("/api/wishlist/w1")
            .json(&json!({ "productId": mat.id }))
            .await;
        response.assert_status_ok();
    }
    let body: Value = server.get("/api/wishlist/w1").await.json();
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["inStock"], false);

    let response = server
        .post("/api/wishlist/w1")
        .json(&json!({ "productId": uuid::Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .post("/api/wishlist/w1")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .delete(&format!("/api/wishlist/w1/{}", mat.id))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"], json!([]));

    Ok(())
}

#[tokio::test]
async fn bad_requests_keep_the_envelope() -> anyhow::Result<()> {
    let fx = fixture();
    fx.store
        .insert_coupon(coupon("TEN", DiscountType::Percentage, "10"))
        .await?;
    let server = TestServer::try_new(app(fx.state))?;

    let response = server.post("/api/cart").json(&json!({ "quantity": 1 })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product ID is required");
    assert_eq!(body["data"]["error"], "Product ID is required");

    let response = server
        .post("/api/cart")
        .json(&json!({ "productId": "not-a-uuid" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["data"]["error"].is_string());

    let response = server
        .post("/api/checkout")
        .json(&json!({ "customerInfo": 5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);

    let response = server.get("/api/products/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);

    let response = server
        .post("/api/coupons/apply")
        .json(&json!({ "code": "TEN", "cartTotal": 5.0e28 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);

    Ok(())
}
