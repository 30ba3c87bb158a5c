use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{response::ApiResponse, state::AppState};

pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod doc;
pub mod extract;
pub mod health;
pub mod params;
pub mod products;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/coupons", coupons::router())
        .nest("/checkout", checkout::router())
        .nest("/wishlist", wishlist::router())
}

/// Health check, `/api`, docs and the JSON 404 fallback, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::failure(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
