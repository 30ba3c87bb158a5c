use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    domain::Order,
    dto::orders::{CheckoutRequest, OrderList, OrderReceipt},
    error::AppResult,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::{checkout_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout))
        .route("/orders/{user_id}", get(list_orders))
        .route("/order/{order_number}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderReceipt>),
        (status = 400, description = "Invalid details, empty cart, stock or coupon problem"),
        (status = 404, description = "Invalid coupon code"),
    ),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderReceipt>>)> {
    let resp = checkout_service::checkout(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/checkout/orders/{user_id}",
    params(("user_id" = String, Path, description = "Order owner")),
    responses(
        (status = 200, description = "Up to 50 most recent orders", body = ApiResponse<OrderList>)
    ),
    tag = "Checkout"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/checkout/order/{order_number}",
    params(("order_number" = String, Path, description = "Order number")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Checkout"
)]
pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(order_number): ApiPath<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, &order_number).await?;
    Ok(Json(resp))
}
