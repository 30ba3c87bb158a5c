use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, UpdateCartItemRequest},
    error::AppResult,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_to_cart))
        .route("/{user_id}", get(get_cart).delete(clear_cart))
        .route(
            "/{user_id}/item/{product_id}",
            put(update_cart_item).delete(remove_cart_item),
        )
}

#[utoipa::path(
    get,
    path = "/api/cart/{user_id}",
    params(("user_id" = String, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "Cart with live product details", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid quantity or not enough stock"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartView>>)> {
    let resp = cart_service::add_to_cart(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/cart/{user_id}/item/{product_id}",
    params(
        ("user_id" = String, Path, description = "Cart owner"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity set; zero removes the line", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid quantity or not enough stock"),
        (status = 404, description = "Product or cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    ApiPath((user_id, product_id)): ApiPath<(String, Uuid)>,
    ApiJson(payload): ApiJson<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_item(&state, &user_id, product_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{user_id}/item/{product_id}",
    params(
        ("user_id" = String, Path, description = "Cart owner"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    ApiPath((user_id, product_id)): ApiPath<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&state, &user_id, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{user_id}",
    params(("user_id" = String, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::clear_cart(&state, &user_id).await?;
    Ok(Json(resp))
}
