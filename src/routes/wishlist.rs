use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::wishlist::{AddToWishlistRequest, WishlistView},
    error::AppResult,
    response::ApiResponse,
    routes::extract::{ApiJson, ApiPath},
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", get(get_wishlist).post(add_to_wishlist))
        .route("/{user_id}/{product_id}", delete(remove_from_wishlist))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/{user_id}",
    params(("user_id" = String, Path, description = "Wishlist owner")),
    responses(
        (status = 200, description = "Wishlisted products", body = ApiResponse<WishlistView>)
    ),
    tag = "Wishlist"
)]
pub async fn get_wishlist(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> AppResult<Json<ApiResponse<WishlistView>>> {
    let resp = wishlist_service::get_wishlist(&state, &user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wishlist/{user_id}",
    params(("user_id" = String, Path, description = "Wishlist owner")),
    request_body = AddToWishlistRequest,
    responses(
        (status = 200, description = "Product added", body = ApiResponse<WishlistView>),
        (status = 400, description = "Product ID missing"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(payload): ApiJson<AddToWishlistRequest>,
) -> AppResult<Json<ApiResponse<WishlistView>>> {
    let resp = wishlist_service::add_to_wishlist(&state, &user_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{user_id}/{product_id}",
    params(
        ("user_id" = String, Path, description = "Wishlist owner"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product removed", body = ApiResponse<WishlistView>)
    ),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    ApiPath((user_id, product_id)): ApiPath<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<WishlistView>>> {
    let resp = wishlist_service::remove_from_wishlist(&state, &user_id, product_id).await?;
    Ok(Json(resp))
}
