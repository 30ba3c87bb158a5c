use uuid::Uuid;

use crate::{
    dto::{
        products::ProductDto,
        wishlist::{AddToWishlistRequest, WishlistView},
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Resolve the listed ids against the catalog. Products that no longer
/// exist are skipped.
async fn present(state: &AppState, user_id: &str) -> AppResult<WishlistView> {
    let mut items = Vec::new();
    for product_id in state.wishlists.wishlist(user_id).await? {
        if let Some(product) = state.catalog.product(product_id).await? {
            items.push(ProductDto::from(product));
        }
    }
    Ok(WishlistView { items })
}

pub async fn get_wishlist(state: &AppState, user_id: &str) -> AppResult<ApiResponse<WishlistView>> {
    let view = present(state, user_id).await?;
    let meta = Meta::count(view.items.len());
    Ok(ApiResponse::success("Wishlist", view, Some(meta)))
}

pub async fn add_to_wishlist(
    state: &AppState,
    user_id: &str,
    payload: AddToWishlistRequest,
) -> AppResult<ApiResponse<WishlistView>> {
    let product_id = payload
        .product_id
        .ok_or_else(|| AppError::Validation("Product ID is required".into()))?;

    if state.catalog.product(product_id).await?.is_none() {
        return Err(AppError::not_found("Product"));
    }

    if state.wishlists.add(user_id, product_id).await? {
        tracing::debug!(user_id, product_id = %product_id, "added to wishlist");
    }

    let view = present(state, user_id).await?;
    let meta = Meta::count(view.items.len());
    Ok(ApiResponse::success("Product added to wishlist", view, Some(meta)))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    user_id: &str,
    product_id: Uuid,
) -> AppResult<ApiResponse<WishlistView>> {
    if state.wishlists.remove(user_id, product_id).await? {
        tracing::debug!(user_id, product_id = %product_id, "removed from wishlist");
    }

    let view = present(state, user_id).await?;
    let meta = Meta::count(view.items.len());
    Ok(ApiResponse::success("Product removed from wishlist", view, Some(meta)))
}
