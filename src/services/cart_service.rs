//! Cart operations with the stock guards the storefront applies before it
//! touches the cart engine.

use uuid::Uuid;

use crate::{
    domain::Cart,
    dto::cart::{AddToCartRequest, CartLine, CartView, UpdateCartItemRequest},
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

async fn load_or_create(state: &AppState, user_id: &str) -> AppResult<Cart> {
    Ok(state
        .carts
        .load(user_id)
        .await?
        .unwrap_or_else(|| Cart::new(user_id)))
}

/// Render `cart` against the live catalog. Lines whose product no longer
/// resolves are dropped and the pruned cart is persisted.
async fn present(state: &AppState, mut cart: Cart) -> AppResult<CartView> {
    let mut lines = Vec::with_capacity(cart.items().len());
    let mut missing = Vec::new();

    for item in cart.items() {
        match state.catalog.product(item.product_id).await? {
            Some(product) => lines.push(CartLine {
                product_id: item.product_id,
                name: product.name,
                image: product.image,
                price: item.price,
                quantity: item.quantity,
                subtotal: item.subtotal(),
                stock: product.stock,
            }),
            None => missing.push(item.product_id),
        }
    }

    if !missing.is_empty() {
        let dropped = cart.retain_items(|i| !missing.contains(&i.product_id));
        tracing::info!(user_id = %cart.user_id(), dropped, "pruned vanished products from cart");
        state.carts.save(&cart).await?;
    }

    Ok(CartView {
        items: lines,
        total: cart.total(),
        item_count: cart.item_count(),
    })
}

pub async fn get_cart(state: &AppState, user_id: &str) -> AppResult<ApiResponse<CartView>> {
    let cart = load_or_create(state, user_id).await?;
    let view = present(state, cart).await?;
    Ok(ApiResponse::success("Cart", view, None))
}

pub async fn add_to_cart(
    state: &AppState,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let Some(product_id) = payload.product_id else {
        return Err(AppError::Validation("Product ID is required".into()));
    };
    if payload.quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".into()));
    }
    let quantity = u32::try_from(payload.quantity)
        .map_err(|_| AppError::Validation("Quantity is too large".into()))?;

    let product = state
        .catalog
        .product(product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    if !product.is_active {
        return Err(AppError::ProductUnavailable("Product is not available".into()));
    }
    if product.stock < quantity {
        return Err(AppError::OutOfStock(format!(
            "Only {} items available in stock",
            product.stock
        )));
    }

    let mut cart = load_or_create(state, &payload.user_id).await?;

    if let Some(existing) = cart.item(product.id) {
        if existing.quantity.saturating_add(quantity) > product.stock {
            return Err(AppError::OutOfStock(format!(
                "Only {} items available. You already have {} in cart.",
                product.stock, existing.quantity
            )));
        }
    }

    cart.add_item(product.id, quantity, product.price)?;
    state.carts.save(&cart).await?;
    tracing::debug!(
        user_id = %cart.user_id(),
        product_id = %product.id,
        quantity,
        total = %cart.total(),
        "item added to cart"
    );

    let view = present(state, cart).await?;
    Ok(ApiResponse::success("Item added to cart", view, None))
}

pub async fn update_item(
    state: &AppState,
    user_id: &str,
    product_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let quantity = payload
        .quantity
        .filter(|q| *q >= 0)
        .ok_or_else(|| AppError::Validation("Valid quantity is required".into()))?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| AppError::Validation("Quantity is too large".into()))?;

    let product = state
        .catalog
        .product(product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

    if quantity > product.stock {
        return Err(AppError::OutOfStock(format!(
            "Only {} items available in stock",
            product.stock
        )));
    }

    let mut cart = load_or_create(state, user_id).await?;
    cart.update_item_quantity(product_id, quantity)?;
    state.carts.save(&cart).await?;
    tracing::debug!(user_id, product_id = %product_id, quantity, "cart item updated");

    let message = if quantity > 0 {
        "Cart updated"
    } else {
        "Item removed from cart"
    };
    let view = present(state, cart).await?;
    Ok(ApiResponse::success(message, view, None))
}

pub async fn remove_item(
    state: &AppState,
    user_id: &str,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let mut cart = load_or_create(state, user_id).await?;
    cart.remove_item(product_id);
    state.carts.save(&cart).await?;
    tracing::debug!(user_id, product_id = %product_id, "cart item removed");

    let view = present(state, cart).await?;
    Ok(ApiResponse::success("Item removed from cart", view, None))
}

pub async fn clear_cart(state: &AppState, user_id: &str) -> AppResult<ApiResponse<CartView>> {
    let mut cart = load_or_create(state, user_id).await?;
    cart.clear();
    state.carts.save(&cart).await?;
    tracing::debug!(user_id, "cart cleared");

    Ok(ApiResponse::success("Cart cleared", CartView::empty(), None))
}
