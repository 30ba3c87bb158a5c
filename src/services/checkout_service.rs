//! Checkout pipeline.
//!
//! Customer details, the cart, live stock and the optional coupon are all
//! checked before the first write. After that every write has a matching
//! release: stock is reserved in one all-or-nothing step, the coupon is
//! redeemed, and if the order cannot be stored both are given back.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{
        AppliedCoupon, CouponError, CustomerInfoError, Order, OrderDraft,
        order::{generate_order_number, validate_notes},
    },
    dto::orders::{CheckoutRequest, OrderReceipt},
    error::{AppError, AppResult},
    models::Product,
    response::ApiResponse,
    state::AppState,
    store::{StockLine, StoreError},
};

/// How many order numbers are tried before a collision becomes an error.
pub const ORDER_NUMBER_ATTEMPTS: u32 = 3;

pub async fn checkout(
    state: &AppState,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderReceipt>> {
    let user_id = payload.user_id.clone();

    match place_order(state, payload).await {
        Ok(order) => {
            tracing::info!(
                user_id = %order.user_id,
                order_number = %order.order_number,
                total = %order.total,
                discount = %order.discount,
                items = order.items.len(),
                "order placed"
            );
            Ok(ApiResponse::success(
                "Order placed successfully",
                OrderReceipt::from(order),
                None,
            ))
        }
        Err(err) => {
            if err.status().is_client_error() {
                tracing::warn!(user_id = %user_id, reason = %err, "checkout rejected");
            }
            Err(err)
        }
    }
}

async fn place_order(state: &AppState, payload: CheckoutRequest) -> AppResult<Order> {
    let CheckoutRequest {
        user_id,
        customer_info,
        notes,
        coupon_code,
    } = payload;

    let customer_info = customer_info
        .ok_or(CustomerInfoError::MissingNameOrEmail)?
        .validated()?;
    let notes = validate_notes(notes)?;
    let coupon_code = coupon_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let mut cart = match state.carts.load(&user_id).await? {
        Some(cart) if !cart.is_empty() => cart,
        _ => return Err(AppError::EmptyCart),
    };

    let mut products: HashMap<Uuid, Product> = HashMap::with_capacity(cart.items().len());
    for item in cart.items() {
        let product = state
            .catalog
            .product(item.product_id)
            .await?
            .ok_or_else(|| unavailable(item.product_id))?;
        if product.stock < item.quantity {
            return Err(AppError::InsufficientStock {
                product_name: product.name,
                available: product.stock,
            });
        }
        products.insert(product.id, product);
    }

    let now = Utc::now();
    let applied = match coupon_code {
        Some(code) => {
            let coupon = state
                .coupons
                .find_active(&code)
                .await?
                .ok_or(AppError::InvalidCoupon)?;
            let discount = coupon.calculate_discount(cart.total(), now)?;
            Some(AppliedCoupon {
                code: coupon.code,
                discount,
            })
        }
        None => None,
    };

    let mut draft = OrderDraft::snapshot(&cart, |id| products.get(&id), customer_info, notes)
        .map_err(unavailable)?;
    if let Some(coupon) = applied.clone() {
        draft = draft.with_coupon(coupon);
    }

    let lines: Vec<StockLine> = draft
        .items()
        .iter()
        .map(|item| StockLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    if let Err(err) = state.catalog.reserve_stock(&lines).await {
        return Err(match err {
            StoreError::StockShortage {
                product_id,
                available,
            } => AppError::InsufficientStock {
                product_name: products
                    .get(&product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| product_id.to_string()),
                available,
            },
            StoreError::MissingProduct(id) => unavailable(id),
            other => other.into(),
        });
    }

    let redeemed = match &applied {
        Some(coupon) => match state.coupons.redeem(&coupon.code).await {
            Ok(()) => Some(coupon.code.as_str()),
            Err(err) => {
                release(state, &lines, None).await;
                return Err(match err {
                    StoreError::CouponExhausted(_) => CouponError::UsageLimitReached.into(),
                    other => other.into(),
                });
            }
        },
        None => None,
    };

    let mut attempt = 1;
    let order = loop {
        let order = draft.finalize(generate_order_number(Utc::now()), now);
        match state.orders.insert(&order).await {
            Ok(()) => break order,
            Err(StoreError::Conflict(number)) if attempt < ORDER_NUMBER_ATTEMPTS => {
                tracing::warn!(order_number = %number, attempt, "order number taken, retrying");
                attempt += 1;
            }
            Err(err) => {
                release(state, &lines, redeemed).await;
                return Err(err.into());
            }
        }
    };

    cart.clear();
    if let Err(err) = state.carts.save(&cart).await {
        tracing::error!(
            order_number = %order.order_number,
            error = ?err,
            "order placed but cart could not be cleared"
        );
    }

    Ok(order)
}

fn unavailable(product_id: Uuid) -> AppError {
    AppError::ProductUnavailable(format!("Product {product_id} is no longer available"))
}

async fn release(state: &AppState, lines: &[StockLine], coupon: Option<&str>) {
    if let Err(err) = state.catalog.release_stock(lines).await {
        tracing::error!(error = ?err, "failed to release reserved stock");
    }
    if let Some(code) = coupon {
        if let Err(err) = state.coupons.release(code).await {
            tracing::error!(code, error = ?err, "failed to release coupon redemption");
        }
    }
}
