use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    dto::coupons::{ApplyCouponRequest, CouponApplication, CouponList, CouponSummary},
    error::{AppError, AppResult},
    money::round2,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Preview a coupon against a cart total. Usage counters are left alone;
/// only checkout redeems a coupon.
pub async fn apply_coupon(
    state: &AppState,
    payload: ApplyCouponRequest,
) -> AppResult<ApiResponse<CouponApplication>> {
    let code = payload.code.trim();
    let Some(cart_total) = payload
        .cart_total
        .map(round2)
        .filter(|total| *total > Decimal::ZERO && !code.is_empty())
    else {
        return Err(AppError::Validation(
            "Coupon code and cart total are required".into(),
        ));
    };

    let coupon = state
        .coupons
        .find_active(code)
        .await?
        .ok_or(AppError::InvalidCoupon)?;

    let discount = coupon.calculate_discount(cart_total, Utc::now())?;

    Ok(ApiResponse::success(
        "Coupon applied",
        CouponApplication {
            code: coupon.code,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            discount,
            original_total: cart_total,
            final_total: round2(cart_total - discount),
        },
        None,
    ))
}

pub async fn list_coupons(state: &AppState) -> AppResult<ApiResponse<CouponList>> {
    let items: Vec<CouponSummary> = state
        .coupons
        .active_coupons(Utc::now())
        .await?
        .into_iter()
        .map(CouponSummary::from)
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Coupons", CouponList { items }, Some(meta)))
}
