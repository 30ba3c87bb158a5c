mod common;

use chrono::{Duration, Utc};
use common::{coupon, fixture, money};
use storefront_api::{
    domain::{CouponError, DiscountType},
    dto::coupons::ApplyCouponRequest,
    error::AppError,
    services::coupon_service,
    store::CouponStore,
};

fn apply(code: &str, total: &str) -> ApplyCouponRequest {
    ApplyCouponRequest {
        code: code.to_string(),
        cart_total: Some(money(total)),
    }
}

#[tokio::test]
async fn percentage_discount_is_capped() -> anyhow::Result<()> {
    let fx = fixture();
    let mut capped = coupon("TENOFF", DiscountType::Percentage, "10");
    capped.max_discount = Some(money("2.00"));
    fx.store.insert_coupon(capped).await?;

    let resp = coupon_service::apply_coupon(&fx.state, apply("tenoff", "30.00")).await?;
    let data = resp.data.expect("coupon application");

    assert_eq!(data.code, "TENOFF");
    assert_eq!(data.discount, money("2.00"));
    assert_eq!(data.original_total, money("30.00"));
    assert_eq!(data.final_total, money("28.00"));

    // Previewing never counts as a use.
    let stored = fx.store.find_active("TENOFF").await?.expect("coupon");
    assert_eq!(stored.used_count, 0);

    Ok(())
}

#[tokio::test]
async fn fixed_discount_never_exceeds_total() -> anyhow::Result<()> {
    let fx = fixture();
    fx.store
        .insert_coupon(coupon("SAVE20", DiscountType::Fixed, "20"))
        .await?;

    let data = coupon_service::apply_coupon(&fx.state, apply("SAVE20", "12.50"))
        .await?
        .data
        .expect("coupon application");
    assert_eq!(data.discount, money("12.50"));
    assert_eq!(data.final_total, money("0"));

    Ok(())
}

#[tokio::test]
async fn fractional_cent_totals_never_go_negative() -> anyhow::Result<()> {
    let fx = fixture();
    fx.store
        .insert_coupon(coupon("SAVE20", DiscountType::Fixed, "20"))
        .await?;

    let data = coupon_service::apply_coupon(&fx.state, apply("SAVE20", "10.005"))
        .await?
        .data
        .expect("coupon application");
    assert_eq!(data.original_total, money("10.01"));
    assert_eq!(data.discount, money("10.01"));
    assert_eq!(data.final_total, money("0"));

    Ok(())
}

#[tokio::test]
async fn huge_totals_are_a_client_error() -> anyhow::Result<()> {
    let fx = fixture();
    fx.store
        .insert_coupon(coupon("TEN", DiscountType::Percentage, "10"))
        .await?;

    let request = ApplyCouponRequest {
        code: "TEN".into(),
        cart_total: Some(rust_decimal::Decimal::MAX),
    };
    let result = coupon_service::apply_coupon(&fx.state, request).await;
    assert!(matches!(
        result,
        Err(AppError::Coupon(CouponError::TotalOutOfRange))
    ));

    Ok(())
}

#[tokio::test]
async fn rejections() -> anyhow::Result<()> {
    let fx = fixture();

    let mut minimum = coupon("BIGSPEND", DiscountType::Fixed, "5");
    minimum.min_purchase = money("50");
    fx.store.insert_coupon(minimum).await?;

    let mut expired = coupon("OLD", DiscountType::Fixed, "5");
    expired.expiry_date = Utc::now() - Duration::days(1);
    fx.store.insert_coupon(expired).await?;

    let mut spent = coupon("ONCE", DiscountType::Fixed, "5");
    spent.usage_limit = Some(1);
    spent.used_count = 1;
    fx.store.insert_coupon(spent).await?;

    let mut off = coupon("OFF", DiscountType::Fixed, "5");
    off.is_active = false;
    fx.store.insert_coupon(off).await?;

    let below = coupon_service::apply_coupon(&fx.state, apply("BIGSPEND", "49.99")).await;
    assert!(matches!(
        &below,
        Err(AppError::Coupon(CouponError::MinimumPurchaseNotMet { .. }))
    ));
    assert!(below.is_err_and(|e| e.to_string().contains("50")));

    let old = coupon_service::apply_coupon(&fx.state, apply("OLD", "10")).await;
    assert!(matches!(old, Err(AppError::Coupon(CouponError::Expired))));

    let once = coupon_service::apply_coupon(&fx.state, apply("ONCE", "10")).await;
    assert!(matches!(once, Err(AppError::Coupon(CouponError::UsageLimitReached))));

    // Inactive coupons are not found at all.
    let inactive = coupon_service::apply_coupon(&fx.state, apply("OFF", "10")).await;
    assert!(matches!(inactive, Err(AppError::InvalidCoupon)));

    let unknown = coupon_service::apply_coupon(&fx.state, apply("NOPE", "10")).await;
    assert!(matches!(unknown, Err(AppError::InvalidCoupon)));

    let blank = coupon_service::apply_coupon(&fx.state, apply("  ", "10")).await;
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let zero = coupon_service::apply_coupon(&fx.state, apply("BIGSPEND", "0")).await;
    assert!(matches!(zero, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn listing_shows_only_usable_coupons() -> anyhow::Result<()> {
    let fx = fixture();
    fx.store
        .insert_coupon(coupon("B-LIVE", DiscountType::Fixed, "5"))
        .await?;
    fx.store
        .insert_coupon(coupon("A-LIVE", DiscountType::Percentage, "15"))
        .await?;

    let mut expired = coupon("OLD", DiscountType::Fixed, "5");
    expired.expiry_date = Utc::now() - Duration::days(1);
    fx.store.insert_coupon(expired).await?;

    let mut off = coupon("OFF", DiscountType::Fixed, "5");
    off.is_active = false;
    fx.store.insert_coupon(off).await?;

    let resp = coupon_service::list_coupons(&fx.state).await?;
    assert_eq!(resp.meta.and_then(|m| m.count), Some(2));
    let codes: Vec<String> = resp
        .data
        .expect("coupon list")
        .items
        .into_iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, ["A-LIVE", "B-LIVE"]);

    Ok(())
}
