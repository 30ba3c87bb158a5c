use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Coupon, DiscountType};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    #[serde(default)]
    pub code: String,
    pub cart_total: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponApplication {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub discount: Decimal,
    pub original_total: Decimal,
    pub final_total: Decimal,
}

/// Public view of a coupon; usage counters stay private.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Decimal,
    pub max_discount: Option<Decimal>,
    pub expiry_date: DateTime<Utc>,
}

impl From<Coupon> for CouponSummary {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            min_purchase: coupon.min_purchase,
            max_discount: coupon.max_discount,
            expiry_date: coupon.expiry_date,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CouponList {
    #[schema(value_type = Vec<CouponSummary>)]
    pub items: Vec<CouponSummary>,
}
