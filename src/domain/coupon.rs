//! Coupon evaluation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::money::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

/// Why a coupon cannot be applied. Variants are checked in declaration order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponError {
    #[error("Coupon is inactive")]
    Inactive,

    #[error("Coupon has expired")]
    Expired,

    #[error("Coupon usage limit reached")]
    UsageLimitReached,

    #[error("Minimum purchase of ${minimum} required")]
    MinimumPurchaseNotMet { minimum: Decimal },

    #[error("Cart total is out of range")]
    TotalOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Always stored uppercase.
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default)]
    pub min_purchase: Decimal,
    /// Cap on percentage discounts. Ignored for fixed coupons.
    pub max_discount: Option<Decimal>,
    pub expiry_date: DateTime<Utc>,
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    pub is_active: bool,
}

impl Coupon {
    /// Canonical lookup key for a user-typed code.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }

    pub fn usage_exhausted(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used_count >= limit)
    }

    /// Discount this coupon grants on `cart_total` at `now`.
    ///
    /// Never mutates usage counters. `cart_total` is taken to the cent first;
    /// the result lies in `0..=min(round2(cart_total), max_discount)`.
    pub fn calculate_discount(
        &self,
        cart_total: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, CouponError> {
        let cart_total = round2(cart_total);
        if !self.is_active {
            return Err(CouponError::Inactive);
        }
        if self.is_expired(now) {
            return Err(CouponError::Expired);
        }
        if self.usage_exhausted() {
            return Err(CouponError::UsageLimitReached);
        }
        if cart_total < self.min_purchase {
            return Err(CouponError::MinimumPurchaseNotMet {
                minimum: self.min_purchase,
            });
        }

        let discount = match self.discount_type {
            DiscountType::Percentage => {
                let raw = cart_total
                    .checked_mul(self.discount_value)
                    .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                    .ok_or(CouponError::TotalOutOfRange)?;
                match self.max_discount {
                    Some(cap) if raw > cap => cap,
                    _ => raw,
                }
            }
            DiscountType::Fixed => self.discount_value,
        };

        // Clamp after rounding so a half-cent can never lift it past the total.
        Ok(round2(discount.max(Decimal::ZERO)).min(cart_total))
    }
}
