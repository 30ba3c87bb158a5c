//! Monetary rounding shared by carts, coupons and orders.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to cents, half away from zero.
///
/// Cart totals, coupon discounts and order line subtotals all go through this
/// one function so the three views can never disagree by a cent.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `round2(price * quantity)`.
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    round2(price * Decimal::from(quantity))
}
