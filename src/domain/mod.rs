//! Pricing and checkout rules, free of any I/O.

pub mod cart;
pub mod coupon;
pub mod order;

pub use cart::{Cart, CartError, CartItem};
pub use coupon::{Coupon, CouponError, DiscountType};
pub use order::{
    AppliedCoupon, CustomerInfo, CustomerInfoError, Order, OrderDraft, OrderItem, OrderStatus,
};
