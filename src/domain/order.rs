//! Order snapshots.
//!
//! An [`Order`] copies everything it needs out of the cart and catalog at
//! checkout time so later catalog edits cannot rewrite history.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::cart::Cart,
    models::Product,
    money::{line_total, round2},
};

pub const ORDER_NUMBER_PREFIX: &str = "ORD";
pub const PAYMENT_METHOD: &str = "mock_payment";
pub const NOTES_MAX_LEN: usize = 500;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-+()]+$").expect("phone pattern compiles"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerInfoError {
    #[error("Customer name and email are required")]
    MissingNameOrEmail,

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Notes cannot exceed 500 characters")]
    NotesTooLong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerInfo {
    /// Trim and check the contact details. Email comes back lowercased; blank
    /// optional fields become `None`.
    pub fn validated(self) -> Result<Self, CustomerInfoError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() {
            return Err(CustomerInfoError::MissingNameOrEmail);
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(CustomerInfoError::InvalidEmail);
        }

        let phone = non_blank(self.phone);
        if let Some(phone) = &phone {
            if !PHONE_RE.is_match(phone) {
                return Err(CustomerInfoError::InvalidPhone);
            }
        }

        Ok(Self {
            name,
            email,
            phone,
            address: non_blank(self.address),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks free-text order notes and returns them trimmed.
pub fn validate_notes(notes: Option<String>) -> Result<Option<String>, CustomerInfoError> {
    let notes = non_blank(notes);
    if notes.as_ref().is_some_and(|n| n.chars().count() > NOTES_MAX_LEN) {
        return Err(CustomerInfoError::NotesTooLong);
    }
    Ok(notes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    #[default]
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image: String,
    pub quantity: u32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

/// Coupon accepted at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    /// Cart total at checkout, before any coupon.
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub discount: Decimal,
    pub amount_due: Decimal,
    pub customer_info: CustomerInfo,
    pub status: OrderStatus,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything an order needs except its number and timestamp.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    user_id: String,
    items: Vec<OrderItem>,
    total: Decimal,
    customer_info: CustomerInfo,
    notes: Option<String>,
    coupon: Option<AppliedCoupon>,
}

impl OrderDraft {
    /// Snapshot `cart` into order lines. Name and image come from `lookup`;
    /// quantity and unit price come from the cart. Returns the id of the
    /// first cart line whose product `lookup` cannot resolve.
    pub fn snapshot<'a>(
        cart: &Cart,
        lookup: impl Fn(Uuid) -> Option<&'a Product>,
        customer_info: CustomerInfo,
        notes: Option<String>,
    ) -> Result<Self, Uuid> {
        let items = cart
            .items()
            .iter()
            .map(|line| {
                let product = lookup(line.product_id).ok_or(line.product_id)?;
                Ok(OrderItem {
                    product_id: line.product_id,
                    product_name: product.name.clone(),
                    product_image: product.image.clone(),
                    quantity: line.quantity,
                    price: line.price,
                    subtotal: line_total(line.price, line.quantity),
                })
            })
            .collect::<Result<Vec<_>, Uuid>>()?;

        Ok(Self {
            user_id: cart.user_id().to_string(),
            items,
            total: cart.total(),
            customer_info,
            notes,
            coupon: None,
        })
    }

    pub fn with_coupon(mut self, coupon: AppliedCoupon) -> Self {
        self.coupon = Some(coupon);
        self
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Produce the immutable order. Subtotals are re-derived here so a draft
    /// that was edited can never carry a stale subtotal.
    pub fn finalize(&self, order_number: String, now: DateTime<Utc>) -> Order {
        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                item.subtotal = line_total(item.price, item.quantity);
                item
            })
            .collect();

        let (coupon_code, discount) = match &self.coupon {
            Some(c) => (Some(c.code.clone()), round2(c.discount.min(self.total))),
            None => (None, Decimal::ZERO),
        };

        Order {
            id: Uuid::new_v4(),
            order_number,
            user_id: self.user_id.clone(),
            items,
            total: self.total,
            coupon_code,
            discount,
            amount_due: round2(self.total - discount),
            customer_info: self.customer_info.clone(),
            status: OrderStatus::Confirmed,
            payment_method: PAYMENT_METHOD.to_string(),
            notes: self.notes.clone(),
            created_at: now,
        }
    }
}

/// `ORD-<unix millis>-<9 uppercase alphanumerics>`.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{ORDER_NUMBER_PREFIX}-{}-{suffix}", now.timestamp_millis())
}
