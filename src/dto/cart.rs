use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const GUEST_USER: &str = "guest";

pub(crate) fn guest() -> String {
    GUEST_USER.to_string()
}

fn one() -> i64 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default = "guest")]
    pub user_id: String,
    pub product_id: Option<Uuid>,
    #[serde(default = "one")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub image: String,
    /// Price captured when the product was first added.
    pub price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
    /// Live stock of the product.
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
            item_count: 0,
        }
    }
}
