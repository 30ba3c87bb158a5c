use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{CustomerInfo, Order, OrderItem, OrderStatus},
    dto::cart::guest,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default = "guest")]
    pub user_id: String,
    pub customer_info: Option<CustomerInfo>,
    pub notes: Option<String>,
    pub coupon_code: Option<String>,
}

/// What the client gets back from a successful checkout.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub discount: Decimal,
    pub amount_due: Decimal,
    pub customer_info: CustomerInfo,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<Order> for OrderReceipt {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            order_number: order.order_number,
            items: order.items,
            total: order.total,
            coupon_code: order.coupon_code,
            discount: order.discount,
            amount_due: order.amount_due,
            customer_info: order.customer_info,
            status: order.status,
            timestamp: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
