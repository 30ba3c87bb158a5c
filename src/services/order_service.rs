use crate::{
    domain::Order,
    dto::orders::OrderList,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Order history is capped at this many records, newest first.
pub const ORDER_HISTORY_LIMIT: u64 = 50;

pub async fn list_orders(state: &AppState, user_id: &str) -> AppResult<ApiResponse<OrderList>> {
    let items = state.orders.by_user(user_id, ORDER_HISTORY_LIMIT).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, order_number: &str) -> AppResult<ApiResponse<Order>> {
    let order = state
        .orders
        .by_number(order_number)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success("Order", order, None))
}
