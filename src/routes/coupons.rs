use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::coupons::{ApplyCouponRequest, CouponApplication, CouponList},
    error::AppResult,
    response::ApiResponse,
    routes::extract::ApiJson,
    services::coupon_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons))
        .route("/apply", post(apply_coupon))
}

#[utoipa::path(
    post,
    path = "/api/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Discount preview", body = ApiResponse<CouponApplication>),
        (status = 400, description = "Missing input or coupon not applicable"),
        (status = 404, description = "Invalid coupon code"),
    ),
    tag = "Coupons"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<CouponApplication>>> {
    let resp = coupon_service::apply_coupon(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/coupons",
    responses(
        (status = 200, description = "Active, unexpired coupons", body = ApiResponse<CouponList>)
    ),
    tag = "Coupons"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CouponList>>> {
    let resp = coupon_service::list_coupons(&state).await?;
    Ok(Json(resp))
}
