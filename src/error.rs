use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    domain::{CartError, CouponError, CustomerInfoError},
    response::ApiResponse,
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Requested quantity exceeds live stock while editing a cart.
    #[error("{0}")]
    OutOfStock(String),

    /// Checkout found less stock than the cart asks for.
    #[error("Insufficient stock for {product_name}. Only {available} available.")]
    InsufficientStock {
        product_name: String,
        available: u32,
    },

    #[error("{0}")]
    ProductUnavailable(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid coupon code")]
    InvalidCoupon,

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error("Database error")]
    Store(#[from] StoreError),
}

impl AppError {
    /// `"<entity> not found"`.
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::OutOfStock(_)
            | AppError::InsufficientStock { .. }
            | AppError::ProductUnavailable(_)
            | AppError::EmptyCart
            | AppError::Coupon(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::InvalidCoupon => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound(_) => AppError::NotFound(err.to_string()),
            CartError::InvalidQuantity | CartError::NegativePrice => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

impl From<CustomerInfoError> for AppError {
    fn from(err: CustomerInfoError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorData {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Store(err) = &self {
            tracing::error!(error = ?err, "store failure");
        }

        let message = self.to_string();
        let body = ApiResponse::failure(
            message.clone(),
            ErrorData { error: message },
        );

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
