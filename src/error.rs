//! HTTP-facing errors.
//!
//! Every failure surfaces as `{"error": "<message>"}` with a matching status.

use crate::coupons::store::StoreError;
use crate::engine::{EngineError, ValidationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const ERROR_INVALID_PAYLOAD: &str = "Invalid payload";
pub const ERROR_INVALID_CART: &str = "Invalid cart structure";
pub const ERROR_COUPON_NOT_FOUND: &str = "Coupon not found";
pub const ERROR_SIMILAR_COUPON_EXISTS: &str = "A similar coupon already exists";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{}", ERROR_SIMILAR_COUPON_EXISTS)]
    DuplicateCoupon { existing_id: String },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(ERROR_COUPON_NOT_FOUND.to_string()),
            StoreError::Duplicate { existing_id } => AppError::DuplicateCoupon { existing_id },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::Engine(_)
            | AppError::DuplicateCoupon { .. } => StatusCode::BAD_REQUEST,
        };

        match &self {
            AppError::DuplicateCoupon { existing_id } => {
                tracing::info!(%existing_id, "rejected duplicate coupon");
            }
            other => tracing::debug!(%status, "{}", other),
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
