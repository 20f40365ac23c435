//! REST API handlers for coupon management and discounting
//!
//! CRUD endpoints over the coupon store plus the two cart endpoints that
//! drive the discount engine.

use super::{helpers::*, models::*, state::SharedState};
use crate::engine::{self, Coupon};
use crate::error::{AppError, ERROR_COUPON_NOT_FOUND, ERROR_INVALID_CART, ERROR_INVALID_PAYLOAD};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

/// Creates routes for coupon operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/coupons", post(create_coupon).get(list_coupons))
        .route(
            "/coupons/:id",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route("/applicable-coupons", post(applicable_coupons))
        .route("/apply-coupon/:id", post(apply_coupon))
}

fn coupon_payload(
    body: Result<Json<CouponPayload>, JsonRejection>,
) -> Result<CouponPayload, AppError> {
    body.map(|Json(payload)| payload).map_err(|e| {
        tracing::debug!("coupon payload rejected: {}", e.body_text());
        AppError::BadRequest(ERROR_INVALID_PAYLOAD.to_string())
    })
}

fn cart_input(body: Result<Json<CartInput>, JsonRejection>) -> Result<CartInput, AppError> {
    body.map(|Json(input)| input).map_err(|e| {
        tracing::debug!("cart payload rejected: {}", e.body_text());
        AppError::BadRequest(ERROR_INVALID_CART.to_string())
    })
}

fn find_coupon(state: &SharedState, id: &str) -> Result<Coupon, AppError> {
    state
        .coupons
        .get(id)
        .ok_or_else(|| AppError::NotFound(ERROR_COUPON_NOT_FOUND.to_string()))
}

/// Endpoint: POST /coupons
/// Validates the payload and stores it under a new id.
async fn create_coupon(
    State(state): State<SharedState>,
    body: Result<Json<CouponPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = coupon_payload(body)?;
    let (Some(coupon_type), Some(details)) = (payload.coupon_type, payload.details) else {
        return Err(AppError::BadRequest(ERROR_INVALID_PAYLOAD.to_string()));
    };

    let rule = engine::validate_rule(&coupon_type, &details)?;
    let coupon = state.coupons.insert(Coupon {
        id: new_coupon_id(),
        rule,
    })?;

    tracing::info!(
        coupon_id = %coupon.id,
        coupon_type = %coupon.rule.coupon_type(),
        "coupon created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CouponResponse {
            message: "Coupon created successfully".to_string(),
            coupon,
        }),
    ))
}

/// Endpoint: GET /coupons
async fn list_coupons(State(state): State<SharedState>) -> Json<CouponList> {
    Json(CouponList {
        coupons: state.coupons.list(),
    })
}

/// Endpoint: GET /coupons/:id
async fn get_coupon(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CouponEnvelope>, AppError> {
    let coupon = find_coupon(&state, &id)?;
    Ok(Json(CouponEnvelope { coupon }))
}

/// Endpoint: PUT /coupons/:id
/// Merges the supplied fields over the stored coupon and re-validates.
async fn update_coupon(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<CouponPayload>, JsonRejection>,
) -> Result<Json<CouponResponse>, AppError> {
    let payload = coupon_payload(body)?;
    if payload.is_empty() {
        return Err(AppError::BadRequest(ERROR_INVALID_PAYLOAD.to_string()));
    }

    let existing = find_coupon(&state, &id)?;
    let (coupon_type, details) = merge_update(&existing, payload);
    let rule = engine::validate_rule(&coupon_type, &details)?;
    let coupon = state.coupons.replace(&id, rule)?;

    tracing::info!(coupon_id = %coupon.id, "coupon updated");

    Ok(Json(CouponResponse {
        message: "Coupon updated successfully".to_string(),
        coupon,
    }))
}

/// Endpoint: DELETE /coupons/:id
/// Idempotent; deleting an unknown id still succeeds.
async fn delete_coupon(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<MessageResponse> {
    if state.coupons.remove(&id).is_some() {
        tracing::info!(coupon_id = %id, "coupon deleted");
    }

    Json(MessageResponse {
        message: "Coupon deleted successfully".to_string(),
    })
}

/// Endpoint: POST /applicable-coupons
/// Lists every stored coupon that would discount the cart.
async fn applicable_coupons(
    State(state): State<SharedState>,
    body: Result<Json<CartInput>, JsonRejection>,
) -> Result<Json<ApplicableCouponsResponse>, AppError> {
    let cart = cart_from_input(cart_input(body)?);
    let coupons = state.coupons.list();

    let applicable_coupons = engine::applicable_coupons(&coupons, &cart)?;
    tracing::info!(
        cart = %format_cart_summary(&cart),
        evaluated = coupons.len(),
        applicable = applicable_coupons.len(),
        "evaluated coupons"
    );

    Ok(Json(ApplicableCouponsResponse { applicable_coupons }))
}

/// Endpoint: POST /apply-coupon/:id
/// Applies one coupon and returns the discounted cart.
async fn apply_coupon(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<CartInput>, JsonRejection>,
) -> Result<Json<ApplyCouponResponse>, AppError> {
    let cart = cart_from_input(cart_input(body)?);
    let coupon = find_coupon(&state, &id)?;

    let applied = engine::apply(&coupon.rule, &cart)?;
    tracing::info!(
        coupon_id = %coupon.id,
        cart = %format_cart_summary(&cart),
        total_discount = %applied.total_discount,
        "coupon applied"
    );

    Ok(Json(ApplyCouponResponse {
        updated_cart: UpdatedCart {
            products: applied.updated_line_items,
        },
        total_discount: applied.total_discount,
    }))
}
