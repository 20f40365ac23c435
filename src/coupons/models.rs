//! Coupon API Models
//!
//! Request and response bodies for the coupon endpoints.

use crate::engine::{ApplicableCoupon, Coupon, CartLineItem, DiscountedLineItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /coupons` and `PUT /coupons/:id`.
///
/// Both fields stay loosely typed here; the rule validator decides what a
/// well-formed payload is.
#[derive(Debug, Default, Deserialize)]
pub struct CouponPayload {
    #[serde(rename = "type")]
    pub coupon_type: Option<String>,

    pub details: Option<Value>,
}

impl CouponPayload {
    pub fn is_empty(&self) -> bool {
        self.coupon_type.is_none() && self.details.is_none()
    }
}

/// Body of the cart endpoints: `{"cart": {"products": [...]}}`
#[derive(Debug, Deserialize)]
pub struct CartInput {
    pub cart: CartProducts,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartProducts {
    pub products: Vec<CartLineItem>,
}

// =============================================================================
// Responses
// =============================================================================

/// Response carrying a status message and the affected coupon
#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub message: String,
    pub coupon: Coupon,
}

#[derive(Debug, Serialize)]
pub struct CouponEnvelope {
    pub coupon: Coupon,
}

#[derive(Debug, Serialize)]
pub struct CouponList {
    pub coupons: Vec<Coupon>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicableCouponsResponse {
    pub applicable_coupons: Vec<ApplicableCoupon>,
}

#[derive(Debug, Serialize)]
pub struct UpdatedCart {
    pub products: Vec<DiscountedLineItem>,
}

/// Response of `POST /apply-coupon/:id`
#[derive(Debug, Serialize)]
pub struct ApplyCouponResponse {
    pub updated_cart: UpdatedCart,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_discount: Decimal,
}
