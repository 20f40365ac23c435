//! Coupon Helpers
//!
//! Small pure functions shared by the coupon handlers.

use super::models::{CartInput, CouponPayload};
use crate::engine::{Cart, Coupon};
use serde_json::Value;
use uuid::Uuid;

/// Generates a fresh opaque coupon identifier.
pub fn new_coupon_id() -> String {
    Uuid::new_v4().to_string()
}

/// Normalizes request line items into the engine's cart model.
pub fn cart_from_input(input: CartInput) -> Cart {
    Cart::from_line_items(input.cart.products)
}

/// Overlays the supplied `type`/`details` on a stored coupon.
///
/// Fields missing from the payload keep their stored values, so the merged
/// pair can be validated as a whole before it replaces the coupon.
pub fn merge_update(existing: &Coupon, payload: CouponPayload) -> (String, Value) {
    let coupon_type = payload
        .coupon_type
        .unwrap_or_else(|| existing.rule.coupon_type().as_str().to_string());

    let details = payload.details.unwrap_or_else(|| {
        serde_json::to_value(&existing.rule)
            .ok()
            .and_then(|mut rule| rule.get_mut("details").map(Value::take))
            .unwrap_or(Value::Null)
    });

    (coupon_type, details)
}

/// One-line summary of a cart for logs, e.g. `"3x A, 10x B"`.
pub fn format_cart_summary(cart: &Cart) -> String {
    cart.line_items()
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product_id))
        .collect::<Vec<_>>()
        .join(", ")
}
