//! Rule Validator
//!
//! Turns a raw `(type, details)` payload into a typed [`CouponRule`].
//! Checks short-circuit on the first failure. For bxgy the order is:
//! presence, list shape, per-item shape, item quantities, repetition limit.

use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::error::ValidationError;
use super::rules::{
    BundleProduct, BxGyDetails, CartWiseDetails, CouponRule, CouponType, ProductWiseDetails,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

type Details = Map<String, Value>;

/// Validates a coupon payload and returns its typed rule.
///
/// Money fields are only checked for presence and numeric type; their sign
/// is not constrained.
pub fn validate_rule(coupon_type: &str, details: &Value) -> ValidationResult<CouponRule> {
    let coupon_type = CouponType::from_str(coupon_type)?;

    let details = details.as_object().ok_or(ValidationError::WrongShape {
        field: "details",
        expected: "an object",
    })?;

    match coupon_type {
        CouponType::CartWise => validate_cart_wise(details).map(CouponRule::CartWise),
        CouponType::ProductWise => validate_product_wise(details).map(CouponRule::ProductWise),
        CouponType::Bxgy => validate_bxgy(details).map(CouponRule::Bxgy),
    }
}

fn validate_cart_wise(details: &Details) -> ValidationResult<CartWiseDetails> {
    let threshold = require(details, CouponType::CartWise, "threshold")?;
    let discount = require(details, CouponType::CartWise, "discount")?;

    Ok(CartWiseDetails {
        threshold: money(threshold, "threshold")?,
        discount: money(discount, "discount")?,
    })
}

fn validate_product_wise(details: &Details) -> ValidationResult<ProductWiseDetails> {
    let product_id = require(details, CouponType::ProductWise, "product_id")?;
    let discount = require(details, CouponType::ProductWise, "discount")?;

    Ok(ProductWiseDetails {
        product_id: product_id_value(product_id, "product_id")?,
        discount: money(discount, "discount")?,
    })
}

fn validate_bxgy(details: &Details) -> ValidationResult<BxGyDetails> {
    let buy = require(details, CouponType::Bxgy, "buy_products")?;
    let get = require(details, CouponType::Bxgy, "get_products")?;
    let limit = require(details, CouponType::Bxgy, "repetition_limit")?;

    let buy = bundle_list(buy, "buy_products")?;
    let get = bundle_list(get, "get_products")?;

    let buy_entries = bundle_entries(buy, "buy_products")?;
    let get_entries = bundle_entries(get, "get_products")?;

    let buy_products = bundle_products(&buy_entries, "buy_products.quantity")?;
    let get_products = bundle_products(&get_entries, "get_products.quantity")?;

    Ok(BxGyDetails {
        buy_products,
        get_products,
        repetition_limit: positive_integer(limit, "repetition_limit")?,
    })
}

// =============================================================================
// Field helpers
// =============================================================================

fn require<'a>(
    details: &'a Details,
    coupon_type: CouponType,
    field: &'static str,
) -> ValidationResult<&'a Value> {
    details.get(field).ok_or(ValidationError::MissingField {
        coupon_type: coupon_type.as_str(),
        field,
    })
}

fn money(value: &Value, field: &'static str) -> ValidationResult<Decimal> {
    let Value::Number(n) = value else {
        return Err(ValidationError::InvalidValue {
            field,
            expected: "a number",
        });
    };

    Decimal::from_str(&n.to_string())
        .ok()
        .or_else(|| n.as_f64().and_then(Decimal::from_f64))
        .ok_or(ValidationError::OutOfRange { field })
}

fn product_id_value(value: &Value, field: &'static str) -> ValidationResult<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(ValidationError::InvalidValue {
            field,
            expected: "a string",
        })
}

/// Parses an integer that must be strictly positive.
///
/// Floats without a fractional part are accepted. Values beyond `u32::MAX`
/// saturate.
fn positive_integer(value: &Value, field: &'static str) -> ValidationResult<u32> {
    let whole = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    };
    let n = whole.ok_or(ValidationError::InvalidValue {
        field,
        expected: "an integer",
    })?;

    if n <= 0 {
        return Err(ValidationError::InvalidRange { field });
    }

    Ok(u32::try_from(n).unwrap_or(u32::MAX))
}

fn bundle_list<'a>(value: &'a Value, field: &'static str) -> ValidationResult<&'a Vec<Value>> {
    value.as_array().ok_or(ValidationError::WrongShape {
        field,
        expected: "a list",
    })
}

/// Checks every entry carries `product_id` and `quantity`.
fn bundle_entries<'a>(
    entries: &'a [Value],
    field: &'static str,
) -> ValidationResult<Vec<(&'a Value, &'a Value)>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let product_id = entry.get("product_id").ok_or(ValidationError::InvalidItem {
                field,
                index,
                missing: "product_id",
            })?;
            let quantity = entry.get("quantity").ok_or(ValidationError::InvalidItem {
                field,
                index,
                missing: "quantity",
            })?;
            Ok((product_id, quantity))
        })
        .collect()
}

fn bundle_products(
    entries: &[(&Value, &Value)],
    quantity_field: &'static str,
) -> ValidationResult<Vec<BundleProduct>> {
    entries
        .iter()
        .map(|(product_id, quantity)| {
            Ok(BundleProduct {
                product_id: product_id_value(product_id, "product_id")?,
                quantity: positive_integer(quantity, quantity_field)?,
            })
        })
        .collect()
}
