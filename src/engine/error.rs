//! Engine Error Kinds
//!
//! Validation failures are returned before a coupon is accepted; engine
//! outcomes describe why a coupon produced no discount or why a single line
//! was left untouched during application.

use thiserror::Error;

/// Reasons a coupon rule is rejected by the validator.
///
/// Each variant maps to exactly one user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required rule parameter is absent.
    #[error("Invalid {coupon_type} details: missing field `{field}`")]
    MissingField {
        coupon_type: &'static str,
        field: &'static str,
    },

    /// A field expected to be a sequence (or object) has another shape.
    #[error("`{field}` has the wrong shape: expected {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },

    /// An entry inside a sequence field lacks a required sub-field.
    #[error("Invalid {field} structure: entry {index} is missing `{missing}`")]
    InvalidItem {
        field: &'static str,
        index: usize,
        missing: &'static str,
    },

    /// A numeric field is outside its allowed range.
    #[error("`{field}` must be greater than zero")]
    InvalidRange { field: &'static str },

    /// A numeric literal cannot be represented as a decimal amount.
    #[error("`{field}` is outside the supported numeric range")]
    OutOfRange { field: &'static str },

    /// A present field carries a value of the wrong type.
    #[error("`{field}` has an invalid value: expected {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },

    /// The coupon type discriminator is not recognised.
    #[error("Invalid coupon type: {0}")]
    UnknownCouponType(String),
}

/// Non-fatal outcomes reported by the evaluator and the application engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The coupon yields no discount for this cart.
    #[error("Coupon {coupon_id} is not applicable to this cart")]
    NotApplicable { coupon_id: String },

    /// A line item has zero quantity, so a per-unit price cannot be derived.
    #[error("Cannot discount line {product_id}: quantity is zero")]
    DivisionByZero { product_id: String },

    /// Cart amounts exceed the decimal range.
    #[error("Cart amounts are too large to discount")]
    Overflow,
}

/// Maps a `checked_*` result onto [`EngineError::Overflow`].
pub(crate) fn checked<T>(value: Option<T>) -> Result<T, EngineError> {
    value.ok_or(EngineError::Overflow)
}
