//! Discount Rule Engine
//!
//! Pure, stateless coupon logic:
//! - Rule models (coupon types and their typed details)
//! - Cart model (line items keyed by product id)
//! - Rule validation
//! - Eligibility evaluation
//! - Coupon application
//!
//! Nothing here performs I/O or holds state between calls.

pub mod application;
pub mod cart;
pub mod eligibility;
pub mod error;
pub mod rules;
pub mod validator;

pub use application::{apply, AppliedCart, DiscountedLineItem};
pub use cart::{Cart, CartLineItem};
pub use eligibility::{applicable_coupons, evaluate, evaluate_applicability, ApplicableCoupon};
pub use error::{EngineError, ValidationError};
pub use rules::{Coupon, CouponRule, CouponType};
pub use validator::validate_rule;
