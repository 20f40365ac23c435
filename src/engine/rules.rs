//! Coupon Rule Models
//!
//! A coupon's parameters are a tagged union keyed by its type, so every
//! variant carries exactly the fields its discount algorithm needs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::error::ValidationError;

// =============================================================================
// Coupon Type
// =============================================================================

/// Discriminator for the three supported discount algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouponType {
    /// Flat discount once the cart total reaches a threshold
    CartWise,
    /// Per-unit discount on a single product
    ProductWise,
    /// Buy X get Y free, scaled by satisfied bundles
    Bxgy,
}

impl CouponType {
    /// Wire name of the type (`cart-wise`, `product-wise`, `bxgy`)
    pub const fn as_str(&self) -> &'static str {
        match self {
            CouponType::CartWise => "cart-wise",
            CouponType::ProductWise => "product-wise",
            CouponType::Bxgy => "bxgy",
        }
    }
}

impl fmt::Display for CouponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart-wise" => Ok(CouponType::CartWise),
            "product-wise" => Ok(CouponType::ProductWise),
            "bxgy" => Ok(CouponType::Bxgy),
            other => Err(ValidationError::UnknownCouponType(other.to_string())),
        }
    }
}

// =============================================================================
// Rule Details
// =============================================================================

/// Parameters of a cart-wise coupon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartWiseDetails {
    /// Minimum cart total for the coupon to apply
    #[serde(with = "rust_decimal::serde::float")]
    pub threshold: Decimal,

    /// Flat amount taken off the cart
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
}

/// Parameters of a product-wise coupon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductWiseDetails {
    pub product_id: String,

    /// Amount taken off each unit of the product
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
}

/// One entry of a bxgy buy or get list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleProduct {
    pub product_id: String,
    pub quantity: u32,
}

/// Parameters of a buy-X-get-Y coupon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BxGyDetails {
    /// Products (and quantities) that make up one bundle
    pub buy_products: Vec<BundleProduct>,

    /// Products granted free per satisfied bundle
    pub get_products: Vec<BundleProduct>,

    /// Upper bound on how many bundles are honoured
    pub repetition_limit: u32,
}

/// A validated coupon rule, tagged by its type.
///
/// Equality and hashing compare decimal values numerically, so `5` and
/// `5.0` describe the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "details", rename_all = "kebab-case")]
pub enum CouponRule {
    CartWise(CartWiseDetails),
    ProductWise(ProductWiseDetails),
    Bxgy(BxGyDetails),
}

impl CouponRule {
    /// Returns the discriminator for this rule
    pub fn coupon_type(&self) -> CouponType {
        match self {
            CouponRule::CartWise(_) => CouponType::CartWise,
            CouponRule::ProductWise(_) => CouponType::ProductWise,
            CouponRule::Bxgy(_) => CouponType::Bxgy,
        }
    }
}

/// A coupon as held by the store: an opaque identifier plus its rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,

    #[serde(flatten)]
    pub rule: CouponRule,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coupon_type_round_trips_wire_names() {
        for name in ["cart-wise", "product-wise", "bxgy"] {
            let parsed: CouponType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!(matches!(
            "percent-off".parse::<CouponType>(),
            Err(ValidationError::UnknownCouponType(t)) if t == "percent-off"
        ));
    }

    #[test]
    fn test_coupon_serializes_flat_with_type_and_details() {
        let coupon = Coupon {
            id: "c1".into(),
            rule: CouponRule::CartWise(CartWiseDetails {
                threshold: Decimal::from(100),
                discount: Decimal::from(10),
            }),
        };

        let value = serde_json::to_value(&coupon).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "c1",
                "type": "cart-wise",
                "details": { "threshold": 100.0, "discount": 10.0 }
            })
        );
    }
}
