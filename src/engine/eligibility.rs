//! Eligibility Evaluator
//!
//! Computes how much a coupon would take off a cart without touching the
//! cart. A zero discount means the coupon does not apply. Amounts that
//! leave the decimal range are reported as [`EngineError::Overflow`].

use rust_decimal::Decimal;
use serde::Serialize;

use super::cart::Cart;
use super::error::{checked, EngineError};
use super::rules::{
    BxGyDetails, CartWiseDetails, Coupon, CouponRule, CouponType, ProductWiseDetails,
};

/// A coupon that yields a positive discount for a given cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicableCoupon {
    pub coupon_id: String,

    #[serde(rename = "type")]
    pub coupon_type: CouponType,

    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
}

/// Discount the rule grants on `cart`, zero when not applicable.
pub fn evaluate(rule: &CouponRule, cart: &Cart) -> Result<Decimal, EngineError> {
    match rule {
        CouponRule::CartWise(details) => cart_wise_discount(details, cart),
        CouponRule::ProductWise(details) => product_wise_discount(details, cart),
        CouponRule::Bxgy(details) => bxgy_discount(details, cart),
    }
}

/// Evaluates a stored coupon, reporting `NotApplicable` for a zero discount.
pub fn evaluate_applicability(
    coupon: &Coupon,
    cart: &Cart,
) -> Result<ApplicableCoupon, EngineError> {
    let discount = evaluate(&coupon.rule, cart)?;
    if discount <= Decimal::ZERO {
        return Err(EngineError::NotApplicable {
            coupon_id: coupon.id.clone(),
        });
    }

    Ok(ApplicableCoupon {
        coupon_id: coupon.id.clone(),
        coupon_type: coupon.rule.coupon_type(),
        discount,
    })
}

/// Every coupon with a positive discount, in the order given.
///
/// Inapplicable coupons are skipped; an overflow aborts the whole listing.
pub fn applicable_coupons<'a>(
    coupons: impl IntoIterator<Item = &'a Coupon>,
    cart: &Cart,
) -> Result<Vec<ApplicableCoupon>, EngineError> {
    let mut applicable = Vec::new();
    for coupon in coupons {
        match evaluate_applicability(coupon, cart) {
            Ok(found) => applicable.push(found),
            Err(err @ EngineError::NotApplicable { .. }) => tracing::debug!("{}", err),
            Err(err) => return Err(err),
        }
    }
    Ok(applicable)
}

// =============================================================================
// Per-type arithmetic
// =============================================================================

fn cart_wise_discount(details: &CartWiseDetails, cart: &Cart) -> Result<Decimal, EngineError> {
    if cart.total()? >= details.threshold {
        Ok(details.discount)
    } else {
        Ok(Decimal::ZERO)
    }
}

fn product_wise_discount(
    details: &ProductWiseDetails,
    cart: &Cart,
) -> Result<Decimal, EngineError> {
    match cart.get(&details.product_id) {
        Some(item) => checked(details.discount.checked_mul(Decimal::from(item.quantity))),
        None => Ok(Decimal::ZERO),
    }
}

fn bxgy_discount(details: &BxGyDetails, cart: &Cart) -> Result<Decimal, EngineError> {
    let repetitions = bundle_repetitions(details, cart);
    if repetitions == 0 {
        return Ok(Decimal::ZERO);
    }

    details
        .get_products
        .iter()
        .filter_map(|g| cart.get(&g.product_id).map(|item| (g, item)))
        .try_fold(Decimal::ZERO, |total, (g, item)| {
            let granted = u64::from(g.quantity) * u64::from(repetitions);
            let free_quantity = granted.min(u64::from(item.quantity));
            let value = checked(Decimal::from(free_quantity).checked_mul(item.price))?;
            checked(total.checked_add(value))
        })
}

/// How many complete buy bundles the cart holds, clamped by the limit.
///
/// An empty buy list yields zero repetitions.
pub(crate) fn bundle_repetitions(details: &BxGyDetails, cart: &Cart) -> u32 {
    details
        .buy_products
        .iter()
        .map(|b| {
            cart.quantity_of(&b.product_id)
                .checked_div(b.quantity)
                .unwrap_or(0)
        })
        .min()
        .unwrap_or(0)
        .min(details.repetition_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cart::CartLineItem;
    use crate::engine::rules::BundleProduct;
    use std::str::FromStr;

    fn item(id: &str, price: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: id.into(),
            price: Decimal::from_str(price).unwrap(),
            quantity,
        }
    }

    fn bundle(id: &str, quantity: u32) -> BundleProduct {
        BundleProduct {
            product_id: id.into(),
            quantity,
        }
    }

    fn cart_wise(threshold: i64, discount: i64) -> CouponRule {
        CouponRule::CartWise(CartWiseDetails {
            threshold: Decimal::from(threshold),
            discount: Decimal::from(discount),
        })
    }

    fn bxgy(buy: Vec<BundleProduct>, get: Vec<BundleProduct>, limit: u32) -> BxGyDetails {
        BxGyDetails {
            buy_products: buy,
            get_products: get,
            repetition_limit: limit,
        }
    }

    #[test]
    fn test_cart_wise_threshold_is_inclusive() {
        let cart = Cart::from_line_items(vec![item("A", "10", 2)]);

        assert_eq!(evaluate(&cart_wise(20, 5), &cart), Ok(Decimal::from(5)));
        assert_eq!(evaluate(&cart_wise(21, 5), &cart), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_cart_wise_evaluation_is_repeatable() {
        let cart = Cart::from_line_items(vec![item("A", "10", 3)]);
        let rule = cart_wise(20, 5);

        let first = evaluate(&rule, &cart);
        let second = evaluate(&rule, &cart);
        assert_eq!(first, second);
        assert_eq!(first, Ok(Decimal::from(5)));
    }

    #[test]
    fn test_product_wise_scales_by_quantity() {
        let rule = CouponRule::ProductWise(ProductWiseDetails {
            product_id: "B".into(),
            discount: Decimal::from(2),
        });
        let cart = Cart::from_line_items(vec![item("B", "10", 4)]);

        assert_eq!(evaluate(&rule, &cart), Ok(Decimal::from(8)));
    }

    #[test]
    fn test_product_wise_absent_product_is_not_applicable() {
        let coupon = Coupon {
            id: "pw".into(),
            rule: CouponRule::ProductWise(ProductWiseDetails {
                product_id: "Z".into(),
                discount: Decimal::from(2),
            }),
        };
        let cart = Cart::from_line_items(vec![item("B", "10", 4)]);

        assert_eq!(evaluate(&coupon.rule, &cart), Ok(Decimal::ZERO));
        assert_eq!(
            evaluate_applicability(&coupon, &cart),
            Err(EngineError::NotApplicable {
                coupon_id: "pw".into()
            })
        );
        assert!(applicable_coupons([&coupon], &cart).unwrap().is_empty());
    }

    #[test]
    fn test_bxgy_repetitions_use_floor_division() {
        let cart = Cart::from_line_items(vec![item("A", "5", 5)]);

        let details = bxgy(vec![bundle("A", 2)], vec![bundle("B", 1)], 10);
        assert_eq!(bundle_repetitions(&details, &cart), 2);

        let details = bxgy(vec![bundle("A", 2)], vec![bundle("B", 1)], 1);
        assert_eq!(bundle_repetitions(&details, &cart), 1);
    }

    #[test]
    fn test_bxgy_repetitions_take_the_scarcest_buy_product() {
        let cart = Cart::from_line_items(vec![item("A", "5", 6), item("C", "1", 1)]);

        let details = bxgy(vec![bundle("A", 2), bundle("C", 1)], vec![], 10);
        assert_eq!(bundle_repetitions(&details, &cart), 1);

        let details = bxgy(vec![bundle("A", 2), bundle("missing", 1)], vec![], 10);
        assert_eq!(bundle_repetitions(&details, &cart), 0);

        let details = bxgy(vec![], vec![bundle("A", 1)], 10);
        assert_eq!(bundle_repetitions(&details, &cart), 0);
    }

    #[test]
    fn test_bxgy_free_quantity_is_capped_by_cart_quantity() {
        let cart = Cart::from_line_items(vec![item("A", "5", 6), item("B", "3", 10)]);
        let rule = CouponRule::Bxgy(bxgy(vec![bundle("A", 2)], vec![bundle("B", 1)], 5));
        assert_eq!(evaluate(&rule, &cart), Ok(Decimal::from(9)));

        let cart = Cart::from_line_items(vec![item("A", "5", 6), item("B", "3", 2)]);
        assert_eq!(evaluate(&rule, &cart), Ok(Decimal::from(6)));
    }

    #[test]
    fn test_bxgy_absent_get_product_contributes_nothing() {
        let cart = Cart::from_line_items(vec![item("A", "5", 4), item("B", "3", 1)]);
        let rule = CouponRule::Bxgy(bxgy(
            vec![bundle("A", 2)],
            vec![bundle("missing", 1), bundle("B", 1)],
            5,
        ));

        assert_eq!(evaluate(&rule, &cart), Ok(Decimal::from(3)));
    }

    #[test]
    fn test_applicable_coupons_keeps_input_order() {
        let cart = Cart::from_line_items(vec![item("A", "10", 3)]);
        let coupons = [
            Coupon {
                id: "big".into(),
                rule: cart_wise(100, 50),
            },
            Coupon {
                id: "second".into(),
                rule: cart_wise(10, 3),
            },
            Coupon {
                id: "first".into(),
                rule: cart_wise(20, 5),
            },
        ];

        let applicable = applicable_coupons(&coupons, &cart).unwrap();
        let ids: Vec<_> = applicable.iter().map(|c| c.coupon_id.as_str()).collect();
        assert_eq!(ids, ["second", "first"]);
        assert_eq!(applicable[1].coupon_type, CouponType::CartWise);
        assert_eq!(applicable[1].discount, Decimal::from(5));
    }

    #[test]
    fn test_huge_amounts_report_overflow_instead_of_panicking() {
        let cart = Cart::from_line_items(vec![item("A", "79228162514264337593543950335", 100)]);

        assert_eq!(evaluate(&cart_wise(10, 5), &cart), Err(EngineError::Overflow));

        let product_wise = CouponRule::ProductWise(ProductWiseDetails {
            product_id: "A".into(),
            discount: Decimal::MAX,
        });
        assert_eq!(evaluate(&product_wise, &cart), Err(EngineError::Overflow));

        let coupons = [Coupon {
            id: "pw".into(),
            rule: product_wise,
        }];
        assert_eq!(applicable_coupons(&coupons, &cart), Err(EngineError::Overflow));
    }
}
