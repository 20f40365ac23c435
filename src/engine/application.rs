//! Application Engine
//!
//! Produces the discounted view of a cart for one coupon. The input cart is
//! never mutated; a coupon that [`evaluate`] rates at zero leaves every line
//! untouched. Arithmetic that leaves the decimal range fails the whole
//! application with [`EngineError::Overflow`].
//!
//! Two behaviours are kept on purpose:
//!
//! * cart-wise splits the flat discount evenly across distinct products and
//!   then divides each share by the line's quantity again, so high-quantity
//!   lines receive a smaller per-unit reduction;
//! * bxgy sums the granted quantity over all matching get entries without
//!   capping it at the line's quantity, unlike [`evaluate`], which caps each
//!   entry. `total_discount` can therefore exceed what evaluation reported.

use rust_decimal::Decimal;
use serde::Serialize;

use super::cart::{Cart, CartLineItem};
use super::eligibility::{bundle_repetitions, evaluate};
use super::error::{checked, EngineError};
use super::rules::{BxGyDetails, CartWiseDetails, CouponRule, ProductWiseDetails};

/// A cart line plus the per-unit price after discount, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountedLineItem {
    #[serde(flatten)]
    pub item: CartLineItem,

    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discounted_price: Option<Decimal>,
}

impl DiscountedLineItem {
    fn unchanged(item: &CartLineItem) -> Self {
        Self {
            item: item.clone(),
            discounted_price: None,
        }
    }

    fn discounted(item: &CartLineItem, price: Decimal) -> Self {
        Self {
            item: item.clone(),
            discounted_price: Some(price.max(Decimal::ZERO)),
        }
    }
}

/// Result of applying a coupon: every line in first-seen order plus the
/// aggregate discount
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCart {
    pub updated_line_items: Vec<DiscountedLineItem>,
    pub total_discount: Decimal,
}

impl AppliedCart {
    fn unchanged(cart: &Cart) -> Self {
        Self {
            updated_line_items: cart
                .line_items()
                .iter()
                .map(DiscountedLineItem::unchanged)
                .collect(),
            total_discount: Decimal::ZERO,
        }
    }
}

/// Applies `rule` to `cart`.
pub fn apply(rule: &CouponRule, cart: &Cart) -> Result<AppliedCart, EngineError> {
    if evaluate(rule, cart)? <= Decimal::ZERO {
        tracing::debug!(coupon_type = %rule.coupon_type(), "coupon not applicable, cart unchanged");
        return Ok(AppliedCart::unchanged(cart));
    }

    match rule {
        CouponRule::CartWise(details) => apply_cart_wise(details, cart),
        CouponRule::ProductWise(details) => apply_product_wise(details, cart),
        CouponRule::Bxgy(details) => apply_bxgy(details, cart),
    }
}

fn apply_cart_wise(details: &CartWiseDetails, cart: &Cart) -> Result<AppliedCart, EngineError> {
    if cart.is_empty() {
        tracing::warn!("cart-wise coupon on an empty cart, nothing to discount");
        return Ok(AppliedCart::unchanged(cart));
    }

    let share = checked(details.discount.checked_div(Decimal::from(cart.len())))?;
    let updated_line_items = cart
        .line_items()
        .iter()
        .map(|item| recover(item, cart_wise_line(item, share)))
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(AppliedCart {
        updated_line_items,
        total_discount: details.discount,
    })
}

/// `price − share / quantity`, floored at zero
fn cart_wise_line(item: &CartLineItem, share: Decimal) -> Result<DiscountedLineItem, EngineError> {
    let quantity = nonzero_quantity(item)?;
    let per_unit = checked(share.checked_div(quantity))?;
    let price = checked(item.price.checked_sub(per_unit))?;
    Ok(DiscountedLineItem::discounted(item, price))
}

fn apply_product_wise(
    details: &ProductWiseDetails,
    cart: &Cart,
) -> Result<AppliedCart, EngineError> {
    let mut total_discount = Decimal::ZERO;
    let mut updated_line_items = Vec::with_capacity(cart.len());

    for item in cart.line_items() {
        if item.product_id == details.product_id {
            let line_discount =
                checked(details.discount.checked_mul(Decimal::from(item.quantity)))?;
            total_discount = checked(total_discount.checked_add(line_discount))?;
            let price = checked(item.price.checked_sub(details.discount))?;
            updated_line_items.push(DiscountedLineItem::discounted(item, price));
        } else {
            updated_line_items.push(DiscountedLineItem::unchanged(item));
        }
    }

    Ok(AppliedCart {
        updated_line_items,
        total_discount,
    })
}

fn apply_bxgy(details: &BxGyDetails, cart: &Cart) -> Result<AppliedCart, EngineError> {
    let repetitions = u64::from(bundle_repetitions(details, cart));
    let mut total_discount = Decimal::ZERO;
    let mut updated_line_items = Vec::with_capacity(cart.len());

    for item in cart.line_items() {
        let mut matching = details
            .get_products
            .iter()
            .filter(|g| g.product_id == item.product_id)
            .peekable();

        if matching.peek().is_none() {
            updated_line_items.push(DiscountedLineItem::unchanged(item));
            continue;
        }

        let free_quantity = matching.try_fold(0u64, |sum, g| {
            checked(sum.checked_add(u64::from(g.quantity) * repetitions))
        })?;
        match bxgy_line(item, free_quantity) {
            Ok(line) => {
                let value = checked(Decimal::from(free_quantity).checked_mul(item.price))?;
                total_discount = checked(total_discount.checked_add(value))?;
                updated_line_items.push(line);
            }
            Err(err) => updated_line_items.push(recover(item, Err(err))?),
        }
    }

    Ok(AppliedCart {
        updated_line_items,
        total_discount,
    })
}

/// `price × (quantity − free) / quantity`, floored at zero
fn bxgy_line(item: &CartLineItem, free_quantity: u64) -> Result<DiscountedLineItem, EngineError> {
    let quantity = nonzero_quantity(item)?;
    let paid = checked(quantity.checked_sub(Decimal::from(free_quantity)))?;
    let gross = checked(item.price.checked_mul(paid))?;
    let price = checked(gross.checked_div(quantity))?;
    Ok(DiscountedLineItem::discounted(item, price))
}

fn nonzero_quantity(item: &CartLineItem) -> Result<Decimal, EngineError> {
    if item.quantity == 0 {
        return Err(EngineError::DivisionByZero {
            product_id: item.product_id.clone(),
        });
    }
    Ok(Decimal::from(item.quantity))
}

/// Zero-quantity lines pass through untouched; any other error propagates.
fn recover(
    item: &CartLineItem,
    line: Result<DiscountedLineItem, EngineError>,
) -> Result<DiscountedLineItem, EngineError> {
    match line {
        Err(err @ EngineError::DivisionByZero { .. }) => {
            tracing::warn!("{}; line passed through", err);
            Ok(DiscountedLineItem::unchanged(item))
        }
        other => other,
    }
}
