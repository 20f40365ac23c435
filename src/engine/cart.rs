//! Cart Model
//!
//! Normalizes an incoming list of line items into a lookup keyed by
//! product id while remembering first-seen order for output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{checked, EngineError};

/// Represents one product entry in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub quantity: u32,
}

impl CartLineItem {
    /// `price × quantity`
    pub fn line_total(&self) -> Result<Decimal, EngineError> {
        checked(self.price.checked_mul(Decimal::from(self.quantity)))
    }
}

/// A cart keyed by product id.
///
/// A later entry for the same product replaces the earlier one but keeps
/// the position where the product was first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
    index: HashMap<String, usize>,
}

impl Cart {
    /// Builds a cart from raw line items
    pub fn from_line_items(line_items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Cart::default();
        for item in line_items {
            match cart.index.get(&item.product_id) {
                Some(&pos) => cart.items[pos] = item,
                None => {
                    cart.index.insert(item.product_id.clone(), cart.items.len());
                    cart.items.push(item);
                }
            }
        }
        cart
    }

    /// Looks up the line item for a product
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.index.get(product_id).and_then(|&pos| self.items.get(pos))
    }

    /// Quantity of a product in the cart, zero when absent
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity)
    }

    /// Line items in first-seen order
    pub fn line_items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `Σ price × quantity` over every line
    pub fn total(&self) -> Result<Decimal, EngineError> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            checked(total.checked_add(item.line_total()?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: id.into(),
            price: Decimal::from(price),
            quantity,
        }
    }

    #[test]
    fn test_duplicate_entries_overwrite_but_keep_first_position() {
        let cart = Cart::from_line_items(vec![item("A", 10, 1), item("B", 5, 2), item("A", 12, 3)]);

        assert_eq!(cart.len(), 2);
        let ids: Vec<_> = cart.line_items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);

        let a = cart.get("A").unwrap();
        assert_eq!(a.price, Decimal::from(12));
        assert_eq!(a.quantity, 3);
    }

    #[test]
    fn test_total_and_quantity_lookup() {
        let cart = Cart::from_line_items(vec![item("A", 10, 3), item("B", 4, 0)]);

        assert_eq!(cart.total(), Ok(Decimal::from(30)));
        assert_eq!(cart.quantity_of("A"), 3);
        assert_eq!(cart.quantity_of("missing"), 0);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::from_line_items(Vec::new());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_total_reports_overflow() {
        let huge = CartLineItem {
            product_id: "A".into(),
            price: Decimal::MAX,
            quantity: 2,
        };
        assert_eq!(huge.line_total(), Err(EngineError::Overflow));

        let single = CartLineItem { quantity: 1, ..huge };
        assert_eq!(single.line_total(), Ok(Decimal::MAX));

        let cart = Cart::from_line_items(vec![single, item("B", 1, 1)]);
        assert_eq!(cart.total(), Err(EngineError::Overflow));
    }
}
