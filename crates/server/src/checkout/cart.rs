//! Client cart representation.
//!
//! A cart is an uncommitted mapping of meal id to quantity. Duplicate
//! lines for the same meal are merged at construction, so the keys are
//! unique by the time the orchestrator sees them.

use std::collections::BTreeMap;

use canteen_core::MealId;

/// Upper bound on the quantity of a single cart line.
///
/// Keeps quantities comfortably inside the `INTEGER` stock column and
/// rejects obviously bogus requests.
pub const MAX_LINE_QUANTITY: u32 = 1_000;

/// Errors that can occur when assembling a [`Cart`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The cart has no lines.
    #[error("cart cannot be empty")]
    Empty,
    /// A line has quantity zero.
    #[error("quantity for meal {meal_id} must be at least 1")]
    ZeroQuantity { meal_id: MealId },
    /// A line's quantity (after merging duplicates) exceeds the cap.
    #[error("quantity for meal {meal_id} exceeds the maximum of {max}")]
    QuantityTooLarge { meal_id: MealId, max: u32 },
}

/// One requested line: a meal and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub meal_id: MealId,
    pub quantity: u32,
}

/// A validated cart: unique meal ids, every quantity in `1..=MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<MealId, u32>,
}

impl Cart {
    /// Build a cart from raw lines, merging duplicate meal ids.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Empty`] for an empty input,
    /// [`CartError::ZeroQuantity`] for a zero-quantity line, and
    /// [`CartError::QuantityTooLarge`] when a merged quantity exceeds
    /// [`MAX_LINE_QUANTITY`].
    pub fn from_lines<I>(lines: I) -> Result<Self, CartError>
    where
        I: IntoIterator<Item = CartLine>,
    {
        let mut merged: BTreeMap<MealId, u32> = BTreeMap::new();
        for line in lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity {
                    meal_id: line.meal_id,
                });
            }
            let entry = merged.entry(line.meal_id).or_insert(0);
            *entry = entry.saturating_add(line.quantity);
            if *entry > MAX_LINE_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    meal_id: line.meal_id,
                    max: MAX_LINE_QUANTITY,
                });
            }
        }
        if merged.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(Self { lines: merged })
    }

    /// Number of distinct meals in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The distinct meal ids, in ascending order.
    #[must_use]
    pub fn meal_ids(&self) -> Vec<MealId> {
        self.lines.keys().copied().collect()
    }

    /// Quantity requested for a meal, if present.
    #[must_use]
    pub fn quantity(&self, meal_id: MealId) -> Option<u32> {
        self.lines.get(&meal_id).copied()
    }

    /// Iterate over `(meal_id, quantity)` pairs in ascending meal-id order.
    pub fn iter(&self) -> impl Iterator<Item = (MealId, u32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(meal: i32, quantity: u32) -> CartLine {
        CartLine {
            meal_id: MealId::new(meal),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert_eq!(Cart::from_lines([]), Err(CartError::Empty));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert_eq!(
            Cart::from_lines([line(1, 0)]),
            Err(CartError::ZeroQuantity {
                meal_id: MealId::new(1)
            })
        );
    }

    #[test]
    fn test_duplicates_merge() {
        let cart = Cart::from_lines([line(1, 2), line(1, 3), line(2, 1)]).expect("valid");
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity(MealId::new(1)), Some(5));
        assert_eq!(cart.quantity(MealId::new(2)), Some(1));
    }

    #[test]
    fn test_quantity_cap_applies_after_merge() {
        let result = Cart::from_lines([line(1, MAX_LINE_QUANTITY), line(1, 1)]);
        assert_eq!(
            result,
            Err(CartError::QuantityTooLarge {
                meal_id: MealId::new(1),
                max: MAX_LINE_QUANTITY
            })
        );
    }

    #[test]
    fn test_meal_ids_sorted() {
        let cart = Cart::from_lines([line(9, 1), line(3, 1), line(7, 1)]).expect("valid");
        assert_eq!(
            cart.meal_ids(),
            vec![MealId::new(3), MealId::new(7), MealId::new(9)]
        );
    }
}
