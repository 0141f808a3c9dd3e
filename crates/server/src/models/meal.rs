//! Meal catalog model.

use canteen_core::{Amount, CategoryId, MealId};

/// A meal in the catalog.
///
/// Meals are owned by the catalog; the checkout core only reads price and
/// stock, and the stock ledger is the sole writer of `stock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    pub id: MealId,
    /// Categories this meal is listed under. Non-empty for catalog data.
    pub category_ids: Vec<CategoryId>,
    pub title: String,
    /// Unit price. Non-negative by construction.
    pub price: Amount,
    pub image_url: String,
    /// Remaining purchasable quantity. Never below zero.
    pub stock: i32,
}

impl Meal {
    /// The primary category used for order-line snapshots.
    ///
    /// Catalog data guarantees at least one category; a meal that somehow
    /// has none falls back to category 0 rather than failing the checkout.
    #[must_use]
    pub fn primary_category(&self) -> CategoryId {
        self.category_ids
            .first()
            .copied()
            .unwrap_or(CategoryId::new(0))
    }
}
