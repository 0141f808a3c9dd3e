//! Order models.
//!
//! A [`NewOrder`] is the unit the order writer persists: a unique order id,
//! the owning user, and the line items snapshotted at then-current catalog
//! prices. Once committed an order is immutable.

use canteen_core::{Amount, CategoryId, MealId, OrderId, UserId};

/// One line of an order, priced at commit time.
///
/// Prices are always taken from the catalog when the order is committed,
/// never from the client, so a tampered request cannot change what is
/// charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub meal_id: MealId,
    pub category_id: CategoryId,
    pub title: String,
    /// Unit price snapshot.
    pub price: Amount,
    pub quantity: u32,
}

impl OrderLine {
    /// Line total (unit price x quantity). `None` on decimal overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Amount> {
        self.price.checked_mul(self.quantity)
    }
}

/// A fully-priced order ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    /// One or more priced lines.
    pub lines: Vec<OrderLine>,
}

impl NewOrder {
    /// Total order value. `None` on decimal overflow.
    #[must_use]
    pub fn total(&self) -> Option<Amount> {
        self.lines
            .iter()
            .try_fold(Amount::ZERO, |acc, line| acc.checked_add(line.line_total()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn amount(cents: i64) -> Amount {
        Amount::new(Decimal::new(cents, 2)).expect("non-negative")
    }

    fn line(price_cents: i64, quantity: u32) -> OrderLine {
        OrderLine {
            meal_id: MealId::new(1),
            category_id: CategoryId::new(1),
            title: "Idli".to_owned(),
            price: amount(price_cents),
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(5000, 2).line_total(), Some(amount(10_000)));
    }

    #[test]
    fn test_order_total_sums_lines() {
        let order = NewOrder {
            order_id: OrderId::parse("0a1b2c").expect("valid"),
            user_id: UserId::parse("21z334").expect("valid"),
            lines: vec![line(5000, 2), line(1500, 1)],
        };
        assert_eq!(order.total(), Some(amount(11_500)));
    }
}
