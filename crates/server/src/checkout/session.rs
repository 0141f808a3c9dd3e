//! Per-attempt checkout session and its state machine.
//!
//! One session is created per checkout request; there is no process-wide
//! mutable cart state. The state machine is
//! `Reviewing -> AwaitingPayment -> Committing -> {Confirmed |
//! InsufficientFunds | Failed}`. Once `Committing` starts there is no
//! cancel - the attempt runs to a terminal state, with the compensating
//! wallet credit covering failures after the debit.

use canteen_core::{OrderId, UserId};
use serde::Deserialize;

use super::cart::Cart;

/// How the user chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Internal stored-value wallet.
    #[default]
    Wallet,
    /// External UPI. A stub: confirms without touching the wallet.
    Upi,
}

/// Client-visible state of one checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Cart and total presented; nothing persisted yet.
    Reviewing,
    /// Summary shown, waiting for a payment-method selection.
    AwaitingPayment,
    /// Debit/commit in flight. No cancel from here.
    Committing,
    /// Order durably committed. Terminal.
    Confirmed(OrderId),
    /// Wallet balance short of the total. Terminal for this attempt; the
    /// user may top up and start over from `Reviewing`.
    InsufficientFunds,
    /// Commit failed; any wallet debit was reversed. Terminal.
    Failed,
}

/// One checkout attempt for one user and one cart.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    user_id: UserId,
    cart: Cart,
    state: CheckoutState,
}

impl CheckoutSession {
    /// Start a new attempt in `Reviewing`.
    #[must_use]
    pub const fn new(user_id: UserId, cart: Cart) -> Self {
        Self {
            user_id,
            cart,
            state: CheckoutState::Reviewing,
        }
    }

    /// The owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The cart under checkout. Preserved on failure, cleared on confirm.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current state of the attempt.
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    pub(crate) fn await_payment(&mut self) {
        self.state = CheckoutState::AwaitingPayment;
    }

    pub(crate) fn begin_commit(&mut self) {
        self.state = CheckoutState::Committing;
    }

    /// Terminal success: record the order id. The cart is logically
    /// cleared; the id becomes the user's redemption token.
    pub(crate) fn confirm(&mut self, order_id: OrderId) {
        self.state = CheckoutState::Confirmed(order_id);
    }

    pub(crate) fn reject_funds(&mut self) {
        self.state = CheckoutState::InsufficientFunds;
    }

    pub(crate) fn fail(&mut self) {
        self.state = CheckoutState::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::cart::CartLine;
    use canteen_core::MealId;

    fn session() -> CheckoutSession {
        let cart = Cart::from_lines([CartLine {
            meal_id: MealId::new(1),
            quantity: 1,
        }])
        .expect("valid cart");
        CheckoutSession::new(UserId::parse("21z334").expect("valid"), cart)
    }

    #[test]
    fn test_new_session_is_reviewing() {
        assert_eq!(session().state(), CheckoutState::Reviewing);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut s = session();
        s.await_payment();
        assert_eq!(s.state(), CheckoutState::AwaitingPayment);
        s.begin_commit();
        assert_eq!(s.state(), CheckoutState::Committing);
        let id = OrderId::parse("0a1b2c").expect("valid");
        s.confirm(id);
        assert_eq!(s.state(), CheckoutState::Confirmed(id));
    }

    #[test]
    fn test_failure_preserves_cart() {
        let mut s = session();
        s.await_payment();
        s.begin_commit();
        s.fail();
        assert_eq!(s.state(), CheckoutState::Failed);
        assert!(!s.cart().is_empty());
    }

    #[test]
    fn test_payment_method_wire_names() {
        let wallet: PaymentMethod = serde_json::from_str("\"wallet\"").expect("valid");
        assert_eq!(wallet, PaymentMethod::Wallet);
        let upi: PaymentMethod = serde_json::from_str("\"upi\"").expect("valid");
        assert_eq!(upi, PaymentMethod::Upi);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Wallet);
    }
}
