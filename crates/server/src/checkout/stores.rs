//! Store traits the checkout orchestrator is written against.
//!
//! Production wiring implements these on the `PostgreSQL` repositories in
//! [`crate::db`]; the integration-tests crate provides in-memory
//! implementations so the commit logic can be exercised without a
//! database.

use canteen_core::{Amount, MealId, OrderId, UserId};

use crate::models::{Meal, NewOrder};

/// A persistence failure inside a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error from the sqlx layer.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Result of an atomic wallet debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The debit was applied in full.
    Applied {
        /// Balance after the debit.
        new_balance: Amount,
    },
    /// The balance was short; nothing was written.
    Insufficient {
        /// Balance at the time of the attempt.
        balance: Amount,
    },
}

/// Failure committing an order.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// A meal ran out of stock between display and commit. The whole
    /// order was rolled back.
    #[error("insufficient stock for meal {meal_id}")]
    InsufficientStock { meal_id: MealId },
    /// Storage failure. The whole order was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read access to the meal catalog.
#[allow(async_fn_in_trait)] // orchestrator is generic; stores are concrete at call sites
pub trait CatalogStore {
    /// Resolve meals by id. Ids with no matching meal are simply absent
    /// from the result; the caller decides whether that is an error.
    async fn meals_by_ids(&self, ids: &[MealId]) -> Result<Vec<Meal>, StoreError>;
}

/// Per-user stored-value balances.
#[allow(async_fn_in_trait)]
pub trait WalletStore {
    /// Current balance. A user with no wallet record has balance zero.
    async fn balance(&self, user_id: &UserId) -> Result<Amount, StoreError>;

    /// Atomically add to the balance, creating the wallet if needed.
    /// Returns the new balance.
    async fn credit(&self, user_id: &UserId, amount: Amount) -> Result<Amount, StoreError>;

    /// Atomically subtract from the balance. Must never drive the balance
    /// negative: a short balance yields [`DebitOutcome::Insufficient`]
    /// with no write.
    async fn debit(&self, user_id: &UserId, amount: Amount) -> Result<DebitOutcome, StoreError>;
}

/// Durable order records.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Whether an order with this id has already been issued.
    async fn contains(&self, order_id: OrderId) -> Result<bool, StoreError>;

    /// Persist all lines of the order and decrement stock for each,
    /// atomically: either every line and every decrement is visible, or
    /// none is.
    async fn commit(&self, order: &NewOrder) -> Result<(), CommitError>;

    /// Order ids previously issued to this user, newest first.
    async fn ids_for_user(&self, user_id: &UserId) -> Result<Vec<OrderId>, StoreError>;
}
