//! In-memory stores and fixtures for exercising the checkout
//! orchestrator without `PostgreSQL`.
//!
//! [`MemoryStore`] implements all three store traits over one shared
//! mutex-guarded state, mirroring the atomicity the production
//! repositories get from database transactions: an order commit either
//! applies every line insert and stock decrement, or none of them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use canteen_core::{Amount, CategoryId, MealId, OrderId, OrderIdGenerator, UserId};
use rust_decimal::Decimal;

use canteen_server::checkout::{
    CatalogStore, CommitError, DebitOutcome, OrderStore, StoreError, WalletStore,
};
use canteen_server::models::{Meal, NewOrder};

// =============================================================================
// Fixtures
// =============================================================================

/// An amount from a minor-unit (paise) value.
///
/// # Panics
///
/// Panics on a negative input; test fixtures only.
#[must_use]
pub fn amount(minor: i64) -> Amount {
    Amount::new(Decimal::new(minor, 2)).expect("fixture amounts are non-negative")
}

/// A catalog meal fixture.
#[must_use]
pub fn meal(id: i32, title: &str, price_minor: i64, stock: i32) -> Meal {
    Meal {
        id: MealId::new(id),
        category_ids: vec![CategoryId::new(1)],
        title: title.to_owned(),
        price: amount(price_minor),
        image_url: String::new(),
        stock,
    }
}

/// A unique user id per call, so tests never share wallets by accident.
///
/// # Panics
///
/// Never; UUIDs are always valid user ids.
#[must_use]
pub fn unique_user() -> UserId {
    UserId::parse(&uuid::Uuid::new_v4().simple().to_string()).expect("uuid is a valid user id")
}

// =============================================================================
// MemoryStore
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    meals: BTreeMap<MealId, Meal>,
    wallets: HashMap<UserId, Amount>,
    // committed orders in commit sequence, one entry per order
    orders: Vec<(OrderId, UserId)>,
    fail_commits: bool,
}

/// Shared in-memory implementation of catalog, wallet, and order stores.
///
/// Cloning shares the underlying state, so one handle can be given to the
/// orchestrator while the test keeps another for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a catalog meal.
    pub fn put_meal(&self, meal: Meal) {
        self.lock().meals.insert(meal.id, meal);
    }

    /// Overwrite a wallet balance.
    pub fn put_balance(&self, user_id: &UserId, balance: Amount) {
        self.lock().wallets.insert(user_id.clone(), balance);
    }

    /// Pre-register an order id as already issued, to force collisions.
    pub fn put_order(&self, order_id: OrderId, user_id: &UserId) {
        self.lock().orders.push((order_id, user_id.clone()));
    }

    /// Make every subsequent `commit` fail with a backend error, leaving
    /// state untouched.
    pub fn fail_commits(&self, fail: bool) {
        self.lock().fail_commits = fail;
    }

    /// Current wallet balance (zero when absent), read directly.
    #[must_use]
    pub fn balance_of(&self, user_id: &UserId) -> Amount {
        self.lock().wallets.get(user_id).copied().unwrap_or(Amount::ZERO)
    }

    /// Remaining stock for a meal, read directly.
    ///
    /// # Panics
    ///
    /// Panics when the meal was never inserted; test fixtures only.
    #[must_use]
    pub fn stock_of(&self, meal_id: MealId) -> i32 {
        self.lock()
            .meals
            .get(&meal_id)
            .map(|m| m.stock)
            .expect("meal fixture exists")
    }

    /// Number of committed orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock means a test already panicked; the state is
        // still usable for the assertions that follow.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CatalogStore for MemoryStore {
    async fn meals_by_ids(&self, ids: &[MealId]) -> Result<Vec<Meal>, StoreError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.meals.get(id).cloned())
            .collect())
    }
}

impl WalletStore for MemoryStore {
    async fn balance(&self, user_id: &UserId) -> Result<Amount, StoreError> {
        Ok(self.balance_of(user_id))
    }

    async fn credit(&self, user_id: &UserId, amount: Amount) -> Result<Amount, StoreError> {
        let mut state = self.lock();
        let balance = state
            .wallets
            .get(user_id)
            .copied()
            .unwrap_or(Amount::ZERO)
            .checked_add(amount)
            .ok_or_else(|| StoreError::Backend("balance overflow".to_owned()))?;
        state.wallets.insert(user_id.clone(), balance);
        Ok(balance)
    }

    async fn debit(&self, user_id: &UserId, amount: Amount) -> Result<DebitOutcome, StoreError> {
        let mut state = self.lock();
        let balance = state.wallets.get(user_id).copied().unwrap_or(Amount::ZERO);
        match balance.checked_sub(amount) {
            Some(new_balance) => {
                state.wallets.insert(user_id.clone(), new_balance);
                Ok(DebitOutcome::Applied { new_balance })
            }
            None => Ok(DebitOutcome::Insufficient { balance }),
        }
    }
}

impl OrderStore for MemoryStore {
    async fn contains(&self, order_id: OrderId) -> Result<bool, StoreError> {
        Ok(self.lock().orders.iter().any(|(id, _)| *id == order_id))
    }

    async fn commit(&self, order: &NewOrder) -> Result<(), CommitError> {
        let mut state = self.lock();
        if state.fail_commits {
            return Err(CommitError::Store(StoreError::Backend(
                "injected commit failure".to_owned(),
            )));
        }

        // Validate every line before touching anything, so a mid-order
        // shortage leaves no partial decrement behind.
        for line in &order.lines {
            let quantity = i32::try_from(line.quantity)
                .map_err(|_| StoreError::Backend("quantity out of range".to_owned()))?;
            let stock = state
                .meals
                .get(&line.meal_id)
                .map(|m| m.stock)
                .ok_or_else(|| StoreError::Backend(format!("unknown meal {}", line.meal_id)))?;
            if stock < quantity {
                return Err(CommitError::InsufficientStock {
                    meal_id: line.meal_id,
                });
            }
        }

        for line in &order.lines {
            if let Some(meal) = state.meals.get_mut(&line.meal_id) {
                // quantity fits in i32: checked above
                meal.stock -= i32::try_from(line.quantity).unwrap_or(0);
            }
        }
        state.orders.push((order.order_id, order.user_id.clone()));
        Ok(())
    }

    async fn ids_for_user(&self, user_id: &UserId) -> Result<Vec<OrderId>, StoreError> {
        let state = self.lock();
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|(_, owner)| owner == user_id)
            .map(|(id, _)| *id)
            .collect())
    }
}

// =============================================================================
// Generators and wrappers
// =============================================================================

/// Replays a scripted sequence of ids, then falls back to random draws.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    queue: Mutex<Vec<OrderId>>,
}

impl ScriptedGenerator {
    /// Build a generator that yields `ids` front to back.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = OrderId>) -> Self {
        let mut queue: Vec<OrderId> = ids.into_iter().collect();
        queue.reverse();
        Self {
            queue: Mutex::new(queue),
        }
    }
}

impl OrderIdGenerator for ScriptedGenerator {
    fn generate(&self) -> OrderId {
        let mut queue = match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        queue.pop().unwrap_or_else(OrderId::generate)
    }
}

/// Always yields the same id; used to exhaust the collision retry loop.
#[derive(Debug, Clone, Copy)]
pub struct FixedGenerator(pub OrderId);

impl OrderIdGenerator for FixedGenerator {
    fn generate(&self) -> OrderId {
        self.0
    }
}

/// Order store wrapper that stalls each call past the given delay.
#[derive(Debug, Clone)]
pub struct SlowOrders<O> {
    inner: O,
    delay: Duration,
}

impl<O> SlowOrders<O> {
    pub const fn new(inner: O, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<O: OrderStore> OrderStore for SlowOrders<O> {
    async fn contains(&self, order_id: OrderId) -> Result<bool, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.contains(order_id).await
    }

    async fn commit(&self, order: &NewOrder) -> Result<(), CommitError> {
        tokio::time::sleep(self.delay).await;
        self.inner.commit(order).await
    }

    async fn ids_for_user(&self, user_id: &UserId) -> Result<Vec<OrderId>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.ids_for_user(user_id).await
    }
}
