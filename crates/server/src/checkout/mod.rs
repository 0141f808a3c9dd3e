//! Checkout orchestrator.
//!
//! Coordinates one checkout attempt end to end: cart validation, price
//! snapshotting, wallet debit, unique order-id selection, and the atomic
//! order commit with stock decrement. Within one attempt the ordering is
//! fixed: wallet debit happens-before order commit happens-before
//! stock-decrement visibility.
//!
//! The orders/stock pair is committed in a single database transaction;
//! the wallet is debited beforehand in a separate write, so a failed
//! commit is repaired by a compensating wallet credit rather than a
//! cross-store transaction. The conditional stock decrement is the only
//! concurrency-control point between rival checkouts - no lock is held
//! across an attempt.
//!
//! Every persistence call is bounded by a configurable timeout; a timeout
//! after the debit compensates exactly like any other commit failure.

pub mod cart;
pub mod session;
pub mod stores;

use std::collections::HashMap;
use std::time::Duration;

use canteen_core::{Amount, MealId, OrderId, OrderIdGenerator, RandomOrderIdGenerator, UserId};

use crate::models::{NewOrder, OrderLine};

pub use cart::{Cart, CartError, CartLine, MAX_LINE_QUANTITY};
pub use session::{CheckoutSession, CheckoutState, PaymentMethod};
pub use stores::{CatalogStore, CommitError, DebitOutcome, OrderStore, StoreError, WalletStore};

/// How many candidate order ids to try before giving up.
///
/// Collisions in the 24-bit id space are rare enough that hitting this cap
/// means the store is effectively full or broken.
pub const MAX_ORDER_ID_ATTEMPTS: usize = 10;

/// Default bound on each persistence call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by a checkout attempt.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Malformed input: empty cart, unknown meal, bad user id, misused
    /// session. Nothing was written.
    #[error("invalid checkout request: {0}")]
    Validation(String),

    /// Wallet balance short of the order total. Nothing was written; the
    /// user should top up and retry.
    #[error("insufficient funds: balance {balance}, total {total}")]
    InsufficientFunds { balance: Amount, total: Amount },

    /// A meal ran out between display and commit. Retryable after the
    /// client re-fetches the catalog. Any wallet debit was reversed.
    #[error("insufficient stock for meal {meal_id}")]
    InsufficientStock { meal_id: MealId },

    /// Storage unavailable or the id space exhausted its retries. Any
    /// wallet debit was reversed.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// A persistence call exceeded the configured bound. Treated like a
    /// persistence failure, including compensation.
    #[error("persistence call timed out")]
    Timeout,
}

impl From<StoreError> for CheckoutError {
    fn from(err: StoreError) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<CartError> for CheckoutError {
    fn from(err: CartError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// The priced view of a cart presented while reviewing.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    /// Lines priced at current catalog prices.
    pub lines: Vec<OrderLine>,
    /// Sum of line totals.
    pub total: Amount,
    /// Wallet balance fetched for display.
    pub balance: Amount,
}

/// The result of a confirmed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// The committed order's identifier; doubles as the redemption token.
    pub order_id: OrderId,
    /// Amount charged.
    pub total: Amount,
    /// Wallet balance after the debit; `None` for the UPI stub.
    pub balance: Option<Amount>,
}

/// Checkout orchestrator over pluggable stores.
#[derive(Debug, Clone)]
pub struct Checkout<C, W, O, G = RandomOrderIdGenerator> {
    catalog: C,
    wallet: W,
    orders: O,
    ids: G,
    timeout: Duration,
}

impl<C, W, O> Checkout<C, W, O> {
    /// Build an orchestrator with the default random id generator and
    /// timeout.
    pub const fn new(catalog: C, wallet: W, orders: O) -> Self {
        Self {
            catalog,
            wallet,
            orders,
            ids: RandomOrderIdGenerator,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl<C, W, O, G> Checkout<C, W, O, G> {
    /// Replace the order-id generator (tests script collisions this way).
    pub fn with_generator<G2: OrderIdGenerator>(self, ids: G2) -> Checkout<C, W, O, G2> {
        Checkout {
            catalog: self.catalog,
            wallet: self.wallet,
            orders: self.orders,
            ids,
            timeout: self.timeout,
        }
    }

    /// Set the per-call persistence timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<C, W, O, G> Checkout<C, W, O, G>
where
    C: CatalogStore,
    W: WalletStore,
    O: OrderStore,
    G: OrderIdGenerator,
{
    /// Price the cart at current catalog prices and fetch the wallet
    /// balance for display. Moves the session to `AwaitingPayment`.
    ///
    /// # Errors
    ///
    /// `Validation` for unknown meals or a misused session,
    /// `InsufficientStock` when a line already exceeds current stock,
    /// `Persistence`/`Timeout` for storage trouble. No state is mutated
    /// in the stores.
    pub async fn review(&self, session: &mut CheckoutSession) -> Result<OrderSummary, CheckoutError> {
        match session.state() {
            CheckoutState::Reviewing | CheckoutState::AwaitingPayment => {}
            other => {
                return Err(CheckoutError::Validation(format!(
                    "cannot review a checkout in state {other:?}"
                )));
            }
        }

        let (lines, total) = self.price_cart(session.cart()).await?;
        let balance = self.bounded(self.wallet.balance(session.user_id())).await??;
        session.await_payment();

        Ok(OrderSummary {
            lines,
            total,
            balance,
        })
    }

    /// Execute payment and order commit for a reviewed session.
    ///
    /// Prices are re-snapshotted from the catalog at commit time, so the
    /// amount charged always reflects current prices, not what the client
    /// saw or sent.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`]. On `InsufficientFunds` nothing was written;
    /// on any post-debit failure the wallet debit has been reversed.
    pub async fn pay(
        &self,
        session: &mut CheckoutSession,
        method: PaymentMethod,
    ) -> Result<Receipt, CheckoutError> {
        if session.state() != CheckoutState::AwaitingPayment {
            return Err(CheckoutError::Validation(format!(
                "cannot pay for a checkout in state {:?}",
                session.state()
            )));
        }
        session.begin_commit();

        let result = self.run_commit(session.user_id().clone(), session.cart().clone(), method).await;
        match &result {
            Ok(receipt) => session.confirm(receipt.order_id),
            Err(CheckoutError::InsufficientFunds { .. }) => session.reject_funds(),
            Err(_) => session.fail(),
        }
        result
    }

    async fn run_commit(
        &self,
        user_id: UserId,
        cart: Cart,
        method: PaymentMethod,
    ) -> Result<Receipt, CheckoutError> {
        let (lines, total) = self.price_cart(&cart).await?;

        let debited = match method {
            PaymentMethod::Wallet => {
                match self.bounded(self.wallet.debit(&user_id, total)).await?? {
                    DebitOutcome::Applied { new_balance } => Some(new_balance),
                    DebitOutcome::Insufficient { balance } => {
                        return Err(CheckoutError::InsufficientFunds { balance, total });
                    }
                }
            }
            // UPI is an external confirmation stub: no wallet movement.
            PaymentMethod::Upi => None,
        };

        match self.commit_order(&user_id, lines).await {
            Ok(order_id) => {
                tracing::info!(
                    user_id = %user_id,
                    order_id = %order_id,
                    total = %total,
                    method = ?method,
                    "checkout confirmed"
                );
                Ok(Receipt {
                    order_id,
                    total,
                    balance: debited,
                })
            }
            Err(err) => {
                if debited.is_some() {
                    self.compensate(&user_id, total).await;
                }
                Err(err)
            }
        }
    }

    /// Pick an id, verify uniqueness against the store, and commit the
    /// order in one transaction.
    async fn commit_order(
        &self,
        user_id: &UserId,
        lines: Vec<OrderLine>,
    ) -> Result<OrderId, CheckoutError> {
        let order_id = self.unique_order_id().await?;
        let order = NewOrder {
            order_id,
            user_id: user_id.clone(),
            lines,
        };
        match self.bounded(self.orders.commit(&order)).await? {
            Ok(()) => Ok(order_id),
            Err(CommitError::InsufficientStock { meal_id }) => {
                Err(CheckoutError::InsufficientStock { meal_id })
            }
            Err(CommitError::Store(err)) => Err(err.into()),
        }
    }

    async fn unique_order_id(&self) -> Result<OrderId, CheckoutError> {
        for _ in 0..MAX_ORDER_ID_ATTEMPTS {
            let candidate = self.ids.generate();
            if !self.bounded(self.orders.contains(candidate)).await?? {
                return Ok(candidate);
            }
            tracing::debug!(order_id = %candidate, "order id collision, regenerating");
        }
        Err(CheckoutError::Persistence(format!(
            "no unique order id after {MAX_ORDER_ID_ATTEMPTS} attempts"
        )))
    }

    /// Reverse a wallet debit after a failed commit. The original failure
    /// is what the caller surfaces; a failed reversal is only logged.
    async fn compensate(&self, user_id: &UserId, total: Amount) {
        match self.bounded(self.wallet.credit(user_id, total)).await {
            Ok(Ok(balance)) => {
                tracing::warn!(
                    user_id = %user_id,
                    amount = %total,
                    balance = %balance,
                    "wallet debit reversed after failed order commit"
                );
            }
            Ok(Err(err)) => {
                tracing::error!(
                    user_id = %user_id,
                    amount = %total,
                    error = %err,
                    "failed to reverse wallet debit"
                );
            }
            Err(_) => {
                tracing::error!(
                    user_id = %user_id,
                    amount = %total,
                    "timed out reversing wallet debit"
                );
            }
        }
    }

    /// Resolve every cart line against the catalog and compute the total.
    ///
    /// Stock is pre-checked here for a friendly early error; the
    /// authoritative check is the conditional decrement inside the commit
    /// transaction.
    async fn price_cart(&self, cart: &Cart) -> Result<(Vec<OrderLine>, Amount), CheckoutError> {
        let ids = cart.meal_ids();
        let meals = self.bounded(self.catalog.meals_by_ids(&ids)).await??;
        let by_id: HashMap<MealId, _> = meals.into_iter().map(|m| (m.id, m)).collect();

        let mut lines = Vec::with_capacity(cart.len());
        let mut total = Amount::ZERO;
        for (meal_id, quantity) in cart.iter() {
            let meal = by_id.get(&meal_id).ok_or_else(|| {
                CheckoutError::Validation(format!("unknown meal {meal_id}"))
            })?;
            if i64::from(meal.stock) < i64::from(quantity) {
                return Err(CheckoutError::InsufficientStock { meal_id });
            }
            let line = OrderLine {
                meal_id,
                category_id: meal.primary_category(),
                title: meal.title.clone(),
                price: meal.price,
                quantity,
            };
            let line_total = line
                .line_total()
                .ok_or_else(|| CheckoutError::Validation("order total overflow".to_owned()))?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| CheckoutError::Validation("order total overflow".to_owned()))?;
            lines.push(line);
        }
        Ok((lines, total))
    }

    async fn bounded<T>(&self, fut: impl Future<Output = T>) -> Result<T, CheckoutError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| CheckoutError::Timeout)
    }
}
