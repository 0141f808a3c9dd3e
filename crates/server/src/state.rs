//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::checkout::Checkout;
use crate::config::CanteenConfig;
use crate::db::{CategoryRepository, MealRepository, OrderRepository, WalletRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CanteenConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: CanteenConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &CanteenConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Meal catalog repository.
    #[must_use]
    pub fn meals(&self) -> MealRepository {
        MealRepository::new(self.inner.pool.clone())
    }

    /// Category repository.
    #[must_use]
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.inner.pool.clone())
    }

    /// Wallet ledger repository.
    #[must_use]
    pub fn wallet(&self) -> WalletRepository {
        WalletRepository::new(self.inner.pool.clone())
    }

    /// Order writer repository.
    #[must_use]
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.inner.pool.clone())
    }

    /// A checkout orchestrator wired to the production stores.
    #[must_use]
    pub fn checkout(&self) -> Checkout<MealRepository, WalletRepository, OrderRepository> {
        Checkout::new(self.meals(), self.wallet(), self.orders())
            .with_timeout(self.inner.config.checkout_timeout)
    }
}
