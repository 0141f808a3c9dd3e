//! Database operations for the canteen `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `categories` - catalog categories
//! - `meals` - catalog meals with unit price and remaining stock
//! - `meal_categories` - meal/category membership
//! - `orders` - committed order lines, keyed by `(order_id, meal_id)`
//! - `wallet` - per-user stored-value balance
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p canteen-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod categories;
pub mod meals;
pub mod orders;
pub mod stock;
pub mod wallet;

pub use categories::CategoryRepository;
pub use meals::MealRepository;
pub use orders::OrderRepository;
pub use wallet::WalletRepository;

/// Embedded migrations for the canteen database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// A row held data that violates a domain invariant.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<RepositoryError> for crate::checkout::StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(db) => Self::Database(db),
            RepositoryError::DataCorruption(msg) => Self::Backend(msg),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
