//! Order writer repository.
//!
//! Commits are all-or-nothing: the line inserts and the stock decrements
//! for one order run inside a single transaction. A failure anywhere -
//! including a meal running dry mid-loop - rolls back every prior insert
//! and decrement, so readers never observe a partial order.

use canteen_core::{OrderId, UserId};
use chrono::Utc;
use sqlx::{PgPool, Row};

use super::RepositoryError;
use super::stock::{self, StockError};
use crate::checkout::{CommitError, OrderStore, StoreError};
use crate::models::NewOrder;

/// Repository for durable order records.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether an order with this id has already been issued.
    ///
    /// Backed by the primary-key index on `(order_id, meal_id)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, order_id: OrderId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM orders WHERE order_id = $1 LIMIT 1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Persist all lines of an order and decrement stock for each, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError::InsufficientStock`] when any line's meal
    /// cannot cover its quantity (the transaction is rolled back), and
    /// [`CommitError::Store`] for storage failures.
    pub async fn commit(&self, order: &NewOrder) -> Result<(), CommitError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::Database)?;
        let added_at = Utc::now();

        for line in &order.lines {
            match stock::reserve_and_decrement(&mut *tx, line.meal_id, line.quantity).await {
                Ok(()) => {}
                Err(StockError::Insufficient { meal_id }) => {
                    // Dropping the transaction rolls back prior lines.
                    return Err(CommitError::InsufficientStock { meal_id });
                }
                Err(StockError::Database(db)) => {
                    return Err(CommitError::Store(StoreError::Database(db)));
                }
            }

            sqlx::query(
                r"
                INSERT INTO orders
                    (order_id, user_id, meal_id, category_id, title, price, quantity, added_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(order.order_id)
            .bind(order.user_id.as_str())
            .bind(line.meal_id)
            .bind(line.category_id)
            .bind(&line.title)
            .bind(line.price.as_decimal())
            .bind(i32::try_from(line.quantity).unwrap_or(i32::MAX))
            .bind(added_at)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::Database)?;
        }

        tx.commit().await.map_err(StoreError::Database)?;
        Ok(())
    }

    /// Order ids previously issued to a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for a malformed stored id.
    pub async fn ids_for_user(&self, user_id: &UserId) -> Result<Vec<OrderId>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT order_id
            FROM orders
            WHERE user_id = $1
            GROUP BY order_id
            ORDER BY MIN(added_at) DESC
            ",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let raw: String = row.try_get("order_id")?;
                OrderId::parse(&raw).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid order id in database: {e}"))
                })
            })
            .collect()
    }
}

impl OrderStore for OrderRepository {
    async fn contains(&self, order_id: OrderId) -> Result<bool, StoreError> {
        self.exists(order_id).await.map_err(Into::into)
    }

    async fn commit(&self, order: &NewOrder) -> Result<(), CommitError> {
        Self::commit(self, order).await
    }

    async fn ids_for_user(&self, user_id: &UserId) -> Result<Vec<OrderId>, StoreError> {
        Self::ids_for_user(self, user_id).await.map_err(Into::into)
    }
}
