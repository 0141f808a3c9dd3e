//! Meal catalog repository.
//!
//! Read-only from the checkout core's point of view: prices and stock are
//! read here, and the only write path into `meals` is the conditional
//! decrement in [`crate::db::stock`].

use canteen_core::{Amount, CategoryId, MealId};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

use super::RepositoryError;
use crate::checkout::{CatalogStore, StoreError};
use crate::models::Meal;

/// Repository for meal catalog reads.
#[derive(Debug, Clone)]
pub struct MealRepository {
    pool: PgPool,
}

impl MealRepository {
    /// Create a new meal repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All meals listed under a category, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for rows violating domain
    /// invariants (e.g. a negative price).
    pub async fn by_category(&self, category_id: CategoryId) -> Result<Vec<Meal>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT m.id, m.title, m.price, m.image_url, m.stock,
                   array_remove(array_agg(mc.category_id), NULL) AS category_ids
            FROM meals m
            LEFT JOIN meal_categories mc ON mc.meal_id = m.id
            WHERE m.id IN (SELECT meal_id FROM meal_categories WHERE category_id = $1)
            GROUP BY m.id
            ORDER BY m.id
            ",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(meal_from_row).collect()
    }

    /// Meals by id, in id order. Unknown ids are simply absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for invalid rows.
    pub async fn by_ids(&self, ids: &[MealId]) -> Result<Vec<Meal>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(MealId::as_i32).collect();
        let rows = sqlx::query(
            r"
            SELECT m.id, m.title, m.price, m.image_url, m.stock,
                   array_remove(array_agg(mc.category_id), NULL) AS category_ids
            FROM meals m
            LEFT JOIN meal_categories mc ON mc.meal_id = m.id
            WHERE m.id = ANY($1)
            GROUP BY m.id
            ORDER BY m.id
            ",
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(meal_from_row).collect()
    }
}

/// Map a joined catalog row into a [`Meal`].
fn meal_from_row(row: &PgRow) -> Result<Meal, RepositoryError> {
    let price: Decimal = row.try_get("price")?;
    let price = Amount::new(price).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid meal price in database: {e}"))
    })?;
    let category_ids: Vec<i32> = row.try_get("category_ids")?;

    Ok(Meal {
        id: MealId::new(row.try_get("id")?),
        category_ids: category_ids.into_iter().map(CategoryId::new).collect(),
        title: row.try_get("title")?,
        price,
        image_url: row.try_get("image_url")?,
        stock: row.try_get("stock")?,
    })
}

impl CatalogStore for MealRepository {
    async fn meals_by_ids(&self, ids: &[MealId]) -> Result<Vec<Meal>, StoreError> {
        self.by_ids(ids).await.map_err(Into::into)
    }
}
