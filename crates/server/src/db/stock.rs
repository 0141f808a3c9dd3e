//! Stock ledger: conditional decrement of meal stock.
//!
//! The decrement is a single conditional `UPDATE` judged by its
//! affected-row count, never a read-then-write, so two checkouts racing
//! for the last unit cannot both succeed. Callers run it on a plain pool
//! connection or inside an order-commit transaction via the generic
//! executor parameter.

use canteen_core::MealId;

/// Failure decrementing stock.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// Current stock is below the requested quantity. Nothing was written.
    #[error("insufficient stock for meal {meal_id}")]
    Insufficient { meal_id: MealId },
    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Atomically decrement a meal's stock by `quantity`.
///
/// # Errors
///
/// Returns [`StockError::Insufficient`] when the row was not updated
/// (stock below `quantity`, or no such meal), and [`StockError::Database`]
/// for query failures.
pub async fn reserve_and_decrement<'c, E>(
    executor: E,
    meal_id: MealId,
    quantity: u32,
) -> Result<(), StockError>
where
    E: sqlx::PgExecutor<'c>,
{
    // Quantities are capped well inside i32 range at cart validation.
    let quantity = i32::try_from(quantity).map_err(|_| StockError::Insufficient { meal_id })?;

    let result = sqlx::query(
        r"
        UPDATE meals
        SET stock = stock - $2
        WHERE id = $1 AND stock >= $2
        ",
    )
    .bind(meal_id)
    .bind(quantity)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StockError::Insufficient { meal_id });
    }

    Ok(())
}
