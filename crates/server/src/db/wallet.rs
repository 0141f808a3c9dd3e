//! Wallet ledger repository.
//!
//! Balances are mutated only through atomic delta operations - the
//! conditional debit and the upsert credit - so concurrent writers cannot
//! overwrite each other the way a read-then-write update could. A `CHECK`
//! constraint on the table backs up the non-negative invariant.

use canteen_core::{Amount, UserId};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use super::RepositoryError;
use crate::checkout::{DebitOutcome, StoreError, WalletStore};

/// Repository for wallet balance operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    /// Create a new wallet repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current balance. A user with no wallet row has balance zero - that
    /// is a normal read, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for a negative stored balance.
    pub async fn balance(&self, user_id: &UserId) -> Result<Amount, RepositoryError> {
        let row = sqlx::query("SELECT balance FROM wallet WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => amount_from(row.try_get("balance")?),
            None => Ok(Amount::ZERO),
        }
    }

    /// Atomically add `amount` to the balance, creating the wallet row if
    /// needed. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn credit(&self, user_id: &UserId, amount: Amount) -> Result<Amount, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO wallet (user_id, balance)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET balance = wallet.balance + EXCLUDED.balance
            RETURNING balance
            ",
        )
        .bind(user_id.as_str())
        .bind(amount.as_decimal())
        .fetch_one(&self.pool)
        .await?;

        amount_from(row.try_get("balance")?)
    }

    /// Atomically subtract `amount` from the balance.
    ///
    /// The conditional `UPDATE` only matches when the balance covers the
    /// debit; zero rows affected means insufficient funds and no write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn debit(
        &self,
        user_id: &UserId,
        amount: Amount,
    ) -> Result<DebitOutcome, RepositoryError> {
        let row = sqlx::query(
            r"
            UPDATE wallet
            SET balance = balance - $2
            WHERE user_id = $1 AND balance >= $2
            RETURNING balance
            ",
        )
        .bind(user_id.as_str())
        .bind(amount.as_decimal())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(DebitOutcome::Applied {
                new_balance: amount_from(row.try_get("balance")?)?,
            }),
            None => {
                // Report the balance that was short; it may have moved
                // since, which is fine for a display value.
                let balance = self.balance(user_id).await?;
                Ok(DebitOutcome::Insufficient { balance })
            }
        }
    }

    /// Overwrite the balance with a new total (the top-up endpoint's
    /// contract). Negative amounts are unrepresentable in [`Amount`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_balance(
        &self,
        user_id: &UserId,
        amount: Amount,
    ) -> Result<Amount, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO wallet (user_id, balance)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET balance = EXCLUDED.balance
            RETURNING balance
            ",
        )
        .bind(user_id.as_str())
        .bind(amount.as_decimal())
        .fetch_one(&self.pool)
        .await?;

        amount_from(row.try_get("balance")?)
    }
}

fn amount_from(value: Decimal) -> Result<Amount, RepositoryError> {
    Amount::new(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid wallet balance in database: {e}"))
    })
}

impl WalletStore for WalletRepository {
    async fn balance(&self, user_id: &UserId) -> Result<Amount, StoreError> {
        Self::balance(self, user_id).await.map_err(Into::into)
    }

    async fn credit(&self, user_id: &UserId, amount: Amount) -> Result<Amount, StoreError> {
        Self::credit(self, user_id, amount).await.map_err(Into::into)
    }

    async fn debit(&self, user_id: &UserId, amount: Amount) -> Result<DebitOutcome, StoreError> {
        Self::debit(self, user_id, amount).await.map_err(Into::into)
    }
}
