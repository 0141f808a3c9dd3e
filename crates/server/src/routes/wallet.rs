//! Wallet handlers.

use axum::Json;
use axum::extract::{Query, State};
use canteen_core::{Amount, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WalletQuery {
    #[serde(rename = "userId")]
    user_id: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Amount,
}

/// `GET /wallet?userId=<id>` - current balance.
///
/// A user with no wallet record reads as zero, not as an error.
pub async fn balance(
    State(state): State<AppState>,
    Query(query): Query<WalletQuery>,
) -> Result<Json<BalanceResponse>> {
    let user_id = parse_user(&query.user_id)?;
    let balance = state.wallet().balance(&user_id).await?;
    Ok(Json(BalanceResponse { balance }))
}

#[derive(Debug, Deserialize)]
pub struct AddWalletAmountRequest {
    #[serde(rename = "userId")]
    user_id: String,
    /// The new total balance, not a delta.
    amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AddWalletAmountResponse {
    pub amount: Amount,
}

/// `POST /addWalletAmount` - overwrite the balance with a new total.
///
/// Negative amounts are rejected with a 400 before anything is written.
pub async fn add_amount(
    State(state): State<AppState>,
    Json(request): Json<AddWalletAmountRequest>,
) -> Result<Json<AddWalletAmountResponse>> {
    let user_id = parse_user(&request.user_id)?;
    let amount = Amount::new(request.amount)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let amount = state.wallet().set_balance(&user_id, amount).await?;
    Ok(Json(AddWalletAmountResponse { amount }))
}

fn parse_user(raw: &str) -> Result<UserId> {
    UserId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
