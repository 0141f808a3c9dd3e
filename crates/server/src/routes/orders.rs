//! Checkout and order-history handlers.

use axum::Json;
use axum::extract::{Query, State};
use canteen_core::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::checkout::{Cart, CartLine, CheckoutError, CheckoutSession, PaymentMethod};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// One line of a `saveOrder` request.
///
/// The client also sends `category_id`, `title`, and `price` alongside;
/// those are accepted on the wire but deliberately ignored - prices and
/// titles are snapshotted from the catalog at commit time so a tampered
/// request cannot change what is charged.
#[derive(Debug, Deserialize)]
pub struct SaveOrderItem {
    pub meal_id: i32,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct SaveOrderRequest {
    pub user_id: String,
    /// Defaults to the wallet; `"upi"` selects the stubbed external path.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(rename = "cartItems")]
    pub cart_items: Vec<SaveOrderItem>,
}

#[derive(Debug, Serialize)]
pub struct SaveOrderResponse {
    pub response: &'static str,
    pub order_id: OrderId,
}

/// `POST /saveOrder` - run one checkout attempt to completion.
///
/// Reviews the cart at current prices, debits the wallet (unless paying
/// by UPI), and commits the order atomically. Failure modes map to the
/// checkout taxonomy: 400 for bad input, 402 for a short wallet, 409 for
/// depleted stock, 500 for storage trouble (always after compensation).
pub async fn save_order(
    State(state): State<AppState>,
    Json(request): Json<SaveOrderRequest>,
) -> Result<Json<SaveOrderResponse>> {
    let user_id = parse_user(&request.user_id)?;
    let cart = Cart::from_lines(request.cart_items.iter().map(|item| CartLine {
        meal_id: item.meal_id.into(),
        quantity: item.quantity,
    }))
    .map_err(CheckoutError::from)?;

    let checkout = state.checkout();
    let mut session = CheckoutSession::new(user_id, cart);
    checkout.review(&mut session).await?;
    let receipt = checkout.pay(&mut session, request.payment_method).await?;

    Ok(Json(SaveOrderResponse {
        response: "Success",
        order_id: receipt.order_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    #[serde(rename = "userId")]
    user_id: String,
}

/// `GET /orders?userId=<id>` - ids of the user's past orders, newest
/// first. These back the redeemable token screen.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<OrderId>>> {
    let user_id = parse_user(&query.user_id)?;
    let ids = state.orders().ids_for_user(&user_id).await?;
    Ok(Json(ids))
}

fn parse_user(raw: &str) -> Result<UserId> {
    UserId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
