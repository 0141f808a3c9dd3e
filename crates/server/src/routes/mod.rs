//! HTTP routes for the canteen API.
//!
//! Route and field names follow the contract the mobile client already
//! speaks (`/meals`, `/addMealsById`, `/saveOrder`, ...), so this server
//! is a drop-in backend for it.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod categories;
pub mod meals;
pub mod orders;
pub mod wallet;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(meals::by_category))
        .route("/addMealsById", get(meals::by_ids))
        .route("/categories", get(categories::list))
        .route("/wallet", get(wallet::balance))
        .route("/addWalletAmount", post(wallet::add_amount))
        .route("/saveOrder", post(orders::save_order))
        .route("/orders", get(orders::history))
}
