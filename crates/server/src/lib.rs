//! Canteen Server - campus food-ordering backend.
//!
//! This crate implements the order-commit and payment core behind the
//! campus canteen app, exposed over a small HTTP contract:
//!
//! - **Catalog reads** - meals by category and by id (`/meals`,
//!   `/addMealsById`, `/categories`)
//! - **Wallet ledger** - per-user stored-value balance (`/wallet`,
//!   `/addWalletAmount`)
//! - **Checkout** - cart validation, wallet debit, atomic order commit
//!   with stock decrement (`/saveOrder`, `/orders`)
//!
//! # Architecture
//!
//! The [`checkout`] module holds the orchestrator, written against store
//! traits so the commit logic is testable without `PostgreSQL`. The [`db`]
//! module provides the production store implementations on top of sqlx.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
