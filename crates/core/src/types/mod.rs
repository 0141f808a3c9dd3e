//! Core types for Canteen.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod order_id;
pub mod user;

pub use id::*;
pub use money::{Amount, AmountError};
pub use order_id::{OrderId, OrderIdError, OrderIdGenerator, RandomOrderIdGenerator};
pub use user::{UserId, UserIdError};
