//! Domain models shared between the repositories and the checkout core.

pub mod category;
pub mod meal;
pub mod order;

pub use category::Category;
pub use meal::Meal;
pub use order::{NewOrder, OrderLine};
