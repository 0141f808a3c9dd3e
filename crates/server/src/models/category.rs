//! Meal category model.

use canteen_core::CategoryId;

/// A catalog category meals are grouped under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    /// Display color used by the client's category grid.
    pub color: String,
}
