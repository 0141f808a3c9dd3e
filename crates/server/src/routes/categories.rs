//! Category listing handler.

use axum::Json;
use axum::extract::State;
use canteen_core::CategoryId;
use serde::Serialize;

use crate::error::Result;
use crate::models::Category;
use crate::state::AppState;

/// Category display data on the wire.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub title: String,
    pub color: String,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
            color: category.color,
        }
    }
}

/// `GET /categories` - list all catalog categories.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryView>>> {
    let categories = state.categories().list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}
