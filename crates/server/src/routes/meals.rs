//! Meal catalog handlers.

use axum::Json;
use axum::extract::{Query, RawQuery, State};
use canteen_core::{Amount, CategoryId, MealId};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Meal;
use crate::state::AppState;

/// Meal display data on the wire, camel-cased for the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealView {
    pub id: MealId,
    pub category_ids: Vec<CategoryId>,
    pub title: String,
    pub price: Amount,
    pub image_url: String,
    pub stock: i32,
}

impl From<Meal> for MealView {
    fn from(meal: Meal) -> Self {
        Self {
            id: meal.id,
            category_ids: meal.category_ids,
            title: meal.title,
            price: meal.price,
            image_url: meal.image_url,
            stock: meal.stock,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MealsQuery {
    #[serde(rename = "categoryId")]
    category_id: CategoryId,
}

/// `GET /meals?categoryId=<id>` - meals listed under one category.
pub async fn by_category(
    State(state): State<AppState>,
    Query(query): Query<MealsQuery>,
) -> Result<Json<Vec<MealView>>> {
    let meals = state.meals().by_category(query.category_id).await?;
    Ok(Json(meals.into_iter().map(Into::into).collect()))
}

/// `GET /addMealsById?mealId=<id>&mealId=<id>` - re-resolve cart contents.
///
/// Accepts the id list either as repeated `mealId` parameters or as one
/// comma-separated value, matching what the client sends.
pub async fn by_ids(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<MealView>>> {
    let ids = parse_meal_ids(query.as_deref().unwrap_or_default())?;
    let meals = state.meals().by_ids(&ids).await?;
    if meals.is_empty() {
        return Err(AppError::NotFound("meal not found".to_owned()));
    }
    Ok(Json(meals.into_iter().map(Into::into).collect()))
}

/// Collect `mealId` values out of a raw query string.
fn parse_meal_ids(query: &str) -> Result<Vec<MealId>> {
    let mut ids = Vec::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != "mealId" {
            continue;
        }
        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let id: i32 = part
                .parse()
                .map_err(|_| AppError::BadRequest(format!("invalid meal id: {part}")))?;
            ids.push(MealId::new(id));
        }
    }
    if ids.is_empty() {
        return Err(AppError::BadRequest("no meal id provided".to_owned()));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_ids_repeated_params() {
        let ids = parse_meal_ids("mealId=1&mealId=2&mealId=3").expect("valid");
        assert_eq!(ids, vec![MealId::new(1), MealId::new(2), MealId::new(3)]);
    }

    #[test]
    fn test_parse_meal_ids_comma_separated() {
        let ids = parse_meal_ids("mealId=1,2,%203").expect("valid");
        assert_eq!(ids, vec![MealId::new(1), MealId::new(2), MealId::new(3)]);
    }

    #[test]
    fn test_parse_meal_ids_empty_rejected() {
        assert!(parse_meal_ids("").is_err());
        assert!(parse_meal_ids("other=1").is_err());
    }

    #[test]
    fn test_parse_meal_ids_garbage_rejected() {
        assert!(parse_meal_ids("mealId=abc").is_err());
    }
}
