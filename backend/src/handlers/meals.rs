//! HTTP handlers for meal (recipe) endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::types::Pagination;

use crate::error::AppResult;
use crate::handlers::require_manager;
use crate::middleware::CurrentUser;
use crate::models::{CreateMealInput, Meal, UpdateMealInput};
use crate::services::CatalogService;
use crate::AppState;

/// Create a meal with its ingredient list (manager)
pub async fn create_meal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateMealInput>,
) -> AppResult<Json<Meal>> {
    require_manager(&current_user.0)?;
    let service = CatalogService::new(state.db);
    let meal = service.create_meal(input).await?;
    Ok(Json(meal))
}

/// List meals (any authenticated role)
pub async fn list_meals(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<Meal>>> {
    let page = pagination.clamped();
    let service = CatalogService::new(state.db);
    let meals = service.list_meals(page.skip, page.limit).await?;
    Ok(Json(meals))
}

/// Get a single meal with ingredients (any authenticated role)
pub async fn get_meal(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(meal_id): Path<Uuid>,
) -> AppResult<Json<Meal>> {
    let service = CatalogService::new(state.db);
    let meal = service.get_meal(meal_id).await?;
    Ok(Json(meal))
}

/// Update a meal's name and/or replace its ingredient list (manager)
pub async fn update_meal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(meal_id): Path<Uuid>,
    Json(input): Json<UpdateMealInput>,
) -> AppResult<Json<Meal>> {
    require_manager(&current_user.0)?;
    let service = CatalogService::new(state.db);
    let meal = service.update_meal(meal_id, input).await?;
    Ok(Json(meal))
}

/// Delete a meal; serving history is preserved (manager)
pub async fn delete_meal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(meal_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_manager(&current_user.0)?;
    let service = CatalogService::new(state.db);
    service.delete_meal(meal_id).await?;
    Ok(Json(()))
}
