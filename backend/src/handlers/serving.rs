//! HTTP handlers for serving and portion calculation endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use shared::types::Pagination;

use crate::error::AppResult;
use crate::handlers::{require_chef, require_manager};
use crate::middleware::CurrentUser;
use crate::models::{PortionCalculation, ServeMealInput, ServingRecord};
use crate::services::{PortionService, ServingService};
use crate::AppState;

/// Query filters for the serving log
#[derive(Debug, Deserialize)]
pub struct ServingFilter {
    pub user_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Serve portions of a meal, deducting ingredient stock (chef)
pub async fn serve_meal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(meal_id): Path<Uuid>,
    Json(input): Json<ServeMealInput>,
) -> AppResult<Json<ServingRecord>> {
    require_chef(&current_user.0)?;
    let service = ServingService::new(state.db);
    let record = service
        .serve(meal_id, current_user.0.user_id, input.portions_to_serve)
        .await?;
    Ok(Json(record))
}

/// List serving records, newest first (manager)
pub async fn list_servings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ServingFilter>,
) -> AppResult<Json<Vec<ServingRecord>>> {
    require_manager(&current_user.0)?;
    let page = Pagination::from_parts(filter.skip, filter.limit).clamped();
    let service = ServingService::new(state.db);
    let records = service
        .list_servings(
            filter.user_id,
            filter.meal_id,
            filter.start_date,
            filter.end_date,
            page.skip,
            page.limit,
        )
        .await?;
    Ok(Json(records))
}

/// Calculable portions for one meal (any authenticated role)
pub async fn calculate_portions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(meal_id): Path<Uuid>,
) -> AppResult<Json<PortionCalculation>> {
    let service = PortionService::new(state.db);
    let calculation = service.calculable_portions(meal_id).await?;
    Ok(Json(calculation))
}

/// Calculable portions for every meal (any authenticated role)
pub async fn calculate_portions_for_all(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<PortionCalculation>>> {
    let service = PortionService::new(state.db);
    let calculations = service.calculable_portions_for_all_meals().await?;
    Ok(Json(calculations))
}
