//! HTTP handlers for user management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::types::Pagination;

use crate::error::AppResult;
use crate::handlers::require_admin;
use crate::middleware::CurrentUser;
use crate::models::{CreateUserInput, UpdateUserInput, User};
use crate::services::UserService;
use crate::AppState;

/// Create a staff account (admin)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<User>> {
    require_admin(&current_user.0)?;
    let service = UserService::new(state.db);
    let user = service.create_user(input).await?;
    Ok(Json(user))
}

/// List staff accounts (admin)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<User>>> {
    require_admin(&current_user.0)?;
    let page = pagination.clamped();
    let service = UserService::new(state.db);
    let users = service.list_users(page.skip, page.limit).await?;
    Ok(Json(users))
}

/// The calling user's own account
pub async fn get_me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// Get a single staff account (admin)
pub async fn get_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    require_admin(&current_user.0)?;
    let service = UserService::new(state.db);
    let user = service.get_user(user_id).await?;
    Ok(Json(user))
}

/// Update a staff account (admin)
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<User>> {
    require_admin(&current_user.0)?;
    let service = UserService::new(state.db);
    let user = service.update_user(user_id, input).await?;
    Ok(Json(user))
}

/// Delete a staff account (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_admin(&current_user.0)?;
    let service = UserService::new(state.db);
    service.delete_user(user_id).await?;
    Ok(Json(()))
}
