//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::{LoginInput, Token};
use crate::services::AuthService;
use crate::AppState;

/// Log in with username and password, returning a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<Token>> {
    let service = AuthService::new(state.db, &state.config);
    let token = service.login(input).await?;
    Ok(Json(token))
}
