//! HTTP handlers for the Kitchen Stock Tracker

mod auth;
mod meals;
mod products;
mod reports;
mod serving;
mod users;

pub use auth::*;
pub use meals::*;
pub use products::*;
pub use reports::*;
pub use serving::*;
pub use users::*;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;

/// Admin only: user account management
pub fn require_admin(user: &AuthUser) -> AppResult<()> {
    if user.role.can_manage_users() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}

/// Manager or admin: products, recipes, deliveries, reports, alerts
pub fn require_manager(user: &AuthUser) -> AppResult<()> {
    if user.role.can_manage_kitchen() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}

/// Chef or admin: serving meals
pub fn require_chef(user: &AuthUser) -> AppResult<()> {
    if user.role.can_serve() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
