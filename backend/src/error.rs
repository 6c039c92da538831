//! Error handling for the Kitchen Stock Tracker
//!
//! Every fallible service operation returns one of these typed errors; the
//! handlers map them 1:1 to client-visible JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Inactive user")]
    InactiveUser,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid portion count: {0}")]
    InvalidPortionCount(i32),

    // Business rule errors
    #[error("{resource} with name '{name}' already exists")]
    DuplicateName { resource: String, name: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Meal '{0}' has no ingredients defined")]
    EmptyRecipe(String),

    #[error("Not enough '{product}': required {required}g, available {available}g")]
    InsufficientStock {
        product: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("Product '{0}' is used in meal recipes and cannot be deleted")]
    ReferencedByRecipe(String),

    /// Stock would have gone negative mid-deduction. Indicates a concurrency
    /// bug upstream; the transaction is rolled back and nothing is persisted.
    #[error("Corrupted state: stock of '{0}' would go negative")]
    CorruptedState(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InvalidQuantity(_) => "INVALID_QUANTITY",
            AppError::InvalidPortionCount(_) => "INVALID_PORTION_COUNT",
            AppError::DuplicateName { .. } => "DUPLICATE_NAME",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::EmptyRecipe(_) => "EMPTY_RECIPE",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::ReferencedByRecipe(_) => "REFERENCED_BY_RECIPE",
            AppError::CorruptedState(_) => "CORRUPTED_STATE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InsufficientPermissions | AppError::InactiveUser => StatusCode::FORBIDDEN,
            AppError::Validation { .. }
            | AppError::InvalidQuantity(_)
            | AppError::InvalidPortionCount(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateName { .. } | AppError::ReferencedByRecipe(_) => {
                StatusCode::CONFLICT
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmptyRecipe(_) | AppError::InsufficientStock { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::CorruptedState(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let field = match &self {
            AppError::Validation { field, .. } => Some(field.clone()),
            AppError::InsufficientStock { product, .. } => Some(product.clone()),
            _ => None,
        };

        // Database failures are logged with detail but returned opaque
        let message = match &self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            AppError::CorruptedState(_) | AppError::DatabaseError(_) | AppError::Internal(_) => {
                tracing::error!("Error: {:?}", self);
            }
            _ => tracing::debug!("Request failed: {:?}", self),
        }

        let error = ErrorDetail {
            code: self.code().to_string(),
            message,
            field,
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for services and handlers
pub type AppResult<T> = Result<T, AppError>;
