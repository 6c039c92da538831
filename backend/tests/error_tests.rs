//! Error mapping tests
//!
//! Every business-rule failure must surface as a typed error with a stable
//! code and the HTTP status the API layer promises.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use rust_decimal::Decimal;

use kitchen_stock_backend::error::AppError;

fn status_of(err: AppError) -> StatusCode {
    err.into_response().status()
}

#[test]
fn test_not_found_is_404() {
    let err = AppError::NotFound("Product".to_string());
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[test]
fn test_duplicate_name_is_conflict() {
    let err = AppError::DuplicateName {
        resource: "Product".to_string(),
        name: "Rice".to_string(),
    };
    assert_eq!(err.code(), "DUPLICATE_NAME");
    assert_eq!(status_of(err), StatusCode::CONFLICT);
}

#[test]
fn test_referenced_by_recipe_is_conflict() {
    let err = AppError::ReferencedByRecipe("Rice".to_string());
    assert_eq!(err.code(), "REFERENCED_BY_RECIPE");
    assert_eq!(status_of(err), StatusCode::CONFLICT);
}

#[test]
fn test_invalid_inputs_are_bad_requests() {
    let err = AppError::InvalidQuantity("Quantity must be greater than zero".to_string());
    assert_eq!(err.code(), "INVALID_QUANTITY");
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);

    let err = AppError::InvalidPortionCount(0);
    assert_eq!(err.code(), "INVALID_PORTION_COUNT");
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
}

#[test]
fn test_serve_rejections_are_unprocessable() {
    let err = AppError::EmptyRecipe("Plov".to_string());
    assert_eq!(err.code(), "EMPTY_RECIPE");
    assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);

    let err = AppError::InsufficientStock {
        product: "Rice".to_string(),
        required: Decimal::from(1500),
        available: Decimal::from(200),
    };
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_insufficient_stock_message_names_product_and_amounts() {
    let err = AppError::InsufficientStock {
        product: "Rice".to_string(),
        required: Decimal::from(1500),
        available: Decimal::from(200),
    };
    let msg = err.to_string();
    assert!(msg.contains("Rice"));
    assert!(msg.contains("1500"));
    assert!(msg.contains("200"));
}

#[test]
fn test_corrupted_state_is_internal() {
    let err = AppError::CorruptedState("Rice".to_string());
    assert_eq!(err.code(), "CORRUPTED_STATE");
    assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_auth_failures() {
    assert_eq!(status_of(AppError::InvalidCredentials), StatusCode::UNAUTHORIZED);
    assert_eq!(status_of(AppError::TokenExpired), StatusCode::UNAUTHORIZED);
    assert_eq!(
        status_of(AppError::InsufficientPermissions),
        StatusCode::FORBIDDEN
    );
    assert_eq!(status_of(AppError::InactiveUser), StatusCode::FORBIDDEN);
}
