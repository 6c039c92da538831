//! HTTP handlers for product and delivery endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use shared::types::Pagination;

use crate::error::AppResult;
use crate::handlers::require_manager;
use crate::middleware::CurrentUser;
use crate::models::{
    Product, ProductDelivery, RecordDeliveryInput, RegisterProductInput, RenameProductInput,
};
use crate::services::StockService;
use crate::AppState;

/// Query filters for the delivery list
#[derive(Debug, Deserialize)]
pub struct DeliveryFilter {
    pub product_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Register a new product type (manager)
pub async fn register_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RegisterProductInput>,
) -> AppResult<Json<Product>> {
    require_manager(&current_user.0)?;
    let service = StockService::new(state.db);
    let product = service.register_product(input).await?;
    Ok(Json(product))
}

/// List products (any authenticated role)
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<Product>>> {
    let page = pagination.clamped();
    let service = StockService::new(state.db);
    let products = service.list_products(page.skip, page.limit).await?;
    Ok(Json(products))
}

/// Get a single product (any authenticated role)
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = StockService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Rename a product (manager)
pub async fn rename_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<RenameProductInput>,
) -> AppResult<Json<Product>> {
    require_manager(&current_user.0)?;
    let service = StockService::new(state.db);
    let product = service.rename_product(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product (manager); blocked while a recipe references it
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_manager(&current_user.0)?;
    let service = StockService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(Json(()))
}

/// Record a stock delivery for a product (manager)
pub async fn record_delivery(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<RecordDeliveryInput>,
) -> AppResult<Json<ProductDelivery>> {
    require_manager(&current_user.0)?;
    let service = StockService::new(state.db);
    let delivery = service.record_delivery(product_id, input).await?;
    Ok(Json(delivery))
}

/// List deliveries across products, newest first (manager)
pub async fn list_deliveries(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<DeliveryFilter>,
) -> AppResult<Json<Vec<ProductDelivery>>> {
    require_manager(&current_user.0)?;
    let page = Pagination::from_parts(filter.skip, filter.limit).clamped();
    let service = StockService::new(state.db);
    let deliveries = service
        .list_deliveries(filter.product_id, filter.from, filter.to, page.skip, page.limit)
        .await?;
    Ok(Json(deliveries))
}

/// Full delivery history of one product (manager)
pub async fn get_product_deliveries(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductDelivery>>> {
    require_manager(&current_user.0)?;
    let service = StockService::new(state.db);
    let deliveries = service.delivery_history(product_id).await?;
    Ok(Json(deliveries))
}
