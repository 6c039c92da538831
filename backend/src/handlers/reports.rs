//! HTTP handlers for report and alert endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::types::DateRange;

use crate::error::AppResult;
use crate::handlers::require_manager;
use crate::middleware::CurrentUser;
use crate::models::{
    DailyConsumptionPoint, LowStockAlert, MonthlySummary, PotentialAbuseAlert, ProductDelivery,
};
use crate::services::reporting::{ABUSE_SIGNAL_THRESHOLD_PERCENT, DEFAULT_LOW_STOCK_THRESHOLD_GRAMS};
use crate::services::{ReportingService, StockService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct AbuseQuery {
    pub year: i32,
    pub month: u32,
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ConsumptionQuery {
    pub product_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub minimum_threshold: Option<Decimal>,
}

/// Monthly serving summary (manager)
pub async fn monthly_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthlySummary>> {
    require_manager(&current_user.0)?;
    let service = ReportingService::new(state.db);
    let summary = service.monthly_summary(query.year, query.month).await?;
    Ok(Json(summary))
}

/// Per-day consumption of one ingredient over a date range (manager)
pub async fn ingredient_consumption(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ConsumptionQuery>,
) -> AppResult<Json<Vec<DailyConsumptionPoint>>> {
    require_manager(&current_user.0)?;
    let service = ReportingService::new(state.db);
    let series = service
        .ingredient_consumption_series(
            query.product_id,
            DateRange::new(query.start_date, query.end_date),
        )
        .await?;
    Ok(Json(series))
}

/// Full delivery history of one product (manager)
pub async fn delivery_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductDelivery>>> {
    require_manager(&current_user.0)?;
    let service = StockService::new(state.db);
    let deliveries = service.delivery_history(product_id).await?;
    Ok(Json(deliveries))
}

/// Products below the low-stock threshold (manager)
pub async fn low_stock_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<Vec<LowStockAlert>>> {
    require_manager(&current_user.0)?;
    let threshold = query
        .minimum_threshold
        .unwrap_or_else(|| Decimal::from(DEFAULT_LOW_STOCK_THRESHOLD_GRAMS));
    let service = ReportingService::new(state.db);
    let alerts = service.low_stock_alerts(threshold).await?;
    Ok(Json(alerts))
}

/// Potential-abuse alert for a month; null when nothing fires (manager)
pub async fn potential_abuse_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<AbuseQuery>,
) -> AppResult<Json<Option<PotentialAbuseAlert>>> {
    require_manager(&current_user.0)?;
    let threshold = query.threshold.unwrap_or(ABUSE_SIGNAL_THRESHOLD_PERCENT);
    let service = ReportingService::new(state.db);
    let alert = service
        .potential_abuse_alert(query.year, query.month, threshold)
        .await?;
    Ok(Json(alert))
}
