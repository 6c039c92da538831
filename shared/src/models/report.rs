//! Report and alert models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Low-stock warning for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub product_id: Uuid,
    pub product_name: String,
    pub current_quantity_grams: Decimal,
    pub message: String,
}

/// Monthly serving summary with the served-vs-preparable comparison.
///
/// `potential_portions_at_month_end` is evaluated against *live* stock at
/// report time, not a historical month-end snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub total_prepared_portions: i64,
    pub potential_portions_at_month_end: i64,
    pub difference_percentage: f64,
    pub abuse_signal: bool,
}

/// Raised when the unused-capacity percentage exceeds both the built-in
/// signal threshold and the caller-supplied one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotentialAbuseAlert {
    pub month: String,
    pub prepared_portions: i64,
    pub potential_portions_at_month_end: i64,
    pub difference_percentage: f64,
    pub message: String,
}

/// Grams of one product consumed by servings on a single calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyConsumptionPoint {
    pub date: chrono::NaiveDate,
    pub consumed_grams: Decimal,
}
