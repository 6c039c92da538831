//! Serving log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only record of a meal being served.
///
/// Immutable once created; deleting a meal keeps its serving history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingRecord {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub served_by_user_id: Uuid,
    pub portions_served: i32,
    pub serving_time: DateTime<Utc>,
}

/// Request body for serving a meal
#[derive(Debug, Clone, Deserialize)]
pub struct ServeMealInput {
    pub portions_to_serve: i32,
}

/// How many whole portions of a meal are currently preparable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortionCalculation {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub calculable_portions: i64,
}
