//! Product (raw ingredient) and delivery models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trackable raw ingredient with its current on-hand stock in grams.
///
/// `quantity_grams` only ever increases through deliveries and only ever
/// decreases through the serving engine; it never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub quantity_grams: Decimal,
    /// Date of the most recently *recorded* delivery (last write wins,
    /// not necessarily the chronologically latest date)
    pub last_delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// An immutable record of ingredient stock received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDelivery {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_received: Decimal,
    pub delivery_date: DateTime<Utc>,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Supplier tag used for the synthetic delivery created when a product is
/// registered with a non-zero initial quantity
pub const INITIAL_STOCK_SUPPLIER: &str = "Initial Stock";

/// Input for registering a new product type
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterProductInput {
    pub name: String,
    /// Starting stock; recorded as a synthetic delivery when positive
    #[serde(default)]
    pub initial_quantity_grams: Decimal,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// Input for renaming a product
#[derive(Debug, Clone, Deserialize)]
pub struct RenameProductInput {
    pub name: String,
}

/// Input for recording a stock delivery
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDeliveryInput {
    pub quantity_received: Decimal,
    pub delivery_date: Option<DateTime<Utc>>,
    pub supplier: Option<String>,
}
