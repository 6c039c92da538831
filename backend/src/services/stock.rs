//! Stock ledger service: product types and delivery history
//!
//! The source of truth for on-hand ingredient quantities. Stock only
//! increases here (deliveries); the serving engine is the only other writer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{
    Product, ProductDelivery, RecordDeliveryInput, RegisterProductInput, RenameProductInput,
    INITIAL_STOCK_SUPPLIER,
};
use shared::validation::{validate_name, validate_non_negative_grams, validate_positive_grams};

use crate::error::{AppError, AppResult};

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Database row for a product
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    quantity_grams: Decimal,
    last_delivery_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            quantity_grams: row.quantity_grams,
            last_delivery_date: row.last_delivery_date,
            created_at: row.created_at,
        }
    }
}

/// Database row for a delivery
#[derive(Debug, FromRow)]
struct DeliveryRow {
    id: Uuid,
    product_id: Uuid,
    quantity_received: Decimal,
    delivery_date: DateTime<Utc>,
    supplier: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DeliveryRow> for ProductDelivery {
    fn from(row: DeliveryRow) -> Self {
        ProductDelivery {
            id: row.id,
            product_id: row.product_id,
            quantity_received: row.quantity_received,
            delivery_date: row.delivery_date,
            supplier: row.supplier,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, quantity_grams, last_delivery_date, created_at";
const DELIVERY_COLUMNS: &str =
    "id, product_id, quantity_received, delivery_date, supplier, created_at";

/// Fold one delivery into a product's ledger state.
///
/// Quantities accumulate; the recorded delivery date overwrites the previous
/// one even when it is chronologically earlier (last recorded delivery wins,
/// not the latest date).
pub fn fold_delivery(
    current_quantity: Decimal,
    quantity_received: Decimal,
    delivery_date: DateTime<Utc>,
) -> (Decimal, DateTime<Utc>) {
    (current_quantity + quantity_received, delivery_date)
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new product type.
    ///
    /// A positive initial quantity is recorded as a synthetic delivery from
    /// `"Initial Stock"` so that every stock increase goes through the same
    /// code path. Product insert and delivery are one transaction.
    pub async fn register_product(&self, input: RegisterProductInput) -> AppResult<Product> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_non_negative_grams(input.initial_quantity_grams)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let name = input.name.trim().to_string();

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)",
        )
        .bind(&name)
        .fetch_one(&mut *tx)
        .await?;

        if exists {
            return Err(AppError::DuplicateName {
                resource: "Product".to_string(),
                name,
            });
        }

        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, quantity_grams) VALUES ($1, 0) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&name)
        .fetch_one(&mut *tx)
        .await?;

        let product = if input.initial_quantity_grams > Decimal::ZERO {
            let delivery_date = input.delivery_date.unwrap_or_else(Utc::now);
            Self::apply_delivery(
                &mut tx,
                product.id,
                input.initial_quantity_grams,
                delivery_date,
                Some(INITIAL_STOCK_SUPPLIER.to_string()),
            )
            .await?;

            sqlx::query_as::<_, ProductRow>(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
            ))
            .bind(product.id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            product
        };

        tx.commit().await?;

        tracing::info!(product = %product.name, "Registered product type");
        Ok(product.into())
    }

    /// Record a stock delivery for an existing product.
    ///
    /// Adds to `quantity_grams` and overwrites `last_delivery_date` with the
    /// delivery's date, even when that date is earlier than the current one
    /// (last recorded delivery wins, not the latest date).
    pub async fn record_delivery(
        &self,
        product_id: Uuid,
        input: RecordDeliveryInput,
    ) -> AppResult<ProductDelivery> {
        validate_positive_grams(input.quantity_received)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let delivery_date = input.delivery_date.unwrap_or_else(Utc::now);
        let delivery = Self::apply_delivery(
            &mut tx,
            product_id,
            input.quantity_received,
            delivery_date,
            input.supplier,
        )
        .await?;

        tx.commit().await?;

        Ok(delivery.into())
    }

    /// Insert a delivery row and fold it into the product's running stock.
    /// All stock increases funnel through here.
    async fn apply_delivery(
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        quantity_received: Decimal,
        delivery_date: DateTime<Utc>,
        supplier: Option<String>,
    ) -> AppResult<DeliveryRow> {
        let delivery = sqlx::query_as::<_, DeliveryRow>(&format!(
            r#"
            INSERT INTO product_deliveries (product_id, quantity_received, delivery_date, supplier)
            VALUES ($1, $2, $3, $4)
            RETURNING {DELIVERY_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(quantity_received)
        .bind(delivery_date)
        .bind(&supplier)
        .fetch_one(&mut **tx)
        .await?;

        // Lock the row, fold the delivery in, write the result back
        let current = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity_grams FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_one(&mut **tx)
        .await?;

        let (new_quantity, new_last_delivery) =
            fold_delivery(current, quantity_received, delivery_date);

        sqlx::query(
            "UPDATE products SET quantity_grams = $1, last_delivery_date = $2 WHERE id = $3",
        )
        .bind(new_quantity)
        .bind(new_last_delivery)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

        Ok(delivery)
    }

    /// Rename a product
    pub async fn rename_product(
        &self,
        product_id: Uuid,
        input: RenameProductInput,
    ) -> AppResult<Product> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let name = input.name.trim().to_string();

        let collision = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1 AND id <> $2)",
        )
        .bind(&name)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if collision {
            return Err(AppError::DuplicateName {
                resource: "Product".to_string(),
                name,
            });
        }

        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET name = $1 WHERE id = $2 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&name)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product.into())
    }

    /// Delete a product and its delivery history.
    ///
    /// Blocked while any meal recipe still references the product; serving
    /// history is untouched either way.
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let name = sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM meal_ingredients WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        if referenced {
            return Err(AppError::ReferencedByRecipe(name));
        }

        // Deliveries go with the product (ON DELETE CASCADE)
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(product = %name, "Deleted product type");
        Ok(())
    }

    /// Get a single product
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product.into())
    }

    /// List products ordered by name
    pub async fn list_products(&self, skip: i64, limit: i64) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    /// List deliveries, newest delivery date first, optionally filtered by
    /// product and date range
    pub async fn list_deliveries(
        &self,
        product_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<ProductDelivery>> {
        let deliveries = sqlx::query_as::<_, DeliveryRow>(&format!(
            r#"
            SELECT {DELIVERY_COLUMNS}
            FROM product_deliveries
            WHERE ($1::uuid IS NULL OR product_id = $1)
              AND ($2::timestamptz IS NULL OR delivery_date >= $2)
              AND ($3::timestamptz IS NULL OR delivery_date <= $3)
            ORDER BY delivery_date DESC, created_at DESC
            OFFSET $4 LIMIT $5
            "#
        ))
        .bind(product_id)
        .bind(from)
        .bind(to)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(deliveries.into_iter().map(Into::into).collect())
    }

    /// Full delivery history of one product, newest first
    pub async fn delivery_history(&self, product_id: Uuid) -> AppResult<Vec<ProductDelivery>> {
        // Existence check first so an unknown id is a 404, not an empty list
        self.get_product(product_id).await?;
        self.list_deliveries(Some(product_id), None, None, 0, 1000)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deliveries_accumulate() {
        let first_date = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let second_date = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();

        let (after_first, last) = fold_delivery(Decimal::ZERO, Decimal::from(500), first_date);
        assert_eq!(after_first, Decimal::from(500));
        assert_eq!(last, first_date);

        let (after_second, last) = fold_delivery(after_first, Decimal::from(300), second_date);
        assert_eq!(after_second, Decimal::from(800));
        assert_eq!(last, second_date);
    }

    #[test]
    fn last_recorded_delivery_wins_over_a_later_date() {
        let newer = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let backdated = Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap();

        let (quantity, last) = fold_delivery(Decimal::from(800), Decimal::from(200), newer);
        let (quantity, last_after_backdate) = fold_delivery(quantity, Decimal::from(100), backdated);

        assert_eq!(quantity, Decimal::from(1100));
        assert!(last_after_backdate < last);
        assert_eq!(last_after_backdate, backdated);
    }

    #[test]
    fn fractional_grams_accumulate_exactly() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let (quantity, _) = fold_delivery(Decimal::new(1, 1), Decimal::new(2, 1), date); // 0.1 + 0.2
        assert_eq!(quantity, Decimal::new(3, 1));
    }
}
