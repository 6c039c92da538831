//! Serving engine: the one multi-step, must-be-atomic state transition
//!
//! `serve` validates sufficiency across every ingredient of a meal, deducts
//! stock, and appends a serving record, all inside a single transaction.
//! Referenced product rows are locked `FOR UPDATE` in id order so that
//! concurrent serves against overlapping ingredients serialize instead of
//! jointly overdrawing a product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::ServingRecord;

use crate::error::{AppError, AppResult};

/// Serving engine service
#[derive(Clone)]
pub struct ServingService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ServingRow {
    id: Uuid,
    meal_id: Uuid,
    served_by_user_id: Uuid,
    portions_served: i32,
    serving_time: DateTime<Utc>,
}

impl From<ServingRow> for ServingRecord {
    fn from(row: ServingRow) -> Self {
        ServingRecord {
            id: row.id,
            meal_id: row.meal_id,
            served_by_user_id: row.served_by_user_id,
            portions_served: row.portions_served,
            serving_time: row.serving_time,
        }
    }
}

#[derive(Debug, FromRow)]
struct RequirementRow {
    product_id: Uuid,
    required_grams: Decimal,
}

#[derive(Debug, FromRow)]
struct LockedProductRow {
    id: Uuid,
    name: String,
    quantity_grams: Decimal,
}

/// One ingredient's total demand for a serve request, against its live stock
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientDemand {
    pub product_id: Uuid,
    pub product_name: String,
    pub needed_grams: Decimal,
    pub available_grams: Decimal,
}

/// Total grams of an ingredient needed for `portions` portions
pub fn needed_for_portions(required_grams: Decimal, portions: i32) -> Decimal {
    required_grams * Decimal::from(portions)
}

/// First ingredient whose stock cannot cover its demand, if any.
///
/// The serve request is rejected in its entirety on the first shortfall;
/// nothing is deducted.
pub fn first_shortfall(demands: &[IngredientDemand]) -> Option<&IngredientDemand> {
    demands.iter().find(|d| d.available_grams < d.needed_grams)
}

impl ServingService {
    /// Create a new ServingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Serve `portions_to_serve` portions of a meal.
    ///
    /// All-or-nothing: sufficiency check, multi-row deduction and the
    /// serving-log insert commit together or not at all.
    pub async fn serve(
        &self,
        meal_id: Uuid,
        user_id: Uuid,
        portions_to_serve: i32,
    ) -> AppResult<ServingRecord> {
        if portions_to_serve <= 0 {
            return Err(AppError::InvalidPortionCount(portions_to_serve));
        }

        let mut tx = self.db.begin().await?;

        let meal_name = sqlx::query_scalar::<_, String>("SELECT name FROM meals WHERE id = $1")
            .bind(meal_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Meal".to_string()))?;

        let requirements = sqlx::query_as::<_, RequirementRow>(
            "SELECT product_id, required_grams FROM meal_ingredients WHERE meal_id = $1 ORDER BY product_id",
        )
        .bind(meal_id)
        .fetch_all(&mut *tx)
        .await?;

        if requirements.is_empty() {
            return Err(AppError::EmptyRecipe(meal_name));
        }

        // Lock every involved product in deterministic id order. Two serves
        // over overlapping ingredients acquire the same locks in the same
        // order, which rules out both deadlock and the check/deduct race.
        let product_ids: Vec<Uuid> = requirements.iter().map(|r| r.product_id).collect();
        let locked = sqlx::query_as::<_, LockedProductRow>(
            "SELECT id, name, quantity_grams FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;

        let mut demands = Vec::with_capacity(requirements.len());
        for req in &requirements {
            // A recipe row pointing at a vanished product means the catalog
            // and ledger disagree; surface it as a missing product.
            let product = locked
                .iter()
                .find(|p| p.id == req.product_id)
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            demands.push(IngredientDemand {
                product_id: product.id,
                product_name: product.name.clone(),
                needed_grams: needed_for_portions(req.required_grams, portions_to_serve),
                available_grams: product.quantity_grams,
            });
        }

        if let Some(short) = first_shortfall(&demands) {
            return Err(AppError::InsufficientStock {
                product: short.product_name.clone(),
                required: short.needed_grams,
                available: short.available_grams,
            });
        }

        // Deduct under the locks taken above. The quantity guard repeats the
        // check inside the UPDATE; a miss here means the stock moved under us
        // and the whole transaction is abandoned rather than persisting a
        // negative quantity.
        for demand in &demands {
            let result = sqlx::query(
                "UPDATE products SET quantity_grams = quantity_grams - $1 WHERE id = $2 AND quantity_grams >= $1",
            )
            .bind(demand.needed_grams)
            .bind(demand.product_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::CorruptedState(demand.product_name.clone()));
            }
        }

        let record = sqlx::query_as::<_, ServingRow>(
            r#"
            INSERT INTO serving_records (meal_id, served_by_user_id, portions_served)
            VALUES ($1, $2, $3)
            RETURNING id, meal_id, served_by_user_id, portions_served, serving_time
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(portions_to_serve)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            meal = %meal_name,
            portions = portions_to_serve,
            "Served meal and deducted ingredients"
        );
        Ok(record.into())
    }

    /// List serving records, newest first, with optional filters.
    ///
    /// An `end` given at exactly midnight is widened to the end of that day,
    /// matching how clients pass bare dates.
    pub async fn list_servings(
        &self,
        user_id: Option<Uuid>,
        meal_id: Option<Uuid>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<ServingRecord>> {
        let end = end.map(widen_midnight_to_end_of_day);

        let records = sqlx::query_as::<_, ServingRow>(
            r#"
            SELECT id, meal_id, served_by_user_id, portions_served, serving_time
            FROM serving_records
            WHERE ($1::uuid IS NULL OR served_by_user_id = $1)
              AND ($2::uuid IS NULL OR meal_id = $2)
              AND ($3::timestamptz IS NULL OR serving_time >= $3)
              AND ($4::timestamptz IS NULL OR serving_time <= $4)
            ORDER BY serving_time DESC
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(user_id)
        .bind(meal_id)
        .bind(start)
        .bind(end)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}

/// Widen a timestamp that falls exactly on midnight to 23:59:59 of the same
/// day so that a filter like `end=2024-05-10` includes that day's servings
pub fn widen_midnight_to_end_of_day(end: DateTime<Utc>) -> DateTime<Utc> {
    use chrono::Timelike;
    if end.hour() == 0 && end.minute() == 0 && end.second() == 0 {
        end + chrono::Duration::seconds(86_399)
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn demand(name: &str, needed: i64, available: i64) -> IngredientDemand {
        IngredientDemand {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            needed_grams: Decimal::from(needed),
            available_grams: Decimal::from(available),
        }
    }

    #[test]
    fn needed_grams_scale_with_portions() {
        assert_eq!(
            needed_for_portions(Decimal::from(150), 4),
            Decimal::from(600)
        );
        assert_eq!(
            needed_for_portions(Decimal::new(255, 1), 2), // 25.5g * 2
            Decimal::new(510, 1)
        );
    }

    #[test]
    fn no_shortfall_when_stock_covers_everything() {
        let demands = vec![demand("Rice", 600, 2000), demand("Oil", 200, 300)];
        assert!(first_shortfall(&demands).is_none());
    }

    #[test]
    fn exact_stock_is_sufficient() {
        let demands = vec![demand("Rice", 600, 600)];
        assert!(first_shortfall(&demands).is_none());
    }

    #[test]
    fn first_failing_ingredient_is_reported() {
        let demands = vec![
            demand("Rice", 600, 2000),
            demand("Oil", 400, 300),
            demand("Salt", 50, 10),
        ];
        let short = first_shortfall(&demands).unwrap();
        assert_eq!(short.product_name, "Oil");
    }

    #[test]
    fn midnight_end_filter_covers_the_whole_day() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let widened = widen_midnight_to_end_of_day(midnight);
        assert_eq!(widened, Utc.with_ymd_and_hms(2024, 5, 10, 23, 59, 59).unwrap());

        let afternoon = Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap();
        assert_eq!(widen_midnight_to_end_of_day(afternoon), afternoon);
    }
}
