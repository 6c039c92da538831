//! Portion calculator: how many whole portions are preparable right now
//!
//! Pure arithmetic over live stock; no caching anywhere, so every call
//! reflects the ledger at call time.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::PortionCalculation;

use crate::error::{AppError, AppResult};

/// Portion calculator service
#[derive(Clone)]
pub struct PortionService {
    db: PgPool,
}

/// One ingredient's live stock against its per-portion requirement
#[derive(Debug, FromRow)]
struct StockRequirementRow {
    /// NULL when the referenced product no longer exists
    quantity_grams: Option<Decimal>,
    required_grams: Decimal,
}

/// Maximum whole portions preparable given `(stock, required)` pairs.
///
/// `min_i floor(stock_i / required_i)` with integer floor division on grams.
/// A recipe with no ingredients is never preparable. Any ingredient with
/// zero stock, or a non-positive requirement, forces the whole result to 0.
pub fn portions_from_stock(ingredients: &[(Decimal, Decimal)]) -> i64 {
    if ingredients.is_empty() {
        return 0;
    }

    let mut min_portions = i64::MAX;
    for (stock, required) in ingredients {
        if *stock <= Decimal::ZERO || *required <= Decimal::ZERO {
            return 0;
        }
        let portions = (stock / required).floor().to_i64().unwrap_or(0);
        min_portions = min_portions.min(portions);
    }
    min_portions
}

impl PortionService {
    /// Create a new PortionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Calculable portions for one meal
    pub async fn calculable_portions(&self, meal_id: Uuid) -> AppResult<PortionCalculation> {
        let meal_name =
            sqlx::query_scalar::<_, String>("SELECT name FROM meals WHERE id = $1")
                .bind(meal_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Meal".to_string()))?;

        let rows = sqlx::query_as::<_, StockRequirementRow>(
            r#"
            SELECT p.quantity_grams, mi.required_grams
            FROM meal_ingredients mi
            LEFT JOIN products p ON p.id = mi.product_id
            WHERE mi.meal_id = $1
            "#,
        )
        .bind(meal_id)
        .fetch_all(&self.db)
        .await?;

        let pairs: Vec<(Decimal, Decimal)> = rows
            .into_iter()
            .map(|r| (r.quantity_grams.unwrap_or(Decimal::ZERO), r.required_grams))
            .collect();

        Ok(PortionCalculation {
            meal_id,
            meal_name,
            calculable_portions: portions_from_stock(&pairs),
        })
    }

    /// Calculable portions for every meal in the catalog
    pub async fn calculable_portions_for_all_meals(&self) -> AppResult<Vec<PortionCalculation>> {
        let meal_ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM meals ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(meal_ids.len());
        for meal_id in meal_ids {
            out.push(self.calculable_portions(meal_id).await?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn empty_recipe_yields_zero() {
        assert_eq!(portions_from_stock(&[]), 0);
    }

    #[test]
    fn floor_of_the_binding_ingredient() {
        // stock {Rice: 2000, Oil: 300}, recipe {Rice: 150, Oil: 50}
        // min(floor(2000/150), floor(300/50)) = min(13, 6) = 6
        let pairs = [(dec(2000), dec(150)), (dec(300), dec(50))];
        assert_eq!(portions_from_stock(&pairs), 6);
    }

    #[test]
    fn zero_stock_zeroes_the_whole_recipe() {
        let pairs = [(dec(2000), dec(150)), (dec(0), dec(50))];
        assert_eq!(portions_from_stock(&pairs), 0);
    }

    #[test]
    fn non_positive_requirement_is_defensively_zero() {
        let pairs = [(dec(2000), dec(0))];
        assert_eq!(portions_from_stock(&pairs), 0);
        let pairs = [(dec(2000), dec(-5))];
        assert_eq!(portions_from_stock(&pairs), 0);
    }

    #[test]
    fn fractional_grams_still_floor() {
        let pairs = [(Decimal::new(9999, 1), dec(100))]; // 999.9 / 100 -> 9
        assert_eq!(portions_from_stock(&pairs), 9);
    }
}
