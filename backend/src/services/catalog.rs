//! Recipe catalog service: meals and their per-portion ingredient requirements

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::BTreeMap;
use uuid::Uuid;

use shared::models::{CreateMealInput, Meal, MealIngredient, MealIngredientInput, UpdateMealInput};
use shared::validation::{validate_name, validate_positive_grams};

use crate::error::{AppError, AppResult};

/// Recipe catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct MealRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    product_id: Uuid,
    product_name: String,
    required_grams: Decimal,
}

impl From<IngredientRow> for MealIngredient {
    fn from(row: IngredientRow) -> Self {
        MealIngredient {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            required_grams: row.required_grams,
        }
    }
}

/// Deduplicate client-supplied ingredient entries: a product may appear at
/// most once per recipe, and the last entry for a product wins.
fn dedup_last_wins(ingredients: &[MealIngredientInput]) -> Vec<(Uuid, Decimal)> {
    let mut by_product: BTreeMap<Uuid, Decimal> = BTreeMap::new();
    for ing in ingredients {
        by_product.insert(ing.product_id, ing.required_grams);
    }
    by_product.into_iter().collect()
}

/// Resolve an update's effect on a meal's ingredient set.
///
/// A present `update` (even an empty list) fully replaces the prior set;
/// nothing from the prior set survives. `None` keeps the prior set as is.
fn resolve_ingredient_update(
    prior: Vec<(Uuid, Decimal)>,
    update: Option<&[MealIngredientInput]>,
) -> Vec<(Uuid, Decimal)> {
    match update {
        Some(replacement) => dedup_last_wins(replacement),
        None => prior,
    }
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a meal with its ingredient list.
    ///
    /// Rolls back entirely if any referenced product does not exist; there is
    /// no partial ingredient insert.
    pub async fn create_meal(&self, input: CreateMealInput) -> AppResult<Meal> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let name = input.name.trim().to_string();

        let mut tx = self.db.begin().await?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM meals WHERE name = $1)")
                .bind(&name)
                .fetch_one(&mut *tx)
                .await?;

        if exists {
            return Err(AppError::DuplicateName {
                resource: "Meal".to_string(),
                name,
            });
        }

        let meal = sqlx::query_as::<_, MealRow>(
            "INSERT INTO meals (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&name)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_ingredients(&mut tx, meal.id, &dedup_last_wins(&input.ingredients)).await?;

        tx.commit().await?;

        tracing::info!(meal = %meal.name, "Created meal");
        self.get_meal(meal.id).await
    }

    /// Update a meal's name and/or its ingredient list.
    ///
    /// A present `ingredients` value (even an empty list) fully replaces the
    /// existing set; the replace is transactional, so an unknown product id
    /// leaves the previous set unchanged.
    pub async fn update_meal(&self, meal_id: Uuid, input: UpdateMealInput) -> AppResult<Meal> {
        let mut tx = self.db.begin().await?;

        let meal = sqlx::query_as::<_, MealRow>("SELECT id, name, created_at FROM meals WHERE id = $1")
            .bind(meal_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Meal".to_string()))?;

        if let Some(ref new_name) = input.name {
            validate_name(new_name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
            let new_name = new_name.trim().to_string();

            let collision = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM meals WHERE name = $1 AND id <> $2)",
            )
            .bind(&new_name)
            .bind(meal_id)
            .fetch_one(&mut *tx)
            .await?;

            if collision {
                return Err(AppError::DuplicateName {
                    resource: "Meal".to_string(),
                    name: new_name,
                });
            }

            sqlx::query("UPDATE meals SET name = $1 WHERE id = $2")
                .bind(&new_name)
                .bind(meal_id)
                .execute(&mut *tx)
                .await?;
        }

        let prior = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT product_id, required_grams FROM meal_ingredients WHERE meal_id = $1",
        )
        .bind(meal_id)
        .fetch_all(&mut *tx)
        .await?;

        let resolved = resolve_ingredient_update(prior, input.ingredients.as_deref());

        if input.ingredients.is_some() {
            // Full replace: discard every prior row, then insert the new set
            sqlx::query("DELETE FROM meal_ingredients WHERE meal_id = $1")
                .bind(meal_id)
                .execute(&mut *tx)
                .await?;

            Self::insert_ingredients(&mut tx, meal_id, &resolved).await?;
        }

        tx.commit().await?;

        tracing::info!(meal = %meal.name, "Updated meal");
        self.get_meal(meal_id).await
    }

    /// Delete a meal; its ingredient rows cascade, its serving history stays
    pub async fn delete_meal(&self, meal_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(meal_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Meal".to_string()));
        }

        Ok(())
    }

    /// Get a meal with its ingredient list and product names
    pub async fn get_meal(&self, meal_id: Uuid) -> AppResult<Meal> {
        let meal = sqlx::query_as::<_, MealRow>("SELECT id, name, created_at FROM meals WHERE id = $1")
            .bind(meal_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Meal".to_string()))?;

        let ingredients = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT mi.id, mi.product_id, p.name as product_name, mi.required_grams
            FROM meal_ingredients mi
            JOIN products p ON p.id = mi.product_id
            WHERE mi.meal_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(meal_id)
        .fetch_all(&self.db)
        .await?;

        Ok(Meal {
            id: meal.id,
            name: meal.name,
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            created_at: meal.created_at,
        })
    }

    /// List meals ordered by name, with their ingredients
    pub async fn list_meals(&self, skip: i64, limit: i64) -> AppResult<Vec<Meal>> {
        let meals = sqlx::query_as::<_, MealRow>(
            "SELECT id, name, created_at FROM meals ORDER BY name OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let mut out = Vec::with_capacity(meals.len());
        for meal in meals {
            out.push(self.get_meal(meal.id).await?);
        }
        Ok(out)
    }

    async fn insert_ingredients(
        tx: &mut Transaction<'_, Postgres>,
        meal_id: Uuid,
        ingredients: &[(Uuid, Decimal)],
    ) -> AppResult<()> {
        for &(product_id, required_grams) in ingredients {
            validate_positive_grams(required_grams)
                .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

            let product_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
            )
            .bind(product_id)
            .fetch_one(&mut **tx)
            .await?;

            if !product_exists {
                return Err(AppError::NotFound("Product".to_string()));
            }

            sqlx::query(
                "INSERT INTO meal_ingredients (meal_id, product_id, required_grams) VALUES ($1, $2, $3)",
            )
            .bind(meal_id)
            .bind(product_id)
            .bind(required_grams)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
