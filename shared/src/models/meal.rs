//! Meal (recipe) and ingredient-requirement models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named recipe: a set of ingredient requirements per portion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<MealIngredient>,
    pub created_at: DateTime<Utc>,
}

/// One ingredient requirement of a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealIngredient {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    /// Grams of the product needed for a single portion
    pub required_grams: Decimal,
}

/// Ingredient entry as supplied by clients when creating or updating a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealIngredientInput {
    pub product_id: Uuid,
    pub required_grams: Decimal,
}

/// Input for creating a meal
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMealInput {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<MealIngredientInput>,
}

/// Input for updating a meal.
///
/// When `ingredients` is present (even empty) the existing ingredient set is
/// fully replaced; this is a destructive replace, not a merge.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMealInput {
    pub name: Option<String>,
    pub ingredients: Option<Vec<MealIngredientInput>>,
}
