//! # Seed Store
//!
//! The persistence seam used by the resolver and the seed orchestrator.
//! [`crate::db::PgStore`] implements it on Postgres, and
//! [`crate::memory_store::MemoryStore`] keeps everything in memory for tests
//! and dry runs.

use crate::seed_data::{Difficulty, RecipeCategory};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// A persisted ingredient
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct IngredientRecord {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub default_unit: Option<String>,
    pub default_qty: Option<f64>,
    pub price_rsd: Option<i64>,
}

/// Catalog metadata for an ingredient upsert
#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient {
    pub name: String,
    pub category_id: Option<i64>,
    pub default_unit: Option<String>,
    pub default_qty: Option<f64>,
    pub price_rsd: Option<i64>,
}

/// Storefront roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Buyer,
    Cook,
    Admin,
}

/// A user account to upsert by email
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

/// A recipe row; `id` is kept so reseeding reproduces the same ids
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub time_min: i32,
    pub difficulty: Difficulty,
    pub category: RecipeCategory,
    pub is_premium: bool,
    pub price_rsd: Option<i64>,
}

/// One ingredient used by a recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeIngredientLink {
    pub ingredient_id: i64,
    pub quantity: f64,
    pub unit: String,
}

/// Row counts, mostly used to check reseeding is idempotent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub users: i64,
    pub categories: i64,
    pub ingredients: i64,
    pub recipes: i64,
    pub recipe_ingredients: i64,
    pub steps: i64,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Cook => "cook",
            UserRole::Admin => "admin",
        }
    }
}

#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Insert a category or return the existing one with the same name
    async fn upsert_ingredient_category(&self, name: &str) -> Result<i64>;

    /// Insert an ingredient or update the metadata of the row whose name
    /// matches case-insensitively
    async fn upsert_ingredient(&self, ingredient: &NewIngredient) -> Result<IngredientRecord>;

    /// Case-insensitive exact match on the ingredient name
    async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<IngredientRecord>>;

    /// Create an ingredient with no metadata
    async fn create_ingredient(&self, name: &str) -> Result<IngredientRecord>;

    /// Insert a user or update the name and role of the one with this email
    async fn upsert_user(&self, user: &NewUser) -> Result<i64>;

    /// Delete every recipe owned by `author_id`, with its steps and links
    async fn delete_recipes_by_author(&self, author_id: i64) -> Result<u64>;

    /// Author of the recipe with this id, if the id is taken
    async fn recipe_author(&self, recipe_id: i64) -> Result<Option<i64>>;

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<i64>;

    /// Replace all ingredient links of a recipe
    async fn replace_recipe_ingredients(
        &self,
        recipe_id: i64,
        links: &[RecipeIngredientLink],
    ) -> Result<()>;

    /// Replace all steps of a recipe, numbering them from 1
    async fn replace_recipe_steps(&self, recipe_id: i64, steps: &[String]) -> Result<()>;

    /// Called once after recipes were created with explicit ids
    async fn finish_recipes(&self) -> Result<()> {
        Ok(())
    }

    async fn counts(&self) -> Result<StoreCounts>;
}
