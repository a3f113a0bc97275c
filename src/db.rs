//! # Postgres Store
//!
//! Schema management and the [`SeedStore`] implementation on top of a sqlx
//! `PgPool`. Ingredient names are unique case-insensitively through an index
//! on `LOWER(name)`, and recipes own their steps and ingredient links through
//! `ON DELETE CASCADE`.

use crate::seed_data::Difficulty;
use crate::store::{
    IngredientRecord, NewIngredient, NewRecipe, NewUser, RecipeIngredientLink, SeedStore,
    StoreCounts,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{debug, info};

/// A recipe as stored, read back for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub time_min: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub is_premium: bool,
    pub price_rsd: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Connect to Postgres with a bounded pool
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!(max_connections, "Connecting to database");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'buyer' CHECK (role IN ('buyer', 'cook', 'admin')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredient_categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredient_categories table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            category_id BIGINT REFERENCES ingredient_categories(id) ON DELETE SET NULL,
            default_unit TEXT,
            default_qty DOUBLE PRECISION,
            price_rsd BIGINT CHECK (price_rsd >= 0)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredients table")?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS ingredients_name_lower_idx ON ingredients (LOWER(name))",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredient name index")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id BIGSERIAL PRIMARY KEY,
            author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            short_description TEXT NOT NULL,
            description TEXT NOT NULL,
            time_min INTEGER NOT NULL CHECK (time_min >= 0),
            difficulty SMALLINT NOT NULL CHECK (difficulty BETWEEN 1 AND 3),
            category TEXT NOT NULL,
            is_premium BOOLEAN NOT NULL DEFAULT FALSE,
            price_rsd BIGINT CHECK (price_rsd >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_ingredients (
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            ingredient_id BIGINT NOT NULL REFERENCES ingredients(id) ON DELETE RESTRICT,
            quantity DOUBLE PRECISION NOT NULL CHECK (quantity > 0),
            unit TEXT NOT NULL,
            PRIMARY KEY (recipe_id, ingredient_id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS steps (
            id BIGSERIAL PRIMARY KEY,
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            step_number INTEGER NOT NULL CHECK (step_number >= 1),
            text TEXT NOT NULL,
            UNIQUE (recipe_id, step_number)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create steps table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// [`SeedStore`] backed by Postgres
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recipes owned by an author, ordered by id
    pub async fn recipes_by_author(&self, author_id: i64) -> Result<Vec<RecipeRecord>> {
        let rows = sqlx::query(
            "SELECT id, author_id, title, time_min, difficulty, category, is_premium, price_rsd, created_at
             FROM recipes WHERE author_id = $1 ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read recipes")?;

        rows.into_iter()
            .map(|row| -> Result<RecipeRecord> {
                let level: i16 = row.try_get("difficulty")?;
                Ok(RecipeRecord {
                    id: row.try_get("id")?,
                    author_id: row.try_get("author_id")?,
                    title: row.try_get("title")?,
                    time_min: row.try_get("time_min")?,
                    difficulty: Difficulty::from_level(level)
                        .ok_or_else(|| anyhow!("Invalid difficulty level {}", level))?,
                    category: row.try_get("category")?,
                    is_premium: row.try_get("is_premium")?,
                    price_rsd: row.try_get("price_rsd")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    /// Step texts of a recipe in step order
    pub async fn recipe_steps(&self, recipe_id: i64) -> Result<Vec<(i32, String)>> {
        sqlx::query_as::<_, (i32, String)>(
            "SELECT step_number, text FROM steps WHERE recipe_id = $1 ORDER BY step_number",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read recipe steps")
    }

    /// Ingredient links of a recipe as (ingredient name, quantity, unit)
    pub async fn recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<(String, f64, String)>> {
        sqlx::query_as::<_, (String, f64, String)>(
            "SELECT i.name, ri.quantity, ri.unit
             FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = $1 ORDER BY i.name",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to read recipe ingredients")
    }
}

#[async_trait]
impl SeedStore for PgStore {
    async fn upsert_ingredient_category(&self, name: &str) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO ingredient_categories (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert ingredient category")?;
        Ok(id)
    }

    async fn upsert_ingredient(&self, ingredient: &NewIngredient) -> Result<IngredientRecord> {
        sqlx::query_as::<_, IngredientRecord>(
            "INSERT INTO ingredients (name, category_id, default_unit, default_qty, price_rsd)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ((LOWER(name))) DO UPDATE SET
                 category_id = EXCLUDED.category_id,
                 default_unit = EXCLUDED.default_unit,
                 default_qty = EXCLUDED.default_qty,
                 price_rsd = EXCLUDED.price_rsd
             RETURNING id, name, category_id, default_unit, default_qty, price_rsd",
        )
        .bind(&ingredient.name)
        .bind(ingredient.category_id)
        .bind(&ingredient.default_unit)
        .bind(ingredient.default_qty)
        .bind(ingredient.price_rsd)
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert ingredient")
    }

    async fn find_ingredient_by_name(&self, name: &str) -> Result<Option<IngredientRecord>> {
        sqlx::query_as::<_, IngredientRecord>(
            "SELECT id, name, category_id, default_unit, default_qty, price_rsd
             FROM ingredients WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up ingredient")
    }

    async fn create_ingredient(&self, name: &str) -> Result<IngredientRecord> {
        let record = sqlx::query_as::<_, IngredientRecord>(
            "INSERT INTO ingredients (name) VALUES ($1)
             RETURNING id, name, category_id, default_unit, default_qty, price_rsd",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert ingredient")?;
        debug!(id = record.id, name = %record.name, "Inserted ingredient");
        Ok(record)
    }

    async fn upsert_user(&self, user: &NewUser) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, name, role) VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name, role = EXCLUDED.role
             RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert user")?;
        Ok(id)
    }

    async fn delete_recipes_by_author(&self, author_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete recipes")?;
        Ok(result.rows_affected())
    }

    async fn recipe_author(&self, recipe_id: i64) -> Result<Option<i64>> {
        sqlx::query_scalar("SELECT author_id FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up recipe author")
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO recipes (id, author_id, title, short_description, description,
                                  time_min, difficulty, category, is_premium, price_rsd)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(recipe.id)
        .bind(recipe.author_id)
        .bind(&recipe.title)
        .bind(&recipe.short_description)
        .bind(&recipe.description)
        .bind(recipe.time_min)
        .bind(recipe.difficulty.level())
        .bind(recipe.category.as_str())
        .bind(recipe.is_premium)
        .bind(recipe.price_rsd)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert recipe")?;
        Ok(id)
    }

    async fn replace_recipe_ingredients(
        &self,
        recipe_id: i64,
        links: &[RecipeIngredientLink],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete recipe ingredients")?;

        for link in links {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(recipe_id)
            .bind(link.ingredient_id)
            .bind(link.quantity)
            .bind(&link.unit)
            .execute(&mut *tx)
            .await
            .context("Failed to insert recipe ingredient")?;
        }

        tx.commit().await.context("Failed to commit recipe ingredients")?;
        Ok(())
    }

    async fn replace_recipe_steps(&self, recipe_id: i64, steps: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM steps WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete recipe steps")?;

        for (index, text) in steps.iter().enumerate() {
            sqlx::query("INSERT INTO steps (recipe_id, step_number, text) VALUES ($1, $2, $3)")
                .bind(recipe_id)
                .bind(index as i32 + 1)
                .bind(text)
                .execute(&mut *tx)
                .await
                .context("Failed to insert recipe step")?;
        }

        tx.commit().await.context("Failed to commit recipe steps")?;
        Ok(())
    }

    async fn finish_recipes(&self) -> Result<()> {
        // Recipes were inserted with explicit ids; move the sequence past them.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('recipes', 'id'),
                           COALESCE((SELECT MAX(id) FROM recipes), 0) + 1, false)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to reset recipe id sequence")?;
        Ok(())
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let row = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM ingredient_categories) AS categories,
                (SELECT COUNT(*) FROM ingredients) AS ingredients,
                (SELECT COUNT(*) FROM recipes) AS recipes,
                (SELECT COUNT(*) FROM recipe_ingredients) AS recipe_ingredients,
                (SELECT COUNT(*) FROM steps) AS steps",
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to count rows")?;

        Ok(StoreCounts {
            users: row.try_get("users")?,
            categories: row.try_get("categories")?,
            ingredients: row.try_get("ingredients")?,
            recipes: row.try_get("recipes")?,
            recipe_ingredients: row.try_get("recipe_ingredients")?,
            steps: row.try_get("steps")?,
        })
    }
}
