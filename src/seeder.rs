//! # Seed Orchestrator
//!
//! Drives a full seed run over a [`SeedStore`], one awaited write at a time:
//!
//! 1. upsert the ingredient category taxonomy
//! 2. upsert the ingredient catalog with its shop metadata
//! 3. upsert the seed author, check no seed recipe id is held by another
//!    author, drop every recipe it owns, then recreate each recipe with its
//!    ingredient links and numbered steps
//!
//! Running it twice leaves the same categories, ingredients and recipes
//! behind. Any store error aborts the run; rerunning from scratch is safe.

use crate::resolver::replace_recipe_ingredients_from_lines;
use crate::seed_data::{CatalogIngredient, SeedData, SeedRecipe};
use crate::store::{NewIngredient, NewRecipe, NewUser, SeedStore, UserRole};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// What a seed run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categories: usize,
    pub catalog_ingredients: usize,
    /// Ingredients created on the fly from recipe lines
    pub created_ingredients: usize,
    pub deleted_recipes: u64,
    pub recipes: usize,
    pub recipe_ingredients: usize,
    pub steps: usize,
    pub skipped_clauses: usize,
}

/// Run the whole seed over `store`
pub async fn run_seed<S: SeedStore + ?Sized>(store: &S, data: &SeedData) -> Result<SeedReport> {
    data.validate().context("Seed data is invalid")?;
    info!(
        categories = data.categories.len(),
        ingredients = data.ingredients.len(),
        recipes = data.recipes.len(),
        "Starting seed run"
    );

    let mut report = SeedReport::default();

    let category_ids = seed_ingredient_categories(store, &data.categories).await?;
    report.categories = category_ids.len();

    report.catalog_ingredients =
        seed_ingredient_catalog(store, &data.ingredients, &category_ids).await?;

    seed_recipes(store, data, &mut report).await?;

    info!(?report, "Seed run finished");
    Ok(report)
}

/// Upsert every category, returning name -> id
pub async fn seed_ingredient_categories<S: SeedStore + ?Sized>(
    store: &S,
    categories: &[String],
) -> Result<HashMap<String, i64>> {
    let mut ids = HashMap::new();
    for name in categories {
        let id = store
            .upsert_ingredient_category(name)
            .await
            .with_context(|| format!("Failed to upsert ingredient category '{}'", name))?;
        debug!(name = %name, id, "Upserted ingredient category");
        ids.insert(name.clone(), id);
    }
    info!(count = ids.len(), "Ingredient categories ready");
    Ok(ids)
}

/// Upsert every catalog ingredient with its metadata
pub async fn seed_ingredient_catalog<S: SeedStore + ?Sized>(
    store: &S,
    catalog: &[CatalogIngredient],
    category_ids: &HashMap<String, i64>,
) -> Result<usize> {
    for entry in catalog {
        let category_id = match &entry.category {
            Some(category) => Some(*category_ids.get(category).with_context(|| {
                format!(
                    "Ingredient '{}' refers to unseeded category '{}'",
                    entry.name, category
                )
            })?),
            None => None,
        };

        let ingredient = NewIngredient {
            name: entry.name.trim().to_string(),
            category_id,
            default_unit: entry.default_unit.clone(),
            default_qty: entry.default_qty,
            price_rsd: entry.price_rsd,
        };
        let record = store
            .upsert_ingredient(&ingredient)
            .await
            .with_context(|| format!("Failed to upsert ingredient '{}'", entry.name))?;
        debug!(name = %record.name, id = record.id, "Upserted catalog ingredient");
    }
    info!(count = catalog.len(), "Ingredient catalog ready");
    Ok(catalog.len())
}

/// Replace the seed author's recipes with the ones in `data`
pub async fn seed_recipes<S: SeedStore + ?Sized>(
    store: &S,
    data: &SeedData,
    report: &mut SeedReport,
) -> Result<()> {
    let author = NewUser {
        email: data.author.email.trim().to_string(),
        name: data.author.name.clone(),
        role: UserRole::Cook,
    };
    let author_id = store
        .upsert_user(&author)
        .await
        .with_context(|| format!("Failed to upsert seed author '{}'", author.email))?;

    ensure_recipe_ids_free(store, author_id, &data.recipes).await?;

    report.deleted_recipes = store
        .delete_recipes_by_author(author_id)
        .await
        .context("Failed to delete previously seeded recipes")?;
    info!(
        author_id,
        deleted = report.deleted_recipes,
        "Removed previously seeded recipes"
    );

    for recipe in &data.recipes {
        seed_recipe(store, author_id, recipe, report).await?;
    }

    store
        .finish_recipes()
        .await
        .context("Failed to finalize seeded recipes")?;
    Ok(())
}

/// Fail before touching recipes if a seed id belongs to someone else
async fn ensure_recipe_ids_free<S: SeedStore + ?Sized>(
    store: &S,
    author_id: i64,
    recipes: &[SeedRecipe],
) -> Result<()> {
    for recipe in recipes {
        let owner = store
            .recipe_author(recipe.id)
            .await
            .with_context(|| format!("Failed to check recipe id {}", recipe.id))?;
        if let Some(owner) = owner.filter(|owner| *owner != author_id) {
            bail!(
                "Recipe id {} ('{}') is already used by a recipe of user {}",
                recipe.id,
                recipe.title,
                owner
            );
        }
    }
    Ok(())
}

async fn seed_recipe<S: SeedStore + ?Sized>(
    store: &S,
    author_id: i64,
    recipe: &SeedRecipe,
    report: &mut SeedReport,
) -> Result<()> {
    let new_recipe = NewRecipe {
        id: recipe.id,
        author_id,
        title: recipe.title.clone(),
        short_description: recipe.short.clone(),
        description: recipe.description.clone(),
        time_min: recipe.time_min,
        difficulty: recipe.difficulty,
        category: recipe.category,
        is_premium: recipe.premium,
        price_rsd: recipe.price,
    };
    let recipe_id = store
        .create_recipe(&new_recipe)
        .await
        .with_context(|| format!("Failed to create recipe {} '{}'", recipe.id, recipe.title))?;

    let links = replace_recipe_ingredients_from_lines(store, recipe_id, &recipe.ingredients).await?;

    let steps: Vec<String> = recipe
        .steps
        .iter()
        .map(|step| step.trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();
    store
        .replace_recipe_steps(recipe_id, &steps)
        .await
        .with_context(|| format!("Failed to store steps of recipe {}", recipe_id))?;

    info!(
        recipe_id,
        title = %recipe.title,
        ingredients = links.links.len(),
        steps = steps.len(),
        "Seeded recipe"
    );

    report.recipes += 1;
    report.recipe_ingredients += links.links.len();
    report.created_ingredients += links.created;
    report.skipped_clauses += links.skipped;
    report.steps += steps.len();
    Ok(())
}
