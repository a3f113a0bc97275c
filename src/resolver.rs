//! # Ingredient Resolver
//!
//! Maps canonical ingredient names onto persisted ingredient rows, creating
//! rows lazily for names the catalog does not know yet, and turns a
//! recipe's free-text ingredient lines into recipe ingredient links.
//!
//! Lookup-then-create is not atomic. Two writers resolving the same new name
//! at the same time could both try to create it; the seed run is a single
//! sequential writer, and the Postgres unique index turns the race into an
//! error instead of a duplicate row.

use crate::ingredient_parser::parse_ingredient_line;
use crate::store::{IngredientRecord, RecipeIngredientLink, SeedStore};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// A resolved ingredient and whether this call created it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIngredient {
    pub ingredient: IngredientRecord,
    pub created: bool,
}

/// Links built from a recipe's ingredient lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeLinks {
    /// One link per ingredient, in first-mention order
    pub links: Vec<RecipeIngredientLink>,
    /// Ingredients created while resolving
    pub created: usize,
    /// Clauses without a usable name
    pub skipped: usize,
}

/// Find an ingredient by name, case-insensitively, or create it
///
/// Returns `Ok(None)` for a blank name.
pub async fn resolve_ingredient<S: SeedStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Option<ResolvedIngredient>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    if let Some(ingredient) = store
        .find_ingredient_by_name(name)
        .await
        .with_context(|| format!("Failed to look up ingredient '{}'", name))?
    {
        debug!(name, id = ingredient.id, "Resolved existing ingredient");
        return Ok(Some(ResolvedIngredient {
            ingredient,
            created: false,
        }));
    }

    let ingredient = store
        .create_ingredient(name)
        .await
        .with_context(|| format!("Failed to create ingredient '{}'", name))?;
    info!(name, id = ingredient.id, "Created ingredient");

    Ok(Some(ResolvedIngredient {
        ingredient,
        created: true,
    }))
}

/// Parse ingredient lines and resolve every clause to an ingredient link
///
/// A recipe links each ingredient once. When two clauses resolve to the same
/// ingredient their quantities are added if the units agree; otherwise the
/// first mention wins.
pub async fn build_recipe_links<S, L>(store: &S, lines: &[L]) -> Result<RecipeLinks>
where
    S: SeedStore + ?Sized,
    L: AsRef<str>,
{
    let mut result = RecipeLinks::default();

    for line in lines {
        let parsed = parse_ingredient_line(line.as_ref());
        result.skipped += parsed.skipped.len();

        for ingredient in parsed.ingredients {
            let Some(resolved) = resolve_ingredient(store, &ingredient.name).await? else {
                result.skipped += 1;
                continue;
            };
            if resolved.created {
                result.created += 1;
            }

            let id = resolved.ingredient.id;
            let unit = ingredient.unit.as_str().to_string();
            match result.links.iter_mut().find(|link| link.ingredient_id == id) {
                Some(existing) if existing.unit == unit => {
                    existing.quantity += ingredient.quantity;
                }
                Some(existing) => {
                    warn!(
                        ingredient = %ingredient.name,
                        kept = %existing.unit,
                        dropped = %unit,
                        "Ingredient listed twice with different units, keeping the first"
                    );
                }
                None => result.links.push(RecipeIngredientLink {
                    ingredient_id: id,
                    quantity: ingredient.quantity,
                    unit,
                }),
            }
        }
    }

    Ok(result)
}

/// Rebuild a recipe's ingredient links from its free-text lines
///
/// Used whenever a recipe is created or edited: unknown ingredients are
/// created on the way and the previous links are replaced wholesale.
pub async fn replace_recipe_ingredients_from_lines<S, L>(
    store: &S,
    recipe_id: i64,
    lines: &[L],
) -> Result<RecipeLinks>
where
    S: SeedStore + ?Sized,
    L: AsRef<str>,
{
    let links = build_recipe_links(store, lines).await?;
    store
        .replace_recipe_ingredients(recipe_id, &links.links)
        .await
        .with_context(|| format!("Failed to store ingredients of recipe {}", recipe_id))?;

    debug!(
        recipe_id,
        links = links.links.len(),
        created = links.created,
        skipped = links.skipped,
        "Replaced recipe ingredients"
    );
    Ok(links)
}
