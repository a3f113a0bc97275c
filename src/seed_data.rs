//! # Seed Data
//!
//! The fixed reference data fed through the seed run: the seed author, the
//! ingredient category taxonomy, the ingredient catalog and the recipe list.
//! A default data set is compiled into the binary from `data/seed.json`; a
//! file with the same shape can replace it.

use crate::ingredient_parser::canonicalize_name;
use crate::text_processing::normalize_text;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_SEED: &str = include_str!("../data/seed.json");

/// Problems found while loading or checking seed data
#[derive(Debug, Error)]
pub enum SeedDataError {
    #[error("failed to read seed data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("seed author email is empty")]
    EmptyAuthorEmail,

    #[error("ingredient category '{0}' is listed twice")]
    DuplicateCategory(String),

    #[error("ingredient '{0}' is listed twice in the catalog")]
    DuplicateIngredient(String),

    #[error("ingredient '{ingredient}' uses unknown category '{category}'")]
    UnknownCategory { ingredient: String, category: String },

    #[error("catalog name '{name}' is not canonical, recipes would resolve it to '{canonical}'")]
    NonCanonicalIngredient { name: String, canonical: String },

    #[error("ingredient '{0}' has a negative price")]
    NegativeIngredientPrice(String),

    #[error("recipe id {0} is used more than once")]
    DuplicateRecipeId(i64),

    #[error("recipe {0} has no steps")]
    NoSteps(i64),

    #[error("recipe {id} has a negative {field}")]
    Negative { id: i64, field: &'static str },
}

/// Recipe difficulty, labelled in Serbian in the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Lako")]
    Easy,
    #[serde(rename = "Srednje")]
    Medium,
    #[serde(rename = "Teško")]
    Hard,
}

/// Storefront recipe category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeCategory {
    #[serde(rename = "tradicionalno")]
    Traditional,
    #[serde(rename = "proteinsko")]
    Protein,
    #[serde(rename = "vegan")]
    Vegan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedAuthor {
    pub email: String,
    pub name: String,
}

/// An ingredient sold in the shop, with its catalog metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIngredient {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub default_unit: Option<String>,
    #[serde(default)]
    pub default_qty: Option<f64>,
    #[serde(default)]
    pub price_rsd: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRecipe {
    pub id: i64,
    pub title: String,
    pub short: String,
    pub description: String,
    pub time_min: i32,
    pub difficulty: Difficulty,
    pub category: RecipeCategory,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub price: Option<i64>,
    /// Free-text ingredient lines, e.g. "600g mesa (junetina/svinjetina)"
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub author: SeedAuthor,
    pub categories: Vec<String>,
    pub ingredients: Vec<CatalogIngredient>,
    pub recipes: Vec<SeedRecipe>,
}

impl Difficulty {
    /// Numeric level stored with the recipe (1 to 3)
    pub fn level(&self) -> i16 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_level(level: i16) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl RecipeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Traditional => "tradicionalno",
            RecipeCategory::Protein => "proteinsko",
            RecipeCategory::Vegan => "vegan",
        }
    }
}

impl SeedData {
    /// The data set compiled into the binary
    pub fn builtin() -> Result<Self, SeedDataError> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Load a data set from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, SeedDataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedDataError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Check the data set before anything is written
    pub fn validate(&self) -> Result<(), SeedDataError> {
        if self.author.email.trim().is_empty() {
            return Err(SeedDataError::EmptyAuthorEmail);
        }

        let mut categories = HashSet::new();
        for category in &self.categories {
            if !categories.insert(category.as_str()) {
                return Err(SeedDataError::DuplicateCategory(category.clone()));
            }
        }

        let mut names = HashSet::new();
        for ingredient in &self.ingredients {
            let normalized = normalize_text(&ingredient.name);
            let canonical = canonicalize_name(&ingredient.name);
            if canonical != normalized {
                return Err(SeedDataError::NonCanonicalIngredient {
                    name: ingredient.name.clone(),
                    canonical,
                });
            }
            if !names.insert(normalized) {
                return Err(SeedDataError::DuplicateIngredient(ingredient.name.clone()));
            }
            if let Some(category) = &ingredient.category {
                if !categories.contains(category.as_str()) {
                    return Err(SeedDataError::UnknownCategory {
                        ingredient: ingredient.name.clone(),
                        category: category.clone(),
                    });
                }
            }
            if ingredient.price_rsd.is_some_and(|price| price < 0) {
                return Err(SeedDataError::NegativeIngredientPrice(
                    ingredient.name.clone(),
                ));
            }
        }

        let mut ids = HashSet::new();
        for recipe in &self.recipes {
            if !ids.insert(recipe.id) {
                return Err(SeedDataError::DuplicateRecipeId(recipe.id));
            }
            if recipe.steps.iter().all(|step| step.trim().is_empty()) {
                return Err(SeedDataError::NoSteps(recipe.id));
            }
            if recipe.price.is_some_and(|price| price < 0) {
                return Err(SeedDataError::Negative {
                    id: recipe.id,
                    field: "price",
                });
            }
            if recipe.time_min < 0 {
                return Err(SeedDataError::Negative {
                    id: recipe.id,
                    field: "preparation time",
                });
            }
        }

        Ok(())
    }
}
