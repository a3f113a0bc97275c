//! # Sastojci
//!
//! Ingredient-line parsing and database seeding for the recipe and
//! ingredient storefront. Free-text Serbian ingredient lines are split,
//! measured and canonicalized, then resolved to persistent ingredient rows
//! while the seed run loads categories, the ingredient catalog and recipes.

pub mod canonical_names;
pub mod config;
pub mod db;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod measurement_patterns;
pub mod memory_store;
pub mod resolver;
pub mod seed_data;
pub mod seeder;
pub mod store;
pub mod text_processing;
