//! # Ingredient and Quantity Data Model
//!
//! This module defines data structures for representing ingredients and their
//! quantities as extracted from free-text Serbian recipe lines.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredient**: a canonical ingredient name with a quantity and unit
//! - **Unit**: the short unit vocabulary stored with recipe ingredients
//! - **ExtractedQuantity**: the raw output of the quantity/unit extractor
//! - **ParsedLine**: everything one ingredient line produced
//!
//! ## Usage
//!
//! ```rust
//! use sastojci::ingredient_model::{ParsedIngredient, Unit};
//!
//! let meat = ParsedIngredient::new("meso", 600.0, Unit::Gram);
//! assert_eq!(meat.to_string(), "600 g meso");
//!
//! let eggs = ParsedIngredient::new("jaje", 2.0, Unit::Piece);
//! assert_eq!(eggs.unit.as_str(), "kom");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantity used when a clause carries no usable number
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// A parsed ingredient ready to be resolved and linked to a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Canonical ingredient name (e.g. "luk", "meso", "grčki jogurt")
    pub name: String,

    /// Amount in `unit`, always positive
    pub quantity: f64,

    /// Unit of measurement
    pub unit: Unit,
}

/// Measurement units with normalization support
///
/// The string form returned by [`Unit::as_str`] is what gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Unit {
    /// Grams ("g")
    Gram,
    /// Kilograms ("kg")
    Kilogram,
    /// Milliliters ("ml")
    Milliliter,
    /// Liters ("l")
    Liter,
    /// Tablespoons ("kašika")
    Tablespoon,
    /// Pieces, the default count unit ("kom")
    #[default]
    Piece,
    /// Any other unit word, kept as written (normalized)
    Other(String),
}

/// Output of the quantity/unit extractor for one clause
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedQuantity {
    /// Text left after the leading quantity and unit were removed
    pub name_part: String,
    /// Parsed amount, always positive and finite
    pub quantity: f64,
    /// Canonical unit
    pub unit: Unit,
}

/// Everything parsed out of a single ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// The original line
    pub line: String,
    /// Ingredients in clause order
    pub ingredients: Vec<ParsedIngredient>,
    /// Clauses that produced no usable name
    pub skipped: Vec<String>,
}

impl ParsedIngredient {
    /// Create a new parsed ingredient
    pub fn new(name: &str, quantity: f64, unit: Unit) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit,
        }
    }
}

impl Unit {
    /// Persisted short form of the unit
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Tablespoon => "kašika",
            Unit::Piece => "kom",
            Unit::Other(word) => word,
        }
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Other(word) => word,
            known => known.as_str().to_string(),
        }
    }
}

impl From<String> for Unit {
    fn from(value: String) -> Self {
        match value.as_str() {
            "g" => Unit::Gram,
            "kg" => Unit::Kilogram,
            "ml" => Unit::Milliliter,
            "l" => Unit::Liter,
            "kašika" => Unit::Tablespoon,
            "kom" | "" => Unit::Piece,
            _ => Unit::Other(value),
        }
    }
}

impl ParsedLine {
    /// Create an empty result for a line
    pub fn new(line: &str) -> Self {
        Self {
            line: line.to_string(),
            ingredients: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of clauses that produced an ingredient
    pub fn parsed_count(&self) -> usize {
        self.ingredients.len()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity.fract() == 0.0 {
            write!(f, "{} {} {}", self.quantity as i64, self.unit, self.name)
        } else {
            write!(f, "{} {} {}", self.quantity, self.unit, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_string_forms() {
        assert_eq!(Unit::Gram.as_str(), "g");
        assert_eq!(Unit::Tablespoon.as_str(), "kašika");
        assert_eq!(Unit::Piece.as_str(), "kom");
        assert_eq!(Unit::Other("čena".to_string()).as_str(), "čena");
    }

    #[test]
    fn test_unit_from_string() {
        assert_eq!(Unit::from("kg".to_string()), Unit::Kilogram);
        assert_eq!(Unit::from("kom".to_string()), Unit::Piece);
        assert_eq!(
            Unit::from("glavice".to_string()),
            Unit::Other("glavice".to_string())
        );
    }

    #[test]
    fn test_parsed_ingredient_serializes_unit_as_string() {
        let ingredient = ParsedIngredient::new("meso", 600.0, Unit::Gram);
        let json = serde_json::to_value(&ingredient).unwrap();
        assert_eq!(json["unit"], "g");
        assert_eq!(json["name"], "meso");
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            ParsedIngredient::new("mleko", 1.5, Unit::Liter).to_string(),
            "1.5 l mleko"
        );
        assert_eq!(
            ParsedIngredient::new("avokado", 1.0, Unit::Piece).to_string(),
            "1 kom avokado"
        );
    }
}
