//! # Ingredient Parser
//!
//! This module turns free-text Serbian ingredient lines into structured
//! [`ParsedIngredient`] records. The pipeline for one line is:
//!
//! 1. split the line into comma-separated clauses
//! 2. extract a leading quantity and unit word from each clause
//! 3. canonicalize what is left into a base ingredient name
//!
//! Parsing never fails. Every step has a default: quantity `1`, unit `kom`,
//! and the clause text itself as the name.
//!
//! ## Usage
//!
//! ```rust
//! use sastojci::ingredient_parser::parse_ingredient_line;
//! use sastojci::ingredient_model::Unit;
//!
//! let parsed = parse_ingredient_line("600g mesa (junetina/svinjetina)");
//! assert_eq!(parsed.ingredients[0].name, "meso");
//! assert_eq!(parsed.ingredients[0].quantity, 600.0);
//! assert_eq!(parsed.ingredients[0].unit, Unit::Gram);
//! ```

use crate::canonical_names::{
    CANONICAL_MAP, DESCRIPTIVE_PREFIXES, GROUND_MEAT, GROUND_MEAT_MARKER,
};
use crate::ingredient_model::{
    ExtractedQuantity, ParsedIngredient, ParsedLine, Unit, DEFAULT_QUANTITY,
};
use crate::measurement_patterns::{LEADING_QUANTITY_REGEX, PARENTHETICAL_REGEX};
use crate::text_processing::{normalize_text, split_clauses};
use log::{debug, trace};

/// Separator after which a name only carries a footnote
const FOOTNOTE_SEPARATOR: char = '—';

/// Parse every line of a recipe's ingredient list
pub fn parse_ingredient_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedLine> {
    lines
        .iter()
        .map(|line| parse_ingredient_line(line.as_ref()))
        .collect()
}

/// Parse a single ingredient line into one ingredient per clause
///
/// # Examples
///
/// ```rust
/// use sastojci::ingredient_parser::parse_ingredient_line;
///
/// let parsed = parse_ingredient_line("So, biber");
/// assert_eq!(parsed.parsed_count(), 2);
/// assert_eq!(parsed.ingredients[0].name, "so");
/// assert_eq!(parsed.ingredients[1].name, "biber");
/// ```
pub fn parse_ingredient_line(line: &str) -> ParsedLine {
    let mut parsed = ParsedLine::new(line);

    for clause in split_clauses(line) {
        match parse_clause(&clause) {
            Some(ingredient) => parsed.ingredients.push(ingredient),
            None => {
                debug!("Skipping clause without an ingredient name: '{}'", clause);
                parsed.skipped.push(clause);
            }
        }
    }

    debug!(
        "Parsed line '{}': {} ingredient(s), {} skipped",
        line,
        parsed.ingredients.len(),
        parsed.skipped.len()
    );
    parsed
}

/// Parse one clause, returning `None` when no usable name is left
pub fn parse_clause(clause: &str) -> Option<ParsedIngredient> {
    let extracted = extract_quantity(clause);

    let mut name = canonicalize_name(&extracted.name_part);
    if name.is_empty() {
        name = normalize_text(&extracted.name_part);
    }
    if name.is_empty() {
        return None;
    }

    Some(ParsedIngredient {
        name,
        quantity: extracted.quantity,
        unit: extracted.unit,
    })
}

/// Extract a leading quantity and unit word from a clause
///
/// The leading number is only taken as a quantity when some text follows
/// it. Otherwise the whole clause is the name, with quantity `1` and unit
/// `kom`.
///
/// # Examples
///
/// ```rust
/// use sastojci::ingredient_parser::extract_quantity;
/// use sastojci::ingredient_model::Unit;
///
/// let extracted = extract_quantity("200g pasulja");
/// assert_eq!(extracted.quantity, 200.0);
/// assert_eq!(extracted.unit, Unit::Gram);
/// assert_eq!(extracted.name_part, "pasulja");
///
/// let extracted = extract_quantity("biber");
/// assert_eq!(extracted.quantity, 1.0);
/// assert_eq!(extracted.unit, Unit::Piece);
/// ```
pub fn extract_quantity(clause: &str) -> ExtractedQuantity {
    let clause = clause.trim();

    if let Some(captures) = LEADING_QUANTITY_REGEX.captures(clause) {
        let rest = captures.name("rest").map(|m| m.as_str().trim()).unwrap_or("");

        if !rest.is_empty() {
            let quantity = captures
                .name("qty")
                .map(|m| parse_number(m.as_str()))
                .unwrap_or(DEFAULT_QUANTITY);
            let unit = captures
                .name("unit")
                .map(|m| canonical_unit(m.as_str()))
                .unwrap_or_default();

            trace!(
                "Extracted quantity from '{}': {} {} / '{}'",
                clause,
                quantity,
                unit,
                rest
            );
            return ExtractedQuantity {
                name_part: rest.to_string(),
                quantity,
                unit,
            };
        }
    }

    trace!("No leading quantity in '{}', using defaults", clause);
    ExtractedQuantity {
        name_part: clause.to_string(),
        quantity: DEFAULT_QUANTITY,
        unit: Unit::Piece,
    }
}

/// Map a captured unit word onto the short unit vocabulary
///
/// # Examples
///
/// ```rust
/// use sastojci::ingredient_parser::canonical_unit;
/// use sastojci::ingredient_model::Unit;
///
/// assert_eq!(canonical_unit("grama"), Unit::Gram);
/// assert_eq!(canonical_unit("kašike"), Unit::Tablespoon);
/// assert_eq!(canonical_unit("čena"), Unit::Other("čena".to_string()));
/// ```
pub fn canonical_unit(word: &str) -> Unit {
    let word = normalize_text(word);

    match word.as_str() {
        "" => Unit::Piece,
        "g" | "gr" | "gram" | "grama" => Unit::Gram,
        "kg" => Unit::Kilogram,
        "ml" => Unit::Milliliter,
        "l" => Unit::Liter,
        w if w.starts_with("kas") || w.starts_with("kaš") => Unit::Tablespoon,
        _ => Unit::Other(word),
    }
}

/// Fold a name part into its canonical ingredient name
///
/// Drops the footnote after an em dash, removes parenthetical groups and a
/// leading descriptive word, normalizes, then applies [`CANONICAL_MAP`].
/// Anything mentioning ground meat becomes `mleveno meso`. The result may be
/// empty.
///
/// # Examples
///
/// ```rust
/// use sastojci::ingredient_parser::canonicalize_name;
///
/// assert_eq!(canonicalize_name("crni luk"), "luk");
/// assert_eq!(canonicalize_name("file lososa"), "losos");
/// assert_eq!(canonicalize_name("mesa (junetina/svinjetina)"), "meso");
/// ```
pub fn canonicalize_name(name_part: &str) -> String {
    if normalize_text(name_part).contains(GROUND_MEAT_MARKER) {
        trace!("Ground meat override for '{}'", name_part);
        return GROUND_MEAT.to_string();
    }

    let without_footnote = match name_part.find(FOOTNOTE_SEPARATOR) {
        Some(pos) => &name_part[..pos],
        None => name_part,
    };

    let without_groups = strip_parenthetical_groups(without_footnote);
    let stripped = strip_descriptive_prefix(without_groups.trim());
    let normalized = normalize_text(stripped);

    let canonical = match CANONICAL_MAP.get(normalized.as_str()) {
        Some(mapped) => mapped.to_string(),
        None => normalized,
    };

    trace!("Canonicalized '{}' -> '{}'", name_part, canonical);
    canonical
}

/// Remove parenthetical groups, innermost first, until none are left
fn strip_parenthetical_groups(text: &str) -> String {
    let mut current = text.to_string();
    while PARENTHETICAL_REGEX.is_match(&current) {
        current = PARENTHETICAL_REGEX.replace_all(&current, " ").into_owned();
    }
    current
}

/// Remove one leading descriptive word such as "file" or "konzerva"
fn strip_descriptive_prefix(name: &str) -> &str {
    let mut parts = name.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let first_lower = first.to_lowercase();

    if DESCRIPTIVE_PREFIXES.contains(&first_lower.as_str()) {
        parts.next().unwrap_or("").trim_start()
    } else {
        name
    }
}

/// Parse a quantity using either '.' or ',' as decimal separator
fn parse_number(raw: &str) -> f64 {
    match raw.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => DEFAULT_QUANTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_weight_glued_to_number() {
        let extracted = extract_quantity("200g pasulja");
        assert_eq!(extracted.quantity, 200.0);
        assert_eq!(extracted.unit, Unit::Gram);
        assert_eq!(extracted.name_part, "pasulja");
    }

    #[test]
    fn test_extract_count_without_unit() {
        let extracted = extract_quantity("2 jaja");
        assert_eq!(extracted.quantity, 2.0);
        assert_eq!(extracted.unit, Unit::Piece);
        assert_eq!(extracted.name_part, "jaja");
    }

    #[test]
    fn test_extract_decimal_comma() {
        let extracted = extract_quantity("1,5 l mleka");
        assert_eq!(extracted.quantity, 1.5);
        assert_eq!(extracted.unit, Unit::Liter);
        assert_eq!(extracted.name_part, "mleka");

        let extracted = extract_quantity("0.5kg krompira");
        assert_eq!(extracted.quantity, 0.5);
        assert_eq!(extracted.unit, Unit::Kilogram);
    }

    #[test]
    fn test_extract_tablespoon_variants() {
        assert_eq!(extract_quantity("2 kašike ulja").unit, Unit::Tablespoon);
        assert_eq!(extract_quantity("1 kasika meda").unit, Unit::Tablespoon);
        assert_eq!(extract_quantity("3 Kašičice šećera").unit, Unit::Tablespoon);
    }

    #[test]
    fn test_extract_unknown_unit_is_kept() {
        let extracted = extract_quantity("3 čena belog luka");
        assert_eq!(extracted.quantity, 3.0);
        assert_eq!(extracted.unit, Unit::Other("čena".to_string()));
        assert_eq!(extracted.name_part, "belog luka");
    }

    #[test]
    fn test_extract_number_alone_is_a_name() {
        let extracted = extract_quantity("200g");
        assert_eq!(extracted.quantity, 1.0);
        assert_eq!(extracted.unit, Unit::Piece);
        assert_eq!(extracted.name_part, "200g");
    }

    #[test]
    fn test_extract_zero_defaults_to_one() {
        let extracted = extract_quantity("0 g soli");
        assert_eq!(extracted.quantity, 1.0);
        assert_eq!(extracted.unit, Unit::Gram);
    }

    #[test]
    fn test_extract_always_positive_with_unit() {
        let clauses = [
            "", "biber", "2", "2 jaja", "0,0 ml vode", "999999999999 g brašna",
            "1.2.3 nešto", "— fusnota", "(opciono)", "10 kg", "ml",
        ];
        for clause in clauses {
            let extracted = extract_quantity(clause);
            assert!(extracted.quantity > 0.0, "quantity for {:?}", clause);
            assert!(extracted.quantity.is_finite(), "quantity for {:?}", clause);
            assert!(!extracted.unit.as_str().is_empty(), "unit for {:?}", clause);
        }
    }

    #[test]
    fn test_canonical_unit_vocabulary() {
        assert_eq!(canonical_unit("g"), Unit::Gram);
        assert_eq!(canonical_unit("gr"), Unit::Gram);
        assert_eq!(canonical_unit("gram"), Unit::Gram);
        assert_eq!(canonical_unit("GRAMA"), Unit::Gram);
        assert_eq!(canonical_unit("kg"), Unit::Kilogram);
        assert_eq!(canonical_unit("ml"), Unit::Milliliter);
        assert_eq!(canonical_unit("l"), Unit::Liter);
        assert_eq!(canonical_unit("kašika"), Unit::Tablespoon);
        assert_eq!(canonical_unit("glavice"), Unit::Other("glavice".to_string()));
    }

    #[test]
    fn test_canonicalize_onion_variants() {
        assert_eq!(canonicalize_name("crni luk"), "luk");
        assert_eq!(canonicalize_name("luk"), "luk");
        assert_eq!(canonicalize_name("Crnog Luka"), "luk");
    }

    #[test]
    fn test_canonicalize_strips_footnote_and_groups() {
        assert_eq!(canonicalize_name("mesa (junetina/svinjetina)"), "meso");
        assert_eq!(canonicalize_name("pasulja — potopljenog preko noći"), "pasulj");
        assert_eq!(canonicalize_name("grčkog jogurta (2%) — ili obični"), "grčki jogurt");
    }

    #[test]
    fn test_canonicalize_strips_nested_groups() {
        assert_eq!(canonicalize_name("(a (b) c) luk"), "luk");
        assert_eq!(canonicalize_name("mesa ((junetina) ili (svinjetina))"), "meso");
        assert_eq!(canonicalize_name("paradajza (pelat) (oljušten)"), "paradajz");
    }

    #[test]
    fn test_canonicalize_strips_descriptive_prefix() {
        assert_eq!(canonicalize_name("file lososa"), "losos");
        assert_eq!(canonicalize_name("Konzerva tune"), "tuna");
        assert_eq!(canonicalize_name("kriška hleba"), "hleb");
        assert_eq!(canonicalize_name("glavica kupusa"), "kupus");
        // Only a leading whole word is stripped.
        assert_eq!(canonicalize_name("pileći file"), "piletina");
        assert_eq!(canonicalize_name("filet"), "filet");
    }

    #[test]
    fn test_canonicalize_ground_meat_override() {
        assert_eq!(canonicalize_name("mlevenog mesa"), "mleveno meso");
        assert_eq!(canonicalize_name("junećeg mlevenog mesa (posno)"), "mleveno meso");
    }

    #[test]
    fn test_canonicalize_can_be_empty() {
        assert_eq!(canonicalize_name(""), "");
        assert_eq!(canonicalize_name("(po želji)"), "");
        assert_eq!(canonicalize_name("file"), "");
    }

    #[test]
    fn test_parse_clause_falls_back_to_raw_name() {
        let ingredient = parse_clause("(po želji)").unwrap();
        assert_eq!(ingredient.name, "po želji");
        assert!(parse_clause("").is_none());
    }

    #[test]
    fn test_parse_line_end_to_end() {
        let parsed = parse_ingredient_line("1 avokado");
        assert_eq!(
            parsed.ingredients,
            vec![ParsedIngredient::new("avokado", 1.0, Unit::Piece)]
        );

        let parsed = parse_ingredient_line("600g mesa (junetina/svinjetina)");
        assert_eq!(
            parsed.ingredients,
            vec![ParsedIngredient::new("meso", 600.0, Unit::Gram)]
        );
    }

    #[test]
    fn test_parse_line_with_several_clauses() {
        let parsed = parse_ingredient_line("So, biber");
        assert_eq!(
            parsed.ingredients,
            vec![
                ParsedIngredient::new("so", 1.0, Unit::Piece),
                ParsedIngredient::new("biber", 1.0, Unit::Piece),
            ]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_line_with_decimal_comma() {
        let parsed = parse_ingredient_line("1,5 l mleka");
        assert_eq!(
            parsed.ingredients,
            vec![ParsedIngredient::new("mleko", 1.5, Unit::Liter)]
        );

        let parsed = parse_ingredient_line("0,5kg krompira, So");
        assert_eq!(
            parsed.ingredients,
            vec![
                ParsedIngredient::new("krompir", 0.5, Unit::Kilogram),
                ParsedIngredient::new("so", 1.0, Unit::Piece),
            ]
        );
    }

    #[test]
    fn test_parse_ingredient_lines_keeps_order() {
        let parsed = parse_ingredient_lines(&["2 jaja", "100 ml mleka", "so"]);
        let names: Vec<&str> = parsed
            .iter()
            .flat_map(|line| line.ingredients.iter().map(|i| i.name.as_str()))
            .collect();
        assert_eq!(names, vec!["jaje", "mleko", "so"]);
    }
}
