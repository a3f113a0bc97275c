//! # Measurement Patterns Module
//!
//! This module contains regex patterns and constants used for quantity detection.

use lazy_static::lazy_static;
use regex::Regex;

// Leading quantity with an optional unit word glued to it or separated by spaces,
// then the rest of the clause. Decimal separator may be '.' or ','.
pub const LEADING_QUANTITY_PATTERN: &str =
    r"^(?P<qty>\d+(?:[.,]\d+)?)\s*(?P<unit>[A-Za-zčćžšđČĆŽŠĐ]+)?\s+(?P<rest>.+)$";

// An innermost parenthetical group; nested groups are removed by repeating the match
pub const PARENTHETICAL_PATTERN: &str = r"\([^()]*\)";

// Lazy static regexes to avoid recompilation
lazy_static! {
    pub static ref LEADING_QUANTITY_REGEX: Regex = Regex::new(LEADING_QUANTITY_PATTERN)
        .expect("Leading quantity pattern should be valid");
    pub static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(PARENTHETICAL_PATTERN).expect("Parenthetical pattern should be valid");
}
