//! # Text Processing Module
//!
//! This module provides the low-level text utilities used by the ingredient
//! parser: normalization of free-text ingredient names and segmentation of an
//! ingredient line into comma-separated clauses.
//!
//! ## Features
//!
//! - Lowercasing with parentheses turned into spaces
//! - Whitespace collapsing and trimming
//! - Comma segmentation that keeps the author's ordering

use log::trace;

/// Normalize a piece of ingredient text
///
/// Lowercases the text, replaces `(` and `)` with spaces, collapses runs of
/// whitespace into a single space and trims the ends. Empty input yields an
/// empty string. Applying the function twice gives the same result as
/// applying it once.
///
/// # Examples
///
/// ```rust
/// use sastojci::text_processing::normalize_text;
///
/// assert_eq!(normalize_text("  Crni   Luk (sitno) "), "crni luk sitno");
/// assert_eq!(normalize_text(""), "");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let replaced: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c == '(' || c == ')' { ' ' } else { c })
        .collect();

    let normalized = replaced.split_whitespace().collect::<Vec<&str>>().join(" ");
    trace!("Normalized text: '{}' -> '{}'", raw, normalized);
    normalized
}

/// Split an ingredient line into its comma-separated clauses
///
/// Each piece is trimmed and empty pieces are dropped. The order of the
/// clauses is the order in which the recipe author wrote them. A comma with
/// a digit on both sides is a decimal separator and does not split.
///
/// # Examples
///
/// ```rust
/// use sastojci::text_processing::split_clauses;
///
/// assert_eq!(split_clauses("So, biber"), vec!["So", "biber"]);
/// assert_eq!(split_clauses("2 jaja"), vec!["2 jaja"]);
/// assert_eq!(split_clauses("1,5 l mleka, so"), vec!["1,5 l mleka", "so"]);
/// assert!(split_clauses(" , ,").is_empty());
/// ```
pub fn split_clauses(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut clauses = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let decimal_comma = c == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|next| next.is_ascii_digit());

        if c == ',' && !decimal_comma {
            push_clause(&mut clauses, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_clause(&mut clauses, &current);

    trace!("Split line '{}' into {} clause(s)", line, clauses.len());
    clauses
}

fn push_clause(clauses: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        clauses.push(piece.to_string());
    }
}
