//! # Quick-Add Grammars
//!
//! Two fixed-format shortcuts that bypass the food catalog:
//!
//! - `"30g 150kcal 10p 5l 8g"`: log the given macros directly (grams optional,
//!   defaulting to 100)
//! - `"name|kcal|protein|fat|carb"`: add a food (per 100 g) to the catalog

use crate::errors::QuickAddError;
use crate::nutrition::{FoodMacros, MacroKind};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Grams assumed when a quick log does not state a weight
pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;

const CATALOG_FIELDS: usize = 5;

lazy_static! {
    static ref QUICK_LOG_WITH_GRAMS: Regex = Regex::new(
        r"^(?P<grams>\d+(?:[.,]\d+)?)\s*(?:grammes?|gr|g)\s+(?P<kcal>\d+(?:[.,]\d+)?)\s*kcal\s+(?P<protein>\d+(?:[.,]\d+)?)\s*p\s+(?P<fat>\d+(?:[.,]\d+)?)\s*l\s+(?P<carb>\d+(?:[.,]\d+)?)\s*g"
    )
    .expect("Quick log pattern should be valid");
    static ref QUICK_LOG: Regex = Regex::new(
        r"^(?P<kcal>\d+(?:[.,]\d+)?)\s*kcal\s+(?P<protein>\d+(?:[.,]\d+)?)\s*p\s+(?P<fat>\d+(?:[.,]\d+)?)\s*l\s+(?P<carb>\d+(?:[.,]\d+)?)\s*g"
    )
    .expect("Quick log pattern should be valid");
}

/// A successfully parsed quick-add command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuickAdd {
    /// Log `macros` (absolute amounts) for a portion of `grams`
    LogMacros { grams: f64, macros: FoodMacros },
    /// Add or replace a catalog food, values per 100 g
    ExtendCatalog { name: String, per_100g: FoodMacros },
}

/// Ledger label for a quick log
pub fn manual_entry_label(grams: f64) -> String {
    format!("manual entry ({:.0}g)", grams)
}

fn field_name(kind: MacroKind) -> &'static str {
    match kind {
        MacroKind::Kcal => "kcal",
        MacroKind::Protein => "protein",
        MacroKind::Fat => "fat",
        MacroKind::Carb => "carb",
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64, QuickAddError> {
    let trimmed = text.trim();
    let value = trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| QuickAddError::NonNumeric {
            field,
            value: trimmed.to_string(),
        })?;

    if !value.is_finite() || value < 0.0 {
        return Err(QuickAddError::Negative { field, value });
    }
    Ok(value)
}

fn macros_from_captures(captures: &Captures<'_>) -> Result<FoodMacros, QuickAddError> {
    let mut values = [0.0; 4];
    for (slot, kind) in values.iter_mut().zip(MacroKind::ALL) {
        let field = field_name(kind);
        let text = captures.name(field).map(|m| m.as_str()).unwrap_or_default();
        *slot = parse_number(field, text)?;
    }
    Ok(FoodMacros::new(values[0], values[1], values[2], values[3]))
}

fn parse_catalog_extension(text: &str) -> Result<QuickAdd, QuickAddError> {
    let parts: Vec<&str> = text.split('|').collect();
    if parts.len() != CATALOG_FIELDS {
        return Err(QuickAddError::WrongFieldCount {
            expected: CATALOG_FIELDS,
            found: parts.len(),
        });
    }

    let name = parts[0].trim().to_lowercase();
    if name.is_empty() {
        return Err(QuickAddError::EmptyName);
    }

    let mut values = [0.0; 4];
    for ((slot, kind), raw) in values.iter_mut().zip(MacroKind::ALL).zip(&parts[1..]) {
        *slot = parse_number(field_name(kind), raw)?;
    }

    Ok(QuickAdd::ExtendCatalog {
        name,
        per_100g: FoodMacros::new(values[0], values[1], values[2], values[3]),
    })
}

/// Parse the text following the `/add` command
pub fn parse_quick_add(text: &str) -> Result<QuickAdd, QuickAddError> {
    let text = text.trim();

    if text.contains('|') {
        return parse_catalog_extension(text);
    }

    let normalized = text.to_lowercase();
    let parsed = if let Some(captures) = QUICK_LOG_WITH_GRAMS.captures(&normalized) {
        let grams_text = captures.name("grams").map(|m| m.as_str()).unwrap_or_default();
        QuickAdd::LogMacros {
            grams: parse_number("grams", grams_text)?,
            macros: macros_from_captures(&captures)?,
        }
    } else if let Some(captures) = QUICK_LOG.captures(&normalized) {
        QuickAdd::LogMacros {
            grams: DEFAULT_PORTION_GRAMS,
            macros: macros_from_captures(&captures)?,
        }
    } else {
        return Err(QuickAddError::UnrecognizedFormat(text.to_string()));
    };

    debug!(?parsed, "Quick-add parsed");
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_log_with_grams() {
        let parsed = parse_quick_add("30g 150kcal 10p 5l 8g").unwrap();
        assert_eq!(
            parsed,
            QuickAdd::LogMacros {
                grams: 30.0,
                macros: FoodMacros::new(150.0, 10.0, 5.0, 8.0),
            }
        );
    }

    #[test]
    fn test_quick_log_defaults_to_100g() {
        let parsed = parse_quick_add("150kcal 10p 5l 8g").unwrap();
        assert_eq!(
            parsed,
            QuickAdd::LogMacros {
                grams: 100.0,
                macros: FoodMacros::new(150.0, 10.0, 5.0, 8.0),
            }
        );
    }

    #[test]
    fn test_quick_log_decimal_comma_and_spacing() {
        let parsed = parse_quick_add("45 gr 210,5 kcal 12,5 p 7 l 20 g").unwrap();
        assert_eq!(
            parsed,
            QuickAdd::LogMacros {
                grams: 45.0,
                macros: FoodMacros::new(210.5, 12.5, 7.0, 20.0),
            }
        );
    }

    #[test]
    fn test_manual_entry_label() {
        assert_eq!(manual_entry_label(30.0), "manual entry (30g)");
    }
}
