//! # Entry Parser
//!
//! Turns one free-text message such as `"200g rice, 3 eggs and 1 yogurt"` into
//! an ordered list of [`ParsedDeclaration`]s.
//!
//! ## Features
//!
//! - Segmentation on commas, newlines and the conjunctions `and` / `et`
//! - Two item grammars tried in order: prefix (`200g de riz`) then suffix (`riz 200g`)
//! - Metric unit conversion (`kg`, `l`, `cl`, `ml`, `g`)
//! - **Bare counts**: `"3 eggs"` uses the standard unit weight of an egg
//! - `.` and `,` decimal separators (`"1,5l milk"` == `"1.5l milk"`)
//!
//! ## Processing Flow
//!
//! ```text
//! text -> lowercase/trim -> segments
//! for each segment:
//!   first grammar that matches -> (quantity, unit, food name)
//!   no grammar matches          -> logged and dropped
//!   resolve catalog name (exact, singular, after connector)
//!   resolve grams (unit factor, or bare count x standard unit weight)
//!   scale per-100g macros, or mark the food unresolved
//! ```
//!
//! The parser holds no state: the same text against the same catalog always
//! yields the same declarations.

use crate::catalog::FoodCatalog;
use crate::errors::{AppError, AppResult};
use crate::nutrition::FoodMacros;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

lazy_static! {
    static ref SEGMENT_SEPARATOR: Regex =
        Regex::new(r"\n|\b(?:and|et)\b").expect("Segment separator pattern should be valid");
    static ref PREFIX_PATTERN: Regex = Regex::new(
        r"^(?:(?P<quantity>\d+(?:[.,]\d+)?)|(?P<article>an?|une?)\s)\s*(?:(?P<unit>kg|grammes|gramme|grams|gram|gr|g|ml|cl|l)\b)?\s*(?:(?:de|of)\s+|d['’])?(?P<food>\p{L}.*)$"
    )
    .expect("Prefix item pattern should be valid");
    static ref SUFFIX_PATTERN: Regex = Regex::new(
        r"^(?P<food>\p{L}.*?)\s+(?P<quantity>\d+(?:[.,]\d+)?)\s*(?P<unit>kg|grammes|gramme|grams|gram|gr|g|ml|cl|l)?$"
    )
    .expect("Suffix item pattern should be valid");
    static ref CONNECTOR: Regex =
        Regex::new(r"\b(?:of|de)\s+|\bd['’]").expect("Connector pattern should be valid");
}

/// Unit written after a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Kilogram,
    Litre,
    Centilitre,
    Millilitre,
    Gram,
    /// No unit written: either grams or a count of discrete units
    Unspecified,
}

impl Unit {
    /// Map a unit token from the grammars to a unit
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("kg") => Unit::Kilogram,
            Some("l") => Unit::Litre,
            Some("cl") => Unit::Centilitre,
            Some("ml") => Unit::Millilitre,
            Some("g" | "gr" | "gram" | "grams" | "gramme" | "grammes") => Unit::Gram,
            _ => Unit::Unspecified,
        }
    }

    /// Grams per one of this unit (liquids count 1 ml as 1 g)
    pub fn grams_factor(self) -> f64 {
        match self {
            Unit::Kilogram | Unit::Litre => 1000.0,
            Unit::Centilitre => 10.0,
            Unit::Millilitre | Unit::Gram | Unit::Unspecified => 1.0,
        }
    }

    fn is_token(text: &str) -> bool {
        !matches!(Unit::from_token(Some(text)), Unit::Unspecified)
    }
}

/// One item extracted by a grammar, before any catalog lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub quantity: f64,
    pub unit: Unit,
    pub food_name: String,
}

/// An item grammar. Grammars are tried in order; the first match wins.
pub trait GrammarMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn match_item(&self, item: &str) -> Option<RawItem>;
}

fn parse_quantity(text: &str) -> Option<f64> {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|quantity| quantity.is_finite())
}

/// `quantity [unit] [connector] food`, e.g. `"200g de riz"`, `"a glass of milk"`
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixGrammar;

impl GrammarMatcher for PrefixGrammar {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn match_item(&self, item: &str) -> Option<RawItem> {
        let captures = PREFIX_PATTERN.captures(item)?;

        let quantity = match captures.name("quantity") {
            Some(quantity) => parse_quantity(quantity.as_str())?,
            None => 1.0, // leading article
        };
        let food_name = captures.name("food")?.as_str().trim().to_string();

        // "200g" alone would otherwise read as 200 of a food called "g"
        if food_name.is_empty() || Unit::is_token(&food_name) {
            return None;
        }

        Some(RawItem {
            quantity,
            unit: Unit::from_token(captures.name("unit").map(|m| m.as_str())),
            food_name,
        })
    }
}

/// `food quantity [unit]`, e.g. `"riz 200g"`
#[derive(Debug, Default, Clone, Copy)]
pub struct SuffixGrammar;

impl GrammarMatcher for SuffixGrammar {
    fn name(&self) -> &'static str {
        "suffix"
    }

    fn match_item(&self, item: &str) -> Option<RawItem> {
        let captures = SUFFIX_PATTERN.captures(item)?;

        Some(RawItem {
            quantity: parse_quantity(captures.name("quantity")?.as_str())?,
            unit: Unit::from_token(captures.name("unit").map(|m| m.as_str())),
            food_name: captures.name("food")?.as_str().trim().to_string(),
        })
    }
}

/// Macros of a declaration: found in the catalog or not
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MacroResolution {
    /// Macros scaled to the declared grams
    Resolved(FoodMacros),
    /// The food name has no catalog match
    Unresolved,
}

/// One food mention parsed from a message, before it is committed to the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDeclaration {
    pub food_name: String,
    pub grams: f64,
    pub macros: MacroResolution,
}

impl ParsedDeclaration {
    pub fn resolved_macros(&self) -> Option<FoodMacros> {
        match self.macros {
            MacroResolution::Resolved(macros) => Some(macros),
            MacroResolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_macros().is_some()
    }
}

/// Configuration options for entry parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Unit-less quantities up to this value are read as a count of units
    pub bare_count_threshold: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            bare_count_threshold: 20.0,
        }
    }
}

impl ParserConfig {
    /// Validate parser configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if !self.bare_count_threshold.is_finite() || self.bare_count_threshold < 0.0 {
            return Err(AppError::Config(
                "bare_count_threshold must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a message into normalized item segments.
///
/// A comma between two digits is a decimal separator and does not split.
pub fn segment(text: &str) -> Vec<String> {
    let text = text.to_lowercase();

    SEGMENT_SEPARATOR
        .split(text.trim())
        .flat_map(split_outside_decimals)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_outside_decimals(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if ch != ',' {
            continue;
        }
        let prev_is_digit = text[..i]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        let next_is_digit = text[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
        if !(prev_is_digit && next_is_digit) {
            parts.push(&text[start..i]);
            start = i + 1;
        }
    }
    parts.push(&text[start..]);

    parts
}

fn singular_forms(name: &str) -> Vec<String> {
    let mut forms = Vec::new();
    if let Some(stem) = name.strip_suffix('s').or_else(|| name.strip_suffix('x')) {
        forms.push(stem.to_string());
    }
    if let Some(stem) = name.strip_suffix("es") {
        forms.push(stem.to_string());
    }
    forms
}

/// Catalog names to try for an extracted food name, in priority order
fn name_candidates(food_name: &str) -> Vec<String> {
    let mut candidates = vec![food_name.to_string()];
    candidates.extend(singular_forms(food_name));

    if let Some(connector) = CONNECTOR.find_iter(food_name).last() {
        let tail = food_name[connector.end()..].trim();
        if !tail.is_empty() {
            candidates.push(tail.to_string());
            candidates.extend(singular_forms(tail));
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Free-text food entry parser
pub struct EntryParser {
    grammars: Vec<Box<dyn GrammarMatcher>>,
    config: ParserConfig,
}

impl Default for EntryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryParser {
    /// Parser with the prefix grammar tried before the suffix grammar
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_grammars(vec![Box::new(PrefixGrammar), Box::new(SuffixGrammar)], config)
    }

    /// Parser with an explicit, ordered grammar list
    pub fn with_grammars(grammars: Vec<Box<dyn GrammarMatcher>>, config: ParserConfig) -> Self {
        Self { grammars, config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a message into declarations, in order of appearance.
    ///
    /// Segments no grammar understands are logged and dropped; foods missing
    /// from the catalog are returned as [`MacroResolution::Unresolved`].
    pub fn parse<C: FoodCatalog + ?Sized>(&self, text: &str, catalog: &C) -> Vec<ParsedDeclaration> {
        let segments = segment(text);
        debug!(segments = segments.len(), "Parsing food entry message");

        let mut declarations = Vec::with_capacity(segments.len());
        for item in &segments {
            let Some(raw) = self.match_item(item) else {
                warn!(segment = %item, "Unrecognized food entry pattern");
                crate::observability::record_segment_outcome("unparseable");
                continue;
            };

            let declaration = self.resolve(raw, catalog);
            // Declared weights are strictly positive and finite
            if !(declaration.grams.is_finite() && declaration.grams > 0.0) {
                warn!(segment = %item, grams = declaration.grams, "Food entry weight out of range");
                crate::observability::record_segment_outcome("unparseable");
                continue;
            }

            crate::observability::record_segment_outcome(if declaration.is_resolved() {
                "resolved"
            } else {
                "unresolved"
            });
            declarations.push(declaration);
        }

        declarations
    }

    /// Run the grammars in order on one segment
    pub fn match_item(&self, item: &str) -> Option<RawItem> {
        self.grammars.iter().find_map(|grammar| {
            let raw = grammar.match_item(item)?;
            trace!(grammar = grammar.name(), segment = %item, ?raw, "Segment matched");
            Some(raw)
        })
    }

    fn resolve<C: FoodCatalog + ?Sized>(&self, raw: RawItem, catalog: &C) -> ParsedDeclaration {
        let found = name_candidates(&raw.food_name)
            .into_iter()
            .find_map(|name| catalog.lookup_exact(&name).map(|per_100g| (name, per_100g)));

        let grams = self.resolve_grams(&raw, found.as_ref().map(|(name, _)| name.as_str()), catalog);

        match found {
            Some((food_name, per_100g)) => ParsedDeclaration {
                food_name,
                grams,
                macros: MacroResolution::Resolved(per_100g.scaled_to(grams)),
            },
            None => ParsedDeclaration {
                food_name: raw.food_name,
                grams,
                macros: MacroResolution::Unresolved,
            },
        }
    }

    fn resolve_grams<C: FoodCatalog + ?Sized>(
        &self,
        raw: &RawItem,
        resolved_name: Option<&str>,
        catalog: &C,
    ) -> f64 {
        if raw.unit != Unit::Unspecified || raw.quantity > self.config.bare_count_threshold {
            return raw.quantity * raw.unit.grams_factor();
        }

        let unit_weight = catalog
            .standard_units()
            .iter()
            .find(|unit| raw.food_name.contains(&unit.name) || unit.name.contains(&raw.food_name))
            .map(|unit| unit.grams)
            .or_else(|| resolved_name.and_then(|name| catalog.lookup_unit_weight(name)));

        match unit_weight {
            Some(grams_per_unit) => raw.quantity * grams_per_unit,
            // No known unit: the bare number is grams
            None => raw.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_splits_on_separators() {
        assert_eq!(
            segment("200g Rice, 2 eggs and 1 yogurt\n50g oats"),
            vec!["200g rice", "2 eggs", "1 yogurt", "50g oats"]
        );
    }

    #[test]
    fn test_segment_keeps_decimal_commas() {
        assert_eq!(segment("1,5l milk, 2 eggs"), vec!["1,5l milk", "2 eggs"]);
    }

    #[test]
    fn test_segment_ignores_conjunction_inside_words() {
        assert_eq!(segment("200g sandwich"), vec!["200g sandwich"]);
        assert_eq!(segment("pâtes et riz 100g"), vec!["pâtes", "riz 100g"]);
    }

    #[test]
    fn test_prefix_grammar() {
        let raw = PrefixGrammar.match_item("200 g de riz").unwrap();
        assert_eq!(raw.quantity, 200.0);
        assert_eq!(raw.unit, Unit::Gram);
        assert_eq!(raw.food_name, "riz");

        let raw = PrefixGrammar.match_item("a glass of milk").unwrap();
        assert_eq!(raw.quantity, 1.0);
        assert_eq!(raw.unit, Unit::Unspecified);
        assert_eq!(raw.food_name, "glass of milk");
    }

    #[test]
    fn test_unit_needs_word_boundary() {
        let raw = PrefixGrammar.match_item("1 lait").unwrap();
        assert_eq!(raw.unit, Unit::Unspecified);
        assert_eq!(raw.food_name, "lait");

        let raw = PrefixGrammar.match_item("200gr pasta").unwrap();
        assert_eq!(raw.unit, Unit::Gram);
        assert_eq!(raw.food_name, "pasta");
    }

    #[test]
    fn test_prefix_rejects_unit_only() {
        assert!(PrefixGrammar.match_item("200g").is_none());
        assert!(PrefixGrammar.match_item("1.5").is_none());
    }

    #[test]
    fn test_suffix_grammar() {
        let raw = SuffixGrammar.match_item("chicken breast 1,5kg").unwrap();
        assert_eq!(raw.quantity, 1.5);
        assert_eq!(raw.unit, Unit::Kilogram);
        assert_eq!(raw.food_name, "chicken breast");
        assert!(SuffixGrammar.match_item("200g rice").is_none());
    }

    #[test]
    fn test_name_candidates_order() {
        assert_eq!(
            name_candidates("glass of eggs"),
            vec!["glass of eggs", "glass of egg", "eggs", "egg"]
        );
        assert_eq!(name_candidates("tomatoes"), vec!["tomatoes", "tomatoe", "tomato"]);
        assert_eq!(name_candidates("verre d'eau"), vec!["verre d'eau", "eau"]);
        assert_eq!(name_candidates("verre d’eau"), vec!["verre d’eau", "eau"]);
    }

    #[test]
    fn test_unit_factors() {
        assert_eq!(Unit::from_token(Some("kg")).grams_factor(), 1000.0);
        assert_eq!(Unit::from_token(Some("l")).grams_factor(), 1000.0);
        assert_eq!(Unit::from_token(Some("cl")).grams_factor(), 10.0);
        assert_eq!(Unit::from_token(Some("ml")).grams_factor(), 1.0);
        assert_eq!(Unit::from_token(Some("grammes")), Unit::Gram);
        assert_eq!(Unit::from_token(None), Unit::Unspecified);
    }
}
