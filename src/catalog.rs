//! # Food Catalog
//!
//! Maps food names to per-100g macro values and to the gram weight of one
//! standard unit (one egg, one glass, ...). The parser only reads from it;
//! the catalog-extension grammar is the only writer.
//!
//! The catalog is loaded from JSON. Lookup order for the file:
//! `FOOD_CATALOG_PATH`, then the usual deployment paths, then the catalog
//! embedded in the binary.

use crate::errors::{AppError, AppResult};
use crate::nutrition::FoodMacros;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const EMBEDDED_CATALOG: &str = include_str!("../config/foods.json");

/// Read access to a food database
pub trait FoodCatalog {
    /// Per-100g macros for an exact (normalized) food name
    fn lookup_exact(&self, name: &str) -> Option<FoodMacros>;

    /// Gram weight of one standard unit of the named food
    fn lookup_unit_weight(&self, name: &str) -> Option<f64>;

    /// Names matching the query, best matches first
    fn search(&self, query: &str) -> Vec<String>;

    /// Known standard units, in declaration order
    fn standard_units(&self) -> &[StandardUnit];
}

/// One food record of the catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    #[serde(flatten)]
    pub per_100g: FoodMacros,
}

/// Gram weight of one discrete unit (e.g. "egg" -> 60 g)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardUnit {
    pub name: String,
    pub grams: f64,
}

/// Catalog file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub foods: Vec<FoodRecord>,
    #[serde(default)]
    pub standard_units: Vec<StandardUnit>,
}

impl CatalogConfig {
    /// Validate catalog contents
    pub fn validate(&self) -> AppResult<()> {
        for (i, food) in self.foods.iter().enumerate() {
            if food.name.trim().is_empty() {
                return Err(AppError::Catalog(format!("foods[{}] has an empty name", i)));
            }
            if !food.per_100g.is_valid() {
                return Err(AppError::Catalog(format!(
                    "foods[{}] '{}' has negative or non-finite macros",
                    i, food.name
                )));
            }
        }

        for (i, unit) in self.standard_units.iter().enumerate() {
            if unit.name.trim().is_empty() {
                return Err(AppError::Catalog(format!(
                    "standard_units[{}] has an empty name",
                    i
                )));
            }
            if !unit.grams.is_finite() || unit.grams <= 0.0 {
                return Err(AppError::Catalog(format!(
                    "standard_units[{}] '{}' must weigh more than 0 g",
                    i, unit.name
                )));
            }
        }

        Ok(())
    }
}

/// Normalize a food name for lookups
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// In-memory food catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    foods: HashMap<String, FoodMacros>,
    standard_units: Vec<StandardUnit>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from validated configuration
    pub fn from_config(config: CatalogConfig) -> AppResult<Self> {
        config.validate()?;

        let mut catalog = Self::new();
        for food in config.foods {
            catalog.insert_food(&food.name, food.per_100g);
        }
        for unit in config.standard_units {
            catalog.insert_standard_unit(&unit.name, unit.grams);
        }

        debug!(
            foods = catalog.len(),
            standard_units = catalog.standard_units.len(),
            "Food catalog built"
        );
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Catalog(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: CatalogConfig = serde_json::from_str(&content).map_err(|e| {
            AppError::Catalog(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        Self::from_config(config)
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> AppResult<Self> {
        let config: CatalogConfig = serde_json::from_str(EMBEDDED_CATALOG)
            .map_err(|e| AppError::Catalog(format!("Embedded catalog is invalid: {}", e)))?;
        Self::from_config(config)
    }

    /// Add or replace a food, returning the previous values if any
    pub fn insert_food(&mut self, name: &str, per_100g: FoodMacros) -> Option<FoodMacros> {
        self.foods.insert(normalize_name(name), per_100g)
    }

    /// Add or replace a standard unit weight, keeping declaration order
    pub fn insert_standard_unit(&mut self, name: &str, grams: f64) {
        let name = normalize_name(name);
        match self.standard_units.iter_mut().find(|unit| unit.name == name) {
            Some(unit) => unit.grams = grams,
            None => self.standard_units.push(StandardUnit { name, grams }),
        }
    }

    /// All food names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.foods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

impl FoodCatalog for InMemoryCatalog {
    fn lookup_exact(&self, name: &str) -> Option<FoodMacros> {
        self.foods.get(&normalize_name(name)).copied()
    }

    fn lookup_unit_weight(&self, name: &str) -> Option<f64> {
        let name = normalize_name(name);
        self.standard_units
            .iter()
            .find(|unit| unit.name == name)
            .map(|unit| unit.grams)
    }

    fn search(&self, query: &str) -> Vec<String> {
        let query = normalize_name(query);
        if query.is_empty() {
            return Vec::new();
        }

        // Exact match first, then prefix matches, then any substring match
        let mut ranked: Vec<(u8, &String)> = self
            .foods
            .keys()
            .filter(|name| name.contains(&query))
            .map(|name| {
                let rank = if *name == query {
                    0
                } else if name.starts_with(&query) {
                    1
                } else {
                    2
                };
                (rank, name)
            })
            .collect();
        ranked.sort();

        ranked.into_iter().map(|(_, name)| name.clone()).collect()
    }

    fn standard_units(&self) -> &[StandardUnit] {
        &self.standard_units
    }
}

/// Load the catalog from the first location that holds a valid file
pub fn load_food_catalog() -> AppResult<InMemoryCatalog> {
    if let Ok(catalog_path) = std::env::var("FOOD_CATALOG_PATH") {
        info!("Loading food catalog from environment variable: {}", catalog_path);
        match InMemoryCatalog::load_from_path(&catalog_path) {
            Ok(catalog) => return Ok(catalog),
            Err(e) => warn!(
                "Failed to load food catalog from '{}': {}. Falling back to default paths.",
                catalog_path, e
            ),
        }
    }

    let possible_paths = [
        "/app/config/foods.json", // Docker path
        "config/foods.json",      // Local development path
        "../config/foods.json",   // Test path
    ];

    for catalog_path in &possible_paths {
        if !Path::new(catalog_path).exists() {
            continue;
        }
        match InMemoryCatalog::load_from_path(catalog_path) {
            Ok(catalog) => {
                info!(
                    "Successfully loaded food catalog from fallback path: {}",
                    catalog_path
                );
                return Ok(catalog);
            }
            Err(e) => {
                warn!(
                    "Failed to load food catalog at '{}': {}. Trying next path.",
                    catalog_path, e
                );
            }
        }
    }

    info!("No food catalog file found, using the embedded catalog");
    InMemoryCatalog::embedded()
}
