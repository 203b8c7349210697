use nutrition_ledger::catalog::{FoodCatalog, InMemoryCatalog};
use nutrition_ledger::errors::AppError;
use nutrition_ledger::nutrition::FoodMacros;
use std::io::Write;
use tempfile::NamedTempFile;

#[cfg(test)]
mod tests {
    use super::*;

    fn write_catalog(json: &serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(json.to_string().as_bytes())
            .expect("Failed to write catalog");
        file
    }

    /// Test loading a catalog file from disk
    #[test]
    fn test_load_from_path() {
        let file = write_catalog(&serde_json::json!({
            "foods": [
                { "name": "Rice", "kcal": 130, "protein": 2.7, "fat": 0.3, "carb": 28 },
                { "name": "egg", "kcal": 155, "protein": 13, "fat": 11, "carb": 1 }
            ],
            "standard_units": [
                { "name": "egg", "grams": 60 }
            ]
        }));

        let catalog = InMemoryCatalog::load_from_path(file.path()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.lookup_exact("rice"),
            Some(FoodMacros::new(130.0, 2.7, 0.3, 28.0))
        );
        assert_eq!(catalog.lookup_exact("  RICE "), catalog.lookup_exact("rice"));
        assert_eq!(catalog.lookup_unit_weight("egg"), Some(60.0));
        assert_eq!(catalog.lookup_unit_weight("rice"), None);
    }

    /// Test standard units are optional in the file
    #[test]
    fn test_standard_units_default_to_empty() {
        let file = write_catalog(&serde_json::json!({
            "foods": [
                { "name": "rice", "kcal": 130, "protein": 2.7, "fat": 0.3, "carb": 28 }
            ]
        }));

        let catalog = InMemoryCatalog::load_from_path(file.path()).unwrap();
        assert!(catalog.standard_units().is_empty());
    }

    /// Test invalid catalog files are rejected
    #[test]
    fn test_invalid_catalog_files() {
        let negative = write_catalog(&serde_json::json!({
            "foods": [
                { "name": "rice", "kcal": -130, "protein": 2.7, "fat": 0.3, "carb": 28 }
            ]
        }));
        assert!(matches!(
            InMemoryCatalog::load_from_path(negative.path()),
            Err(AppError::Catalog(_))
        ));

        let mut garbage = NamedTempFile::new().unwrap();
        garbage.write_all(b"not json").unwrap();
        assert!(matches!(
            InMemoryCatalog::load_from_path(garbage.path()),
            Err(AppError::Catalog(_))
        ));

        assert!(InMemoryCatalog::load_from_path("/nonexistent/foods.json").is_err());
    }

    /// Test search ranks exact, then prefix, then substring matches
    #[test]
    fn test_search_ranking() {
        let mut catalog = InMemoryCatalog::new();
        for name in ["chicken breast", "chicken", "roast chicken", "rice"] {
            catalog.insert_food(name, FoodMacros::ZERO);
        }

        assert_eq!(
            catalog.search("Chicken"),
            vec!["chicken", "chicken breast", "roast chicken"]
        );
        assert!(catalog.search("tofu").is_empty());
        assert!(catalog.search("  ").is_empty());
    }

    /// Test extending the catalog replaces existing foods
    #[test]
    fn test_insert_food_replaces() {
        let mut catalog = InMemoryCatalog::new();
        assert_eq!(catalog.insert_food("Granola", FoodMacros::new(450.0, 10.0, 15.0, 60.0)), None);

        let previous = catalog.insert_food("granola", FoodMacros::new(400.0, 9.0, 12.0, 62.0));
        assert_eq!(previous, Some(FoodMacros::new(450.0, 10.0, 15.0, 60.0)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.names(), vec!["granola"]);
    }

    /// Test the embedded catalog is bilingual and has unit weights
    #[test]
    fn test_embedded_catalog() {
        let catalog = InMemoryCatalog::embedded().unwrap();

        assert!(catalog.lookup_exact("rice").is_some());
        assert_eq!(catalog.lookup_exact("riz"), catalog.lookup_exact("rice"));
        assert_eq!(catalog.lookup_unit_weight("egg"), Some(60.0));
        assert_eq!(catalog.lookup_unit_weight("verre"), Some(200.0));
        assert!(!catalog.is_empty());
    }
}
