use chrono::NaiveDate;
use nutrition_ledger::catalog::{FoodCatalog, InMemoryCatalog};
use nutrition_ledger::entry_parser::EntryParser;
use nutrition_ledger::errors::{LedgerError, QuickAddError};
use nutrition_ledger::goals::Goals;
use nutrition_ledger::ledger::Ledger;
use nutrition_ledger::nutrition::FoodMacros;
use nutrition_ledger::tracker::{NutritionTracker, QuickAddOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn tracker() -> NutritionTracker {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_food("rice", FoodMacros::new(130.0, 2.7, 0.3, 28.0));
        catalog.insert_food("egg", FoodMacros::new(155.0, 13.0, 11.0, 1.0));
        catalog.insert_standard_unit("egg", 60.0);

        NutritionTracker::new(
            EntryParser::new(),
            catalog,
            Ledger::new(chrono_tz::Europe::Paris),
            Goals::new(2000.0, 100.0, 70.0, 250.0),
            3,
        )
    }

    /// Test logging a message appends only resolved foods
    #[test]
    fn test_log_text_partial_success() {
        let mut tracker = tracker();
        let outcome = tracker.log_text(date(10), "200g rice, 3 eggs, 50g unicornmeat");

        assert_eq!(outcome.declarations.len(), 3);
        assert_eq!(outcome.logged.len(), 2);
        assert_eq!(outcome.not_found, vec!["unicornmeat".to_string()]);
        assert!((outcome.totals.kcal - 539.0).abs() < EPSILON);
        assert!((outcome.remaining.kcal - 1461.0).abs() < EPSILON);
        assert!(!outcome.is_unrecognized());
    }

    /// Test a message nothing understands
    #[test]
    fn test_log_text_unrecognized() {
        let mut tracker = tracker();
        let outcome = tracker.log_text(date(10), "hello there");

        assert!(outcome.is_unrecognized());
        assert!(outcome.logged.is_empty());
        assert_eq!(outcome.totals, FoodMacros::ZERO);
    }

    /// Test quick logs go through the ledger with a manual label
    #[test]
    fn test_quick_add_logs_entry() {
        let mut tracker = tracker();
        let outcome = tracker.quick_add(date(10), "30g 150kcal 10p 5l 8g").unwrap();

        match outcome {
            QuickAddOutcome::Logged { entry, totals, .. } => {
                assert_eq!(entry.food_name, "manual entry (30g)");
                assert_eq!(entry.grams, 30.0);
                assert_eq!(totals, FoodMacros::new(150.0, 10.0, 5.0, 8.0));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        // Quick logs are undone like any other entry
        let (undone, remaining) = tracker.undo(date(10)).unwrap();
        assert_eq!(undone.food_name, "manual entry (30g)");
        assert_eq!(remaining.kcal, 2000.0);
    }

    /// Test catalog extension makes the food available to the parser
    #[test]
    fn test_quick_add_extends_catalog() {
        let mut tracker = tracker();

        let outcome = tracker.quick_add(date(10), "granola|450|10|15|60").unwrap();
        assert_eq!(
            outcome,
            QuickAddOutcome::CatalogExtended {
                name: "granola".to_string(),
                per_100g: FoodMacros::new(450.0, 10.0, 15.0, 60.0),
                replaced: false,
            }
        );
        assert!(tracker.ledger().day(date(10)).is_none());

        let logged = tracker.log_text(date(10), "50g granola");
        assert_eq!(logged.logged.len(), 1);
        assert!((logged.totals.kcal - 225.0).abs() < EPSILON);
        assert!(tracker.catalog().lookup_exact("granola").is_some());
    }

    /// Test malformed quick adds leave state untouched
    #[test]
    fn test_quick_add_error_has_no_effect() {
        let mut tracker = tracker();
        let result = tracker.quick_add(date(10), "granola|x|10|15|60");

        assert!(matches!(result, Err(QuickAddError::NonNumeric { .. })));
        assert!(tracker.catalog().lookup_exact("granola").is_none());
        assert!(tracker.ledger().day(date(10)).is_none());
    }

    /// Test undo on an empty day
    #[test]
    fn test_undo_empty_day() {
        let mut tracker = tracker();
        assert_eq!(
            tracker.undo(date(10)),
            Err(LedgerError::EmptyLedger { date: date(10) })
        );
    }

    /// Test the status snapshot of a day
    #[test]
    fn test_status() {
        let mut tracker = tracker();
        tracker.log_text(date(10), "200g rice");

        let status = tracker.status(date(10));
        assert_eq!(status.entries.len(), 1);
        assert!((status.totals.kcal - 260.0).abs() < EPSILON);
        assert!((status.progress.kcal - 13.0).abs() < EPSILON);
        assert!((status.remaining.protein - 94.6).abs() < EPSILON);
    }

    /// Test history lists recent days without creating them
    #[test]
    fn test_history_is_read_only() {
        let mut tracker = tracker();
        tracker.log_text(date(9), "100g rice");

        let history = tracker.history(date(10), 3);
        let dates: Vec<NaiveDate> = history.iter().map(|day| day.date).collect();
        assert_eq!(dates, vec![date(10), date(9), date(8)]);

        assert!(history[0].totals.is_none());
        assert!(history[1].totals.is_some());
        assert!(history[2].totals.is_none());
        assert_eq!(tracker.ledger().dates(), vec![date(9)]);
    }

    /// Test search returns per-100g values
    #[test]
    fn test_search() {
        let tracker = tracker();
        let results = tracker.search("ri", 8);
        assert_eq!(
            results,
            vec![("rice".to_string(), FoodMacros::new(130.0, 2.7, 0.3, 28.0))]
        );
        assert!(tracker.search("egg", 0).is_empty());
    }

    /// Test pruning uses the configured retention
    #[test]
    fn test_prune() {
        let mut tracker = tracker();
        tracker.log_text(date(5), "100g rice");
        tracker.log_text(date(8), "100g rice");

        let removed = tracker.prune(date(10));
        assert_eq!(removed, vec![date(5)]);
        assert_eq!(tracker.ledger().dates(), vec![date(8)]);
        assert_eq!(tracker.retention_days(), 3);
    }
}
