use chrono::{FixedOffset, NaiveDate, TimeZone};
use nutrition_ledger::bot::command_handlers::{command_reply, BotCommand};
use nutrition_ledger::bot::message_handler::food_message_reply;
use nutrition_ledger::bot::ui_builder::{format_history, format_reminder, format_status};
use nutrition_ledger::bot::BotState;
use nutrition_ledger::catalog::InMemoryCatalog;
use nutrition_ledger::config::ScheduleConfig;
use nutrition_ledger::goals::Goals;
use nutrition_ledger::ledger::Entry;
use nutrition_ledger::localization::{create_localization_manager, LocalizationManager};
use nutrition_ledger::nutrition::FoodMacros;
use nutrition_ledger::scheduler::{build_reminder, ReminderKind};
use nutrition_ledger::tracker::{DaySummary, NutritionTracker, StatusSnapshot};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> Arc<LocalizationManager> {
        create_localization_manager().expect("Failed to create localization manager")
    }

    fn setup_state() -> BotState {
        let catalog = InMemoryCatalog::embedded().expect("embedded catalog should load");
        BotState::new(
            NutritionTracker::with_catalog(catalog),
            setup_localization(),
            ScheduleConfig::default(),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    /// Test a food message is logged and summarized
    #[test]
    fn test_food_message_reply() {
        let state = setup_state();
        let reply = food_message_reply(&state, "200g rice, 50g unicornmeat", Some("en"));

        assert!(reply.starts_with("✅ Logged"));
        assert!(reply.contains("• 200g rice"));
        assert!(reply.contains("⚠️ Not found: unicornmeat"));
        assert!(reply.contains("Progress:"));

        let tracker = state.tracker.lock();
        let today = tracker.today();
        assert_eq!(tracker.ledger().day(today).unwrap().entries().len(), 1);
    }

    /// Test unrecognized messages get a hint in the user's language
    #[test]
    fn test_unrecognized_food_message() {
        let state = setup_state();
        let reply = food_message_reply(&state, "bonjour", Some("fr-FR"));
        assert!(reply.starts_with("❓ Je n'ai pas compris"));
    }

    /// Test undo through the command path
    #[test]
    fn test_undo_command() {
        let state = setup_state();

        let reply = command_reply(&state, BotCommand::Undo, Some("en"));
        assert_eq!(reply, "❌ No entry to undo today.");

        food_message_reply(&state, "3 eggs", None);
        let reply = command_reply(&state, BotCommand::Undo, Some("en"));
        assert!(reply.starts_with("↩️ Entry undone:"));
        assert!(reply.contains("180g egg"));
    }

    /// Test add then search through the command path
    #[test]
    fn test_add_and_search_commands() {
        let state = setup_state();

        let reply = command_reply(&state, BotCommand::Add("granola|450|10|15|60"), Some("en"));
        assert!(reply.starts_with("✅ granola added (100g)"));
        assert!(reply.contains("→ Use: granola 100g"));

        let reply = command_reply(&state, BotCommand::Search("granola"), Some("en"));
        assert!(reply.contains("• granola (100g)"));

        let reply = command_reply(&state, BotCommand::Add("granola|abc|10|15|60"), Some("en"));
        assert_eq!(reply, "❌ Values must be numbers.");

        let reply = command_reply(&state, BotCommand::Add(""), Some("en"));
        assert!(reply.starts_with("➕ Quick add"));

        let reply = command_reply(&state, BotCommand::Search("zzz"), Some("fr"));
        assert_eq!(reply, "❌ Aucun aliment trouvé pour 'zzz'");
    }

    /// Test quick log through the command path
    #[test]
    fn test_quick_log_command() {
        let state = setup_state();
        let reply = command_reply(&state, BotCommand::Add("30g 150kcal 10p 5l 8g"), Some("en"));

        assert!(reply.starts_with("✅ Quick add (30g)"));
        assert!(reply.contains("🔥150 | 🥩10g | 🧈5g | 🍚8g"));
    }

    /// Test welcome and help messages mention goals and commands
    #[test]
    fn test_start_and_help() {
        let state = setup_state();

        let welcome = command_reply(&state, BotCommand::Start, Some("en"));
        assert!(welcome.contains("🔥 3100 kcal | 🥩 160g protein"));
        assert!(welcome.contains("/status"));

        let help = command_reply(&state, BotCommand::Help, Some("fr"));
        assert!(help.starts_with("📖 Aide"));
        assert!(help.contains("Rappels : 12h, 18h, 23h"));

        let list = command_reply(&state, BotCommand::List, None);
        assert!(list.contains("rice"));
    }

    /// Test the status layout
    #[test]
    fn test_status_format() {
        let localization = setup_localization();
        let goals = Goals::new(2000.0, 100.0, 50.0, 200.0);
        let totals = FoodMacros::new(1000.0, 100.0, 60.0, 0.0);

        let status = format_status(&totals, &goals, &localization, Some("en"));

        assert!(status.starts_with("📊 Today's status"));
        assert!(status.contains("🔥 Kcal: 1000/2000\n    ●●●●○○○○ 50% (-1000)"));
        assert!(status.contains("🥩 Prot: 100/100g\n    ●●●●●●●● 100% (✓)"));
        assert!(status.contains("🧈 Fat: 60/50g\n    ●●●●●●●● 100% (+10g⚠️)"));
        assert!(status.contains("🍚 Carb: 0/200g\n    ○○○○○○○○ 0% (-200g)"));
    }

    /// Test history labels and verdicts
    #[test]
    fn test_history_format() {
        let localization = setup_localization();
        let goals = Goals::new(2000.0, 100.0, 50.0, 200.0);
        let days = vec![
            DaySummary {
                date: date(10),
                totals: Some(FoodMacros::new(1800.0, 95.0, 40.0, 150.0)),
            },
            DaySummary {
                date: date(9),
                totals: Some(FoodMacros::new(1500.0, 75.0, 40.0, 150.0)),
            },
            DaySummary {
                date: date(8),
                totals: None,
            },
        ];

        let history = format_history(&days, date(10), &goals, &localization, Some("en"));

        assert!(history.contains("🟢 Today 10/05\n   1800kcal | 95p | 40l | 150g"));
        assert!(history.contains("🟡 Yesterday 09/05"));
        assert!(history.contains("⚪ Wed 08/05 - No data"));

        let french = format_history(&days, date(10), &goals, &localization, Some("fr"));
        assert!(french.contains("🟢 Auj. 10/05"));
        assert!(french.contains("⚪ Mer 08/05 - Aucune donnée"));
        assert!(!french.contains("Wed"));
    }

    /// Test the recap lists entries and ends with a verdict
    #[test]
    fn test_recap_format() {
        let localization = setup_localization();
        let goals = Goals::new(2000.0, 100.0, 50.0, 200.0);
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let snapshot = StatusSnapshot {
            date: date(10),
            totals: FoodMacros::new(500.0, 40.0, 10.0, 50.0),
            remaining: Default::default(),
            progress: Default::default(),
            entries: vec![Entry {
                food_name: "chicken".to_string(),
                grams: 200.0,
                macros: FoodMacros::new(500.0, 40.0, 10.0, 50.0),
                timestamp: offset.with_ymd_and_hms(2024, 5, 10, 12, 15, 0).unwrap(),
            }],
        };

        let recap = format_reminder(ReminderKind::Recap, &snapshot, &goals, &localization, Some("en"));
        assert!(recap.starts_with("🌙 DAILY RECAP"));
        assert!(recap.contains("   • 12:15 - 200g chicken"));
        assert!(recap.ends_with("⚠️ Watch out: only 40% of your protein. Adjust tomorrow!"));

        let midday = format_reminder(ReminderKind::Midday, &snapshot, &goals, &localization, Some("fr"));
        assert!(midday.starts_with("🕛 POINT MIDI"));
        assert!(!midday.contains("12:15"));
    }

    /// Test reminders are built from the shared tracker
    #[test]
    fn test_build_reminder() {
        let state = setup_state();
        let reminder = build_reminder(&state, ReminderKind::Evening, None);
        assert!(reminder.starts_with("🕕 EVENING CHECK"));
        assert!(reminder.contains("0/3100"));
    }
}
