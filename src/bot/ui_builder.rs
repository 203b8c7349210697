//! UI Builder module for formatting bot messages
//!
//! Every function here is pure: it renders tracker results into plain-text
//! messages in the user's language and never touches shared state.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::ScheduleConfig;
use crate::errors::QuickAddError;
use crate::goals::{self, Goals};
use crate::ledger::Entry;
use crate::localization::{t_args_lang, t_lang, LocalizationManager};
use crate::nutrition::{FoodMacros, MacroBalance, MacroKind};
use crate::scheduler::ReminderKind;
use crate::tracker::{DaySummary, LogOutcome, QuickAddOutcome, StatusSnapshot};

/// Number of cells in a progress bar
pub const PROGRESS_BAR_CELLS: usize = 8;

/// Commands listed in welcome and help messages
const COMMAND_LIST: &str = "/status /history /add /undo /search /list /help";

pub fn macro_emoji(kind: MacroKind) -> &'static str {
    match kind {
        MacroKind::Kcal => "🔥",
        MacroKind::Protein => "🥩",
        MacroKind::Fat => "🧈",
        MacroKind::Carb => "🍚",
    }
}

fn macro_label_key(kind: MacroKind) -> &'static str {
    match kind {
        MacroKind::Kcal => "macro-kcal",
        MacroKind::Protein => "macro-protein",
        MacroKind::Fat => "macro-fat",
        MacroKind::Carb => "macro-carb",
    }
}

/// Compact bar such as `●●●●○○○○ 50%`, capped at 100%
pub fn create_progress_bar(current: f64, goal: f64) -> String {
    let pct = if goal > 0.0 {
        goals::percent_of(current, goal).max(0.0)
    } else {
        0.0
    };
    let cell = 100.0 / PROGRESS_BAR_CELLS as f64;
    let filled = ((pct / cell) as usize).min(PROGRESS_BAR_CELLS);

    format!(
        "{}{} {:.0}%",
        "●".repeat(filled),
        "○".repeat(PROGRESS_BAR_CELLS - filled),
        pct
    )
}

/// `-120g` while something is left, `+30g⚠️` past the goal, `✓` when exactly met
pub fn format_remaining(rest: f64, unit: &str) -> String {
    if rest > 0.0 {
        format!("-{:.0}{}", rest, unit)
    } else if rest < 0.0 {
        format!("+{:.0}{}⚠️", rest.abs(), unit)
    } else {
        "✓".to_string()
    }
}

/// Short form used under logged entries: `✓` once the goal is reached
fn format_remaining_compact(rest: f64, unit: &str) -> String {
    if rest > 0.0 {
        format!("-{:.0}{}", rest, unit)
    } else {
        "✓".to_string()
    }
}

/// One line of macro amounts, e.g. `🔥260 | 🥩5g | 🧈1g | 🍚56g`
pub fn format_macros_line(macros: &FoodMacros) -> String {
    MacroKind::ALL
        .iter()
        .map(|&kind| format!("{}{:.0}{}", macro_emoji(kind), macros.get(kind), kind.unit()))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Full per-macro status with goals and progress bars
pub fn format_status(
    totals: &FoodMacros,
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let remaining = goals::remaining(totals, goals);
    let mut msg = format!("{}\n\n", t_lang(localization, "status-title", language_code));

    for kind in MacroKind::ALL {
        let current = totals.get(kind);
        let goal = goals.get(kind);
        msg.push_str(&format!(
            "{} {}: {:.0}/{:.0}{}\n    {} ({})\n\n",
            macro_emoji(kind),
            t_lang(localization, macro_label_key(kind), language_code),
            current,
            goal,
            kind.unit(),
            create_progress_bar(current, goal),
            format_remaining(remaining.get(kind), kind.unit())
        ));
    }

    msg.trim_end().to_string()
}

fn format_progress(
    totals: &FoodMacros,
    remaining: &MacroBalance,
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let mut msg = format!("{}\n", t_lang(localization, "progress-title", language_code));
    for kind in MacroKind::ALL {
        msg.push_str(&format!(
            "{} {} ({})\n",
            macro_emoji(kind),
            create_progress_bar(totals.get(kind), goals.get(kind)),
            format_remaining_compact(remaining.get(kind), kind.unit())
        ));
    }
    msg.trim_end().to_string()
}

/// Reply to a free-text food message
pub fn format_log_outcome(
    outcome: &LogOutcome,
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    if outcome.is_unrecognized() {
        return t_lang(localization, "log-not-understood", language_code);
    }

    let mut msg = format!("{}\n\n", t_lang(localization, "log-title", language_code));

    for entry in &outcome.logged {
        msg.push_str(&format!(
            "• {:.0}g {}\n  {}\n\n",
            entry.grams,
            entry.food_name,
            format_macros_line(&entry.macros)
        ));
    }

    if !outcome.not_found.is_empty() {
        let foods = outcome.not_found.join(", ");
        msg.push_str(&format!(
            "{}\n{}\n\n",
            t_args_lang(localization, "log-not-found", &[("foods", &foods)], language_code),
            t_lang(localization, "log-add-hint", language_code)
        ));
    }

    msg.push_str(&format_progress(
        &outcome.totals,
        &outcome.remaining,
        goals,
        localization,
        language_code,
    ));
    msg
}

/// Reply to a successful `/add`
pub fn format_quick_add(
    outcome: &QuickAddOutcome,
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    match outcome {
        QuickAddOutcome::Logged {
            entry,
            totals,
            remaining,
        } => {
            let grams = format!("{:.0}", entry.grams);
            format!(
                "{}\n{}\n\n{}",
                t_args_lang(localization, "quick-add-title", &[("grams", &grams)], language_code),
                format_macros_line(&entry.macros),
                format_progress(totals, remaining, goals, localization, language_code)
            )
        }
        QuickAddOutcome::CatalogExtended {
            name,
            per_100g,
            replaced,
        } => {
            let title_key = if *replaced {
                "catalog-updated"
            } else {
                "catalog-added"
            };
            format!(
                "{}\n{}\n\n{}",
                t_args_lang(localization, title_key, &[("name", name)], language_code),
                format_macros_line(per_100g),
                t_args_lang(localization, "catalog-usage", &[("name", name)], language_code)
            )
        }
    }
}

/// Localized explanation of a rejected `/add`
pub fn format_quick_add_error(
    error: &QuickAddError,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let key = match error {
        QuickAddError::UnrecognizedFormat(_) | QuickAddError::WrongFieldCount { .. } => {
            "add-invalid-format"
        }
        QuickAddError::NonNumeric { .. } => "add-not-a-number",
        QuickAddError::Negative { .. } => "add-negative",
        QuickAddError::EmptyName => "add-empty-name",
    };
    t_lang(localization, key, language_code)
}

/// Usage text for `/add` without arguments
pub fn format_add_usage(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    [
        t_lang(localization, "add-usage-title", language_code),
        t_lang(localization, "add-usage-quick", language_code),
        t_lang(localization, "add-usage-save", language_code),
    ]
    .join("\n\n")
}

/// Reply to a successful `/undo`
pub fn format_undo(
    entry: &Entry,
    remaining: &MacroBalance,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    format!(
        "{}\n   {:.0}g {}\n   ({:.0} kcal, {:.1}g prot)\n\n{} {:.0} kcal | {:.0}g prot",
        t_lang(localization, "undo-title", language_code),
        entry.grams,
        entry.food_name,
        entry.macros.kcal,
        entry.macros.protein,
        t_lang(localization, "undo-remaining", language_code),
        remaining.kcal,
        remaining.protein
    )
}

/// Traffic light for a day's protein share in the history view
pub fn protein_verdict(protein_pct: f64) -> &'static str {
    if protein_pct >= 90.0 {
        "🟢"
    } else if protein_pct >= 70.0 {
        "🟡"
    } else {
        "🔴"
    }
}

fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "weekday-mon",
        Weekday::Tue => "weekday-tue",
        Weekday::Wed => "weekday-wed",
        Weekday::Thu => "weekday-thu",
        Weekday::Fri => "weekday-fri",
        Weekday::Sat => "weekday-sat",
        Weekday::Sun => "weekday-sun",
    }
}

fn protein_percent(totals: &FoodMacros, goals: &Goals) -> f64 {
    100.0 * totals.protein / goals.targets.protein
}

/// Recent days, most recent first, with a protein verdict per day
pub fn format_history(
    days: &[DaySummary],
    today: NaiveDate,
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let mut msg = format!("{}\n\n", t_lang(localization, "history-title", language_code));

    for day in days {
        let label = match (today - day.date).num_days() {
            0 => t_lang(localization, "history-today", language_code),
            1 => t_lang(localization, "history-yesterday", language_code),
            _ => t_lang(localization, weekday_key(day.date.weekday()), language_code),
        };
        let date_display = day.date.format("%d/%m");

        match &day.totals {
            Some(totals) => msg.push_str(&format!(
                "{} {} {}\n   {:.0}kcal | {:.0}p | {:.0}l | {:.0}g\n\n",
                protein_verdict(protein_percent(totals, goals)),
                label,
                date_display,
                totals.kcal,
                totals.protein,
                totals.fat,
                totals.carb
            )),
            None => msg.push_str(&format!(
                "⚪ {} {} - {}\n\n",
                label,
                date_display,
                t_lang(localization, "history-no-data", language_code)
            )),
        }
    }

    msg.trim_end().to_string()
}

/// End-of-day assessment of the protein goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecapVerdict {
    Achieved,
    Almost,
    Warning,
}

impl RecapVerdict {
    pub fn from_percent(protein_pct: f64) -> Self {
        if protein_pct >= 100.0 {
            RecapVerdict::Achieved
        } else if protein_pct >= 90.0 {
            RecapVerdict::Almost
        } else {
            RecapVerdict::Warning
        }
    }
}

/// Scheduled reminder; the recap also lists entries and a verdict
pub fn format_reminder(
    kind: ReminderKind,
    snapshot: &StatusSnapshot,
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let title_key = match kind {
        ReminderKind::Midday => "reminder-midday",
        ReminderKind::Evening => "reminder-evening",
        ReminderKind::Recap => "reminder-recap",
    };

    let mut msg = format!(
        "{}\n\n{}",
        t_lang(localization, title_key, language_code),
        format_status(&snapshot.totals, goals, localization, language_code)
    );

    if kind != ReminderKind::Recap {
        return msg;
    }

    if !snapshot.entries.is_empty() {
        msg.push_str(&format!(
            "\n\n{}\n",
            t_lang(localization, "recap-entries", language_code)
        ));
        for entry in &snapshot.entries {
            msg.push_str(&format!(
                "   • {} - {:.0}g {}\n",
                entry.timestamp.format("%H:%M"),
                entry.grams,
                entry.food_name
            ));
        }
        msg = msg.trim_end().to_string();
    }

    let protein_pct = protein_percent(&snapshot.totals, goals);
    let verdict = match RecapVerdict::from_percent(protein_pct) {
        RecapVerdict::Achieved => t_lang(localization, "recap-achieved", language_code),
        RecapVerdict::Almost => t_lang(localization, "recap-almost", language_code),
        RecapVerdict::Warning => {
            let percent = format!("{:.0}", protein_pct);
            t_args_lang(
                localization,
                "recap-warning",
                &[("percent", &percent)],
                language_code,
            )
        }
    };
    msg.push_str(&format!("\n\n{}", verdict));
    msg
}

/// Catalog search results with their per-100g values
pub fn format_search_results(
    query: &str,
    results: &[(String, FoodMacros)],
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    if results.is_empty() {
        return t_args_lang(localization, "search-none", &[("query", query)], language_code);
    }

    let mut msg = format!(
        "{}\n\n",
        t_args_lang(localization, "search-title", &[("query", query)], language_code)
    );
    for (name, per_100g) in results {
        msg.push_str(&format!(
            "• {} (100g)\n   {:.0} kcal | {:.1}g P | {:.1}g F | {:.1}g C\n",
            name, per_100g.kcal, per_100g.protein, per_100g.fat, per_100g.carb
        ));
    }
    msg.trim_end().to_string()
}

/// Every catalog food name, comma separated
pub fn format_food_list(
    names: &[&str],
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let count = names.len().to_string();
    format!(
        "{}\n\n{}\n\n{}",
        t_args_lang(localization, "list-title", &[("count", &count)], language_code),
        names.join(", "),
        t_lang(localization, "list-hint", language_code)
    )
}

pub fn format_welcome(
    goals: &Goals,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let kcal = format!("{:.0}", goals.targets.kcal);
    let protein = format!("{:.0}", goals.targets.protein);
    let fat = format!("{:.0}", goals.targets.fat);
    let carb = format!("{:.0}", goals.targets.carb);

    format!(
        "{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}",
        t_lang(localization, "welcome-title", language_code),
        t_lang(localization, "welcome-goals-title", language_code),
        t_args_lang(
            localization,
            "welcome-goals",
            &[
                ("kcal", &kcal),
                ("protein", &protein),
                ("fat", &fat),
                ("carb", &carb)
            ],
            language_code
        ),
        t_lang(localization, "welcome-usage-title", language_code),
        t_lang(localization, "welcome-usage", language_code),
        t_lang(localization, "welcome-commands-title", language_code),
        COMMAND_LIST,
        t_lang(localization, "welcome-final", language_code)
    )
}

pub fn format_help(
    schedule: &ScheduleConfig,
    localization: &LocalizationManager,
    language_code: Option<&str>,
) -> String {
    let midday = schedule.midday_hour.to_string();
    let evening = schedule.evening_hour.to_string();
    let recap = schedule.recap_hour.to_string();

    vec![
        t_lang(localization, "help-title", language_code),
        t_lang(localization, "help-formats", language_code),
        t_lang(localization, "help-units", language_code),
        format!(
            "{}\n{}",
            t_lang(localization, "help-quick-add", language_code),
            t_lang(localization, "help-save-food", language_code)
        ),
        t_args_lang(
            localization,
            "help-reminders",
            &[("midday", &midday), ("evening", &evening), ("recap", &recap)],
            language_code,
        ),
        COMMAND_LIST.to_string(),
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_fills_by_eighths() {
        assert_eq!(create_progress_bar(0.0, 160.0), "○○○○○○○○ 0%");
        assert_eq!(create_progress_bar(80.0, 160.0), "●●●●○○○○ 50%");
        assert_eq!(create_progress_bar(400.0, 160.0), "●●●●●●●● 100%");
        assert_eq!(create_progress_bar(10.0, 0.0), "○○○○○○○○ 0%");
    }

    #[test]
    fn test_remaining_formats() {
        assert_eq!(format_remaining(120.4, "g"), "-120g");
        assert_eq!(format_remaining(-30.0, "g"), "+30g⚠️");
        assert_eq!(format_remaining(0.0, ""), "✓");
        assert_eq!(format_remaining_compact(-30.0, "g"), "✓");
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(protein_verdict(95.0), "🟢");
        assert_eq!(protein_verdict(90.0), "🟢");
        assert_eq!(protein_verdict(75.0), "🟡");
        assert_eq!(protein_verdict(10.0), "🔴");

        assert_eq!(RecapVerdict::from_percent(100.0), RecapVerdict::Achieved);
        assert_eq!(RecapVerdict::from_percent(92.0), RecapVerdict::Almost);
        assert_eq!(RecapVerdict::from_percent(50.0), RecapVerdict::Warning);
    }

    #[test]
    fn test_macros_line() {
        let macros = FoodMacros::new(260.0, 5.4, 0.6, 56.0);
        assert_eq!(format_macros_line(&macros), "🔥260 | 🥩5g | 🧈1g | 🍚56g");
    }
}
