//! # Nutrition Tracker
//!
//! Bundles the parser, the food catalog, the ledger and the goals behind one
//! synchronous API. A transport shares a single tracker behind one lock, which
//! gives the ledger the single-writer access it requires.

use crate::catalog::{FoodCatalog, InMemoryCatalog};
use crate::entry_parser::{EntryParser, ParsedDeclaration};
use crate::errors::{LedgerError, QuickAddError};
use crate::goals::{self, Goals};
use crate::ledger::{Entry, Ledger, NewEntry, DEFAULT_RETENTION_DAYS};
use crate::nutrition::{FoodMacros, MacroBalance, MacroProgress};
use crate::quick_add::{manual_entry_label, parse_quick_add, QuickAdd};
use chrono::{Days, NaiveDate};
use tracing::{info, warn};

/// Result of logging a free-text message
#[derive(Debug, Clone, PartialEq)]
pub struct LogOutcome {
    /// Everything the parser understood, resolved or not
    pub declarations: Vec<ParsedDeclaration>,
    /// Entries appended to the ledger
    pub logged: Vec<Entry>,
    /// Food names missing from the catalog
    pub not_found: Vec<String>,
    pub totals: FoodMacros,
    pub remaining: MacroBalance,
}

impl LogOutcome {
    /// True when no segment of the message could be parsed
    pub fn is_unrecognized(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Result of a quick-add command
#[derive(Debug, Clone, PartialEq)]
pub enum QuickAddOutcome {
    Logged {
        entry: Entry,
        totals: FoodMacros,
        remaining: MacroBalance,
    },
    CatalogExtended {
        name: String,
        per_100g: FoodMacros,
        replaced: bool,
    },
}

/// Point-in-time view of one day
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub date: NaiveDate,
    pub totals: FoodMacros,
    pub remaining: MacroBalance,
    pub progress: MacroProgress,
    pub entries: Vec<Entry>,
}

/// History line for one day; `totals` is `None` when nothing was logged
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub totals: Option<FoodMacros>,
}

pub struct NutritionTracker {
    parser: EntryParser,
    catalog: InMemoryCatalog,
    ledger: Ledger,
    goals: Goals,
    retention_days: u64,
}

impl NutritionTracker {
    pub fn new(
        parser: EntryParser,
        catalog: InMemoryCatalog,
        ledger: Ledger,
        goals: Goals,
        retention_days: u64,
    ) -> Self {
        Self {
            parser,
            catalog,
            ledger,
            goals,
            retention_days,
        }
    }

    /// Tracker with default parser, goals and retention
    pub fn with_catalog(catalog: InMemoryCatalog) -> Self {
        Self::new(
            EntryParser::new(),
            catalog,
            Ledger::default(),
            Goals::default(),
            DEFAULT_RETENTION_DAYS,
        )
    }

    pub fn today(&self) -> NaiveDate {
        self.ledger.today()
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn retention_days(&self) -> u64 {
        self.retention_days
    }

    fn balance(&mut self, date: NaiveDate) -> (FoodMacros, MacroBalance) {
        let totals = self.ledger.totals(date);
        (totals, goals::remaining(&totals, &self.goals))
    }

    /// Parse a message and append every resolved food to the day
    pub fn log_text(&mut self, date: NaiveDate, text: &str) -> LogOutcome {
        let span = crate::observability::ledger_span("log_text", date);
        let _enter = span.enter();

        let declarations = self.parser.parse(text, &self.catalog);
        self.ledger.ensure_day(date);

        let mut logged = Vec::new();
        let mut not_found = Vec::new();
        for declaration in &declarations {
            match self.ledger.append_declaration(date, declaration) {
                Some(entry) => logged.push(entry),
                None => not_found.push(declaration.food_name.clone()),
            }
        }

        if !not_found.is_empty() {
            warn!(foods = ?not_found, "Foods not found in catalog");
        }

        let (totals, remaining) = self.balance(date);
        LogOutcome {
            declarations,
            logged,
            not_found,
            totals,
            remaining,
        }
    }

    /// Run a quick-add command: log raw macros or extend the catalog
    pub fn quick_add(
        &mut self,
        date: NaiveDate,
        text: &str,
    ) -> Result<QuickAddOutcome, QuickAddError> {
        match parse_quick_add(text)? {
            QuickAdd::LogMacros { grams, macros } => {
                let entry = self.ledger.append(
                    date,
                    NewEntry {
                        food_name: manual_entry_label(grams),
                        grams,
                        macros,
                    },
                );
                let (totals, remaining) = self.balance(date);
                Ok(QuickAddOutcome::Logged {
                    entry,
                    totals,
                    remaining,
                })
            }
            QuickAdd::ExtendCatalog { name, per_100g } => {
                let replaced = self.catalog.insert_food(&name, per_100g).is_some();
                info!(food = %name, replaced, "Catalog extended");
                Ok(QuickAddOutcome::CatalogExtended {
                    name,
                    per_100g,
                    replaced,
                })
            }
        }
    }

    /// Undo the most recent entry of the day
    pub fn undo(&mut self, date: NaiveDate) -> Result<(Entry, MacroBalance), LedgerError> {
        let entry = self.ledger.undo_last(date)?;
        let (_, remaining) = self.balance(date);
        Ok((entry, remaining))
    }

    pub fn status(&mut self, date: NaiveDate) -> StatusSnapshot {
        let (totals, remaining) = self.balance(date);
        StatusSnapshot {
            date,
            totals,
            remaining,
            progress: goals::progress(&totals, &self.goals),
            entries: self.ledger.entries(date).to_vec(),
        }
    }

    /// The last `days` days ending with `today`, most recent first
    pub fn history(&self, today: NaiveDate, days: u64) -> Vec<DaySummary> {
        (0..days)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| DaySummary {
                date,
                totals: self
                    .ledger
                    .day(date)
                    .filter(|day| !day.is_empty())
                    .map(|day| day.totals()),
            })
            .collect()
    }

    /// Catalog foods matching the query with their per-100g values
    pub fn search(&self, query: &str, limit: usize) -> Vec<(String, FoodMacros)> {
        self.catalog
            .search(query)
            .into_iter()
            .filter_map(|name| {
                let macros = self.catalog.lookup_exact(&name)?;
                Some((name, macros))
            })
            .take(limit)
            .collect()
    }

    /// Drop days outside the retention window
    pub fn prune(&mut self, reference_date: NaiveDate) -> Vec<NaiveDate> {
        self.ledger.prune(reference_date, self.retention_days)
    }
}
