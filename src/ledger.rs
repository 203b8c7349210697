//! # Daily Ledger
//!
//! Per-day append-only entry log with a running total.
//!
//! Totals are maintained incrementally: every mutation updates the entry list
//! and the totals in the same step, so `totals == sum(entries.macros)` holds
//! for every reachable state. Days spring into existence with zero totals the
//! first time they are touched and disappear only through [`Ledger::prune`].
//!
//! The ledger does no locking. Callers sharing it between tasks must
//! serialize access (one mutex or a single owner).

use crate::entry_parser::ParsedDeclaration;
use crate::errors::LedgerError;
use crate::nutrition::FoodMacros;
use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Default number of days kept before the current one
pub const DEFAULT_RETENTION_DAYS: u64 = 3;

/// A committed, timestamped record of food eaten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub food_name: String,
    pub grams: f64,
    /// Macros for `grams`, not per 100 g
    pub macros: FoodMacros,
    pub timestamp: DateTime<FixedOffset>,
}

/// Data for an entry about to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub food_name: String,
    pub grams: f64,
    pub macros: FoodMacros,
}

impl NewEntry {
    /// The entry for a resolved declaration; `None` when the food is unresolved
    pub fn from_declaration(declaration: &ParsedDeclaration) -> Option<Self> {
        Some(Self {
            food_name: declaration.food_name.clone(),
            grams: declaration.grams,
            macros: declaration.resolved_macros()?,
        })
    }
}

/// Entries and running totals for one calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    date: NaiveDate,
    entries: Vec<Entry>,
    totals: FoodMacros,
    /// Totals before each entry was appended, parallel to `entries`
    checkpoints: Vec<FoodMacros>,
}

impl DayRecord {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
            totals: FoodMacros::ZERO,
            checkpoints: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Entries in append order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn totals(&self) -> FoodMacros {
        self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: Entry) {
        self.checkpoints.push(self.totals);
        self.totals += entry.macros;
        self.entries.push(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        let entry = self.entries.pop()?;
        // Restoring the snapshot keeps append-then-undo exact in floating point
        self.totals = self.checkpoints.pop().unwrap_or(FoodMacros::ZERO);
        Some(entry)
    }
}

/// Mapping from date to day record, in the configured timezone
#[derive(Debug, Clone)]
pub struct Ledger {
    days: BTreeMap<NaiveDate, DayRecord>,
    timezone: Tz,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Paris)
    }
}

impl Ledger {
    pub fn new(timezone: Tz) -> Self {
        Self {
            days: BTreeMap::new(),
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Current wall-clock time in the ledger's timezone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone).fixed_offset()
    }

    /// Today's date key in the ledger's timezone
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Create the day with zero totals if it does not exist yet
    pub fn ensure_day(&mut self, date: NaiveDate) -> &mut DayRecord {
        self.days.entry(date).or_insert_with(|| {
            debug!(%date, "Initializing day record");
            DayRecord::new(date)
        })
    }

    /// Append an entry stamped with the current time
    pub fn append(&mut self, date: NaiveDate, new_entry: NewEntry) -> Entry {
        let timestamp = self.now();
        self.append_at(date, new_entry, timestamp)
    }

    /// Append an entry with an explicit timestamp
    pub fn append_at(
        &mut self,
        date: NaiveDate,
        new_entry: NewEntry,
        timestamp: DateTime<FixedOffset>,
    ) -> Entry {
        let entry = Entry {
            food_name: new_entry.food_name,
            grams: new_entry.grams,
            macros: new_entry.macros,
            timestamp,
        };

        self.ensure_day(date).push(entry.clone());
        crate::observability::record_ledger_operation("append");
        debug!(%date, food = %entry.food_name, grams = entry.grams, "Entry appended");

        entry
    }

    /// Append a parsed declaration; unresolved declarations are skipped
    pub fn append_declaration(
        &mut self,
        date: NaiveDate,
        declaration: &ParsedDeclaration,
    ) -> Option<Entry> {
        let new_entry = NewEntry::from_declaration(declaration)?;
        Some(self.append(date, new_entry))
    }

    /// Remove and return the most recent entry of the day
    pub fn undo_last(&mut self, date: NaiveDate) -> Result<Entry, LedgerError> {
        let entry = self
            .ensure_day(date)
            .pop()
            .ok_or(LedgerError::EmptyLedger { date })?;

        crate::observability::record_ledger_operation("undo");
        debug!(%date, food = %entry.food_name, "Entry undone");
        Ok(entry)
    }

    /// Delete every day strictly older than `reference_date - retain_days`.
    ///
    /// Returns the removed dates, oldest first.
    pub fn prune(&mut self, reference_date: NaiveDate, retain_days: u64) -> Vec<NaiveDate> {
        let Some(cutoff) = reference_date.checked_sub_days(Days::new(retain_days)) else {
            return Vec::new();
        };

        let kept = self.days.split_off(&cutoff);
        let removed: Vec<NaiveDate> = std::mem::replace(&mut self.days, kept)
            .into_keys()
            .collect();

        crate::observability::record_ledger_operation("prune");
        info!(%reference_date, retain_days, removed = ?removed, "Ledger pruned");
        removed
    }

    /// Running totals for the day (creates the day if needed)
    pub fn totals(&mut self, date: NaiveDate) -> FoodMacros {
        self.ensure_day(date).totals()
    }

    /// Entries of the day in append order (creates the day if needed)
    pub fn entries(&mut self, date: NaiveDate) -> &[Entry] {
        self.ensure_day(date).entries()
    }

    /// Read a day without creating it
    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    /// Dates currently held, oldest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn snack(kcal: f64) -> NewEntry {
        NewEntry {
            food_name: "snack".to_string(),
            grams: 50.0,
            macros: FoodMacros::new(kcal, 1.0, 2.0, 3.0),
        }
    }

    #[test]
    fn test_totals_track_appends_and_undos() {
        let mut ledger = Ledger::default();
        ledger.append(date(10), snack(100.0));
        ledger.append(date(10), snack(50.0));
        assert_eq!(ledger.totals(date(10)).kcal, 150.0);

        let undone = ledger.undo_last(date(10)).unwrap();
        assert_eq!(undone.macros.kcal, 50.0);
        assert_eq!(ledger.totals(date(10)).kcal, 100.0);
        assert_eq!(ledger.entries(date(10)).len(), 1);
    }

    #[test]
    fn test_prune_boundary_is_inclusive() {
        let mut ledger = Ledger::default();
        for day in 1..=10 {
            ledger.ensure_day(date(day));
        }

        let removed = ledger.prune(date(10), 3);
        assert_eq!(removed, (1..=6).map(date).collect::<Vec<_>>());
        assert_eq!(ledger.dates(), (7..=10).map(date).collect::<Vec<_>>());
    }
}
