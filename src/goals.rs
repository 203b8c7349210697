//! # Goal Tracker
//!
//! Derives remaining-vs-goal deltas and bounded progress from a day's totals.
//! Purely functional; goals are fixed for the lifetime of the process.

use crate::errors::{AppError, AppResult};
use crate::nutrition::{FoodMacros, MacroBalance, MacroKind, MacroProgress};
use serde::{Deserialize, Serialize};

/// Daily macro targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub targets: FoodMacros,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            targets: FoodMacros::new(3100.0, 160.0, 90.0, 400.0),
        }
    }
}

impl Goals {
    pub fn new(kcal: f64, protein: f64, fat: f64, carb: f64) -> Self {
        Self {
            targets: FoodMacros::new(kcal, protein, fat, carb),
        }
    }

    pub fn get(&self, kind: MacroKind) -> f64 {
        self.targets.get(kind)
    }

    /// Every target must be a finite number greater than zero
    pub fn validate(&self) -> AppResult<()> {
        for kind in MacroKind::ALL {
            let target = self.get(kind);
            if !target.is_finite() || target <= 0.0 {
                return Err(AppError::Config(format!(
                    "Goal for {:?} must be greater than 0, got {}",
                    kind, target
                )));
            }
        }
        Ok(())
    }
}

/// Where a single macro stands against its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Remaining,
    Met,
    Exceeded,
}

impl GoalStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            GoalStatus::Remaining
        } else if balance < 0.0 {
            GoalStatus::Exceeded
        } else {
            GoalStatus::Met
        }
    }
}

/// `goal - total` per macro
pub fn remaining(totals: &FoodMacros, goals: &Goals) -> MacroBalance {
    goals.targets - *totals
}

/// Share of a single goal reached, clamped to 100
pub fn percent_of(total: f64, goal: f64) -> f64 {
    (100.0 * total / goal).min(100.0)
}

/// `min(100, 100 * total / goal)` per macro
pub fn progress(totals: &FoodMacros, goals: &Goals) -> MacroProgress {
    MacroProgress {
        kcal: percent_of(totals.kcal, goals.targets.kcal),
        protein: percent_of(totals.protein, goals.targets.protein),
        fat: percent_of(totals.fat, goals.targets.fat),
        carb: percent_of(totals.carb, goals.targets.carb),
    }
}
