//! # Nutrition Values
//!
//! Macro-nutrient value types shared by the catalog, the parsers, the ledger
//! and the goal tracker.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// The four tracked macro-nutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroKind {
    Kcal,
    Protein,
    Fat,
    Carb,
}

impl MacroKind {
    /// All macros in display order
    pub const ALL: [MacroKind; 4] = [
        MacroKind::Kcal,
        MacroKind::Protein,
        MacroKind::Fat,
        MacroKind::Carb,
    ];

    /// Unit suffix used when rendering amounts ("" for kcal, "g" otherwise)
    pub fn unit(self) -> &'static str {
        match self {
            MacroKind::Kcal => "",
            _ => "g",
        }
    }
}

/// Macro values `(kcal, protein_g, fat_g, carb_g)`.
///
/// Catalog values are per 100 g; ledger values are the amounts actually eaten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodMacros {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

impl FoodMacros {
    pub const ZERO: FoodMacros = FoodMacros {
        kcal: 0.0,
        protein: 0.0,
        fat: 0.0,
        carb: 0.0,
    };

    pub fn new(kcal: f64, protein: f64, fat: f64, carb: f64) -> Self {
        Self {
            kcal,
            protein,
            fat,
            carb,
        }
    }

    /// Scale per-100g values to the given weight in grams
    pub fn scaled_to(&self, grams: f64) -> Self {
        let ratio = grams / 100.0;
        Self {
            kcal: self.kcal * ratio,
            protein: self.protein * ratio,
            fat: self.fat * ratio,
            carb: self.carb * ratio,
        }
    }

    pub fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Kcal => self.kcal,
            MacroKind::Protein => self.protein,
            MacroKind::Fat => self.fat,
            MacroKind::Carb => self.carb,
        }
    }

    /// True when every field is finite and non-negative
    pub fn is_valid(&self) -> bool {
        MacroKind::ALL.iter().all(|&kind| {
            let value = self.get(kind);
            value.is_finite() && value >= 0.0
        })
    }
}

impl Add for FoodMacros {
    type Output = FoodMacros;

    fn add(self, rhs: FoodMacros) -> FoodMacros {
        FoodMacros {
            kcal: self.kcal + rhs.kcal,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carb: self.carb + rhs.carb,
        }
    }
}

impl AddAssign for FoodMacros {
    fn add_assign(&mut self, rhs: FoodMacros) {
        *self = *self + rhs;
    }
}

impl Sub for FoodMacros {
    type Output = MacroBalance;

    fn sub(self, rhs: FoodMacros) -> MacroBalance {
        MacroBalance {
            kcal: self.kcal - rhs.kcal,
            protein: self.protein - rhs.protein,
            fat: self.fat - rhs.fat,
            carb: self.carb - rhs.carb,
        }
    }
}

/// Signed per-macro difference, e.g. goal minus consumed.
///
/// Positive values are still to consume, negative values mean the target was
/// exceeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroBalance {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

impl MacroBalance {
    pub fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Kcal => self.kcal,
            MacroKind::Protein => self.protein,
            MacroKind::Fat => self.fat,
            MacroKind::Carb => self.carb,
        }
    }

    /// Macros whose balance is negative
    pub fn exceeded(&self) -> Vec<MacroKind> {
        MacroKind::ALL
            .into_iter()
            .filter(|&kind| self.get(kind) < 0.0)
            .collect()
    }
}

/// Bounded 0-100 progress per macro
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

impl MacroProgress {
    pub fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Kcal => self.kcal,
            MacroKind::Protein => self.protein,
            MacroKind::Fat => self.fat,
            MacroKind::Carb => self.carb,
        }
    }
}
