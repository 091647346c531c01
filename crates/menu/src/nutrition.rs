use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use validator::Validate;

use crate::parse::NutrientTable;

/// Carbohydrate, protein and fat, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Macro {
    Carbohydrate,
    Protein,
    Fat,
}

impl Macro {
    /// Substring that identifies the macro inside a nutrient label.
    pub fn token(self) -> &'static str {
        match self {
            Macro::Carbohydrate => "탄수",
            Macro::Protein => "단백",
            Macro::Fat => "지방",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Macro::Carbohydrate => "탄수화물(g)",
            Macro::Protein => "단백질(g)",
            Macro::Fat => "지방(g)",
        }
    }
}

/// Milligram labels are divided by 1000; everything else is taken as grams.
pub fn to_grams(label: &str, value: f64) -> f64 {
    if label.contains("mg") {
        value / 1000.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroGrams {
    pub carbohydrate: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

impl MacroGrams {
    /// Walks the table in order; the last numeric entry matching a macro wins.
    pub fn from_table(table: &NutrientTable) -> Self {
        let mut grams = Self::default();
        for (label, value) in table.iter() {
            let Some(value) = value.as_number() else {
                continue;
            };

            for nutrient in Macro::iter() {
                if label.contains(nutrient.token()) {
                    *grams.slot_mut(nutrient) = Some(to_grams(label, value));
                }
            }
        }

        grams
    }

    pub fn get(&self, nutrient: Macro) -> Option<f64> {
        match nutrient {
            Macro::Carbohydrate => self.carbohydrate,
            Macro::Protein => self.protein,
            Macro::Fat => self.fat,
        }
    }

    fn slot_mut(&mut self, nutrient: Macro) -> &mut Option<f64> {
        match nutrient {
            Macro::Carbohydrate => &mut self.carbohydrate,
            Macro::Protein => &mut self.protein,
            Macro::Fat => &mut self.fat,
        }
    }
}

/// Percentage of `target` reached by `value`, rounded to the nearest integer.
pub fn pct(value: Option<f64>, target: Option<f64>) -> Option<i64> {
    let (value, target) = (value?, target?);
    if target <= 0.0 {
        return None;
    }

    let percent = (value / target * 100.0).round();
    percent.is_finite().then_some(percent as i64)
}

/// Display tier of a percentage of the daily target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn from_percent(percent: i64) -> Self {
        match percent {
            p if p >= 50 => Tier::High,
            p if p >= 33 => Tier::Medium,
            _ => Tier::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub energy: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub fat: f64,
}

impl DailyTargets {
    pub fn for_macro(&self, nutrient: Macro) -> f64 {
        match nutrient {
            Macro::Carbohydrate => self.carbohydrate,
            Macro::Protein => self.protein,
            Macro::Fat => self.fat,
        }
    }
}

impl Default for DailyTargets {
    fn default() -> Self {
        TargetPreset::default().targets()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TargetPreset {
    #[default]
    Adult,
    Elementary,
    MiddleMale,
    MiddleFemale,
    HighMale,
    HighFemale,
}

impl TargetPreset {
    pub fn label(self) -> &'static str {
        match self {
            TargetPreset::Adult => "성인 기준",
            TargetPreset::Elementary => "초등학생",
            TargetPreset::MiddleMale => "중학생(남)",
            TargetPreset::MiddleFemale => "중학생(여)",
            TargetPreset::HighMale => "고등학생(남)",
            TargetPreset::HighFemale => "고등학생(여)",
        }
    }

    pub fn targets(self) -> DailyTargets {
        let (energy, carbohydrate, protein, fat) = match self {
            TargetPreset::Adult => (2000.0, 324.0, 55.0, 54.0),
            TargetPreset::Elementary => (1700.0, 250.0, 45.0, 47.0),
            TargetPreset::MiddleMale => (2500.0, 370.0, 60.0, 70.0),
            TargetPreset::MiddleFemale => (2000.0, 300.0, 55.0, 55.0),
            TargetPreset::HighMale => (2700.0, 400.0, 65.0, 75.0),
            TargetPreset::HighFemale => (2000.0, 300.0, 55.0, 55.0),
        };

        DailyTargets {
            energy,
            carbohydrate,
            protein,
            fat,
        }
    }
}

pub const MAX_ENERGY_TARGET: f64 = 5000.0;
pub const MAX_MACRO_TARGET: f64 = 1000.0;

/// Per-field replacements for a preset's targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TargetOverrides {
    #[validate(range(min = 0.0, max = 5000.0))]
    pub energy: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub carbohydrate: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat: Option<f64>,
}

impl TargetOverrides {
    pub fn is_empty(&self) -> bool {
        self.energy.is_none()
            && self.carbohydrate.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
    }

    /// Drops the override named `field`; unknown names are ignored.
    pub fn clear(&mut self, field: &str) {
        match field {
            "energy" => self.energy = None,
            "carbohydrate" => self.carbohydrate = None,
            "protein" => self.protein = None,
            "fat" => self.fat = None,
            _ => {}
        }
    }

    /// Removes out-of-range values and returns the names of the fields dropped.
    pub fn retain_valid(&mut self) -> Vec<String> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };

        let mut dropped: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        dropped.sort();

        for field in &dropped {
            self.clear(field);
        }

        dropped
    }

    pub fn apply(&self, base: DailyTargets) -> DailyTargets {
        DailyTargets {
            energy: self.energy.unwrap_or(base.energy),
            carbohydrate: self.carbohydrate.unwrap_or(base.carbohydrate),
            protein: self.protein.unwrap_or(base.protein),
            fat: self.fat.unwrap_or(base.fat),
        }
    }
}
