//! Parsing and assembly of school meal data.
//!
//! Everything in this crate is pure: raw text fields in, display payloads out.
//! The upstream data is loosely formatted, so every parser is total and
//! degrades to an empty or absent value instead of returning an error.

pub mod allergen;
pub mod nutrition;
pub mod parse;
pub mod view;

pub use allergen::{
    ALLERGENS, AllergenCode, AllergenProfile, allergen_label, allergen_name, is_known, option_label,
    parse_option_label,
};
pub use nutrition::{
    DailyTargets, MAX_ENERGY_TARGET, MAX_MACRO_TARGET, Macro, MacroGrams, TargetOverrides,
    TargetPreset, Tier, pct,
};
pub use parse::{
    NutrientTable, NutrientValue, extract_allergen_numbers, parse_kcal, parse_nutrients,
    split_menu_items,
};
pub use view::{MealView, RawMeal, ViewOptions, assemble};
