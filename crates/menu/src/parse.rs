//! Best-effort parsers for the free-text fields of a meal record.
//!
//! None of these return errors. Formatting of the upstream fields varies from
//! school to school, so anything that does not match degrades to an empty or
//! absent value for that fragment only.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::allergen::AllergenCode;

/// Line break marker used inside dish and origin fields.
pub const LINE_BREAK: &str = "<br/>";

// ASCII digits only: a Unicode digit must not hide a later ASCII number.
static ALLERGEN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9,\s]+)\)").expect("allergen group pattern is valid"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]*\.?[0-9]+").expect("number pattern is valid"));

fn is_fallback_separator(c: char) -> bool {
    c == '/' || c == ','
}

/// Splits a dish field into trimmed, non-empty items.
///
/// `<br/>` wins when present; otherwise `/` and `,` separate items.
pub fn split_menu_items(menu: Option<&str>) -> Vec<String> {
    let Some(menu) = menu else {
        return Vec::new();
    };

    let parts: Vec<&str> = if menu.contains(LINE_BREAK) {
        menu.split(LINE_BREAK).collect()
    } else {
        menu.split(is_fallback_separator).collect()
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Allergen codes from the first parenthesized group of digits, commas and spaces.
///
/// `어묵국(5,6,13)` gives `{5, 6, 13}`. Codes are not checked against the
/// allergen directory.
pub fn extract_allergen_numbers(item: Option<&str>) -> BTreeSet<AllergenCode> {
    let Some(captures) = item.and_then(|item| ALLERGEN_GROUP.captures(item)) else {
        return BTreeSet::new();
    };

    captures[1]
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse().ok())
        .collect()
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// `824.00 Kcal` gives `824.0`.
pub fn parse_kcal(calories: Option<&str>) -> Option<f64> {
    calories.and_then(first_number)
}

/// Value of a nutrient fragment: the first number found, otherwise the raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Number(f64),
    Text(String),
}

impl NutrientValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            NutrientValue::Number(value) => Some(*value),
            NutrientValue::Text(_) => None,
        }
    }
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientValue::Number(value) => write!(f, "{value}"),
            NutrientValue::Text(text) => f.write_str(text),
        }
    }
}

/// Nutrient label to value, in the order labels first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutrientTable {
    entries: Vec<(String, NutrientValue)>,
}

impl NutrientTable {
    /// Overwrites the value in place when the label already exists.
    pub fn insert(&mut self, label: impl Into<String>, value: NutrientValue) {
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&NutrientValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NutrientValue)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by label, as shown in the raw nutrient table.
    pub fn sorted(&self) -> Vec<(&str, &NutrientValue)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

impl Serialize for NutrientTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Parses `탄수화물(g): 120 / 단백질(g): 35` style nutrient text.
///
/// Fragments are separated by `/` or `,`; only fragments with a colon are kept
/// and they split on the first colon.
pub fn parse_nutrients(nutrients: Option<&str>) -> NutrientTable {
    let mut table = NutrientTable::default();
    let Some(nutrients) = nutrients else {
        return table;
    };

    for fragment in nutrients.split(is_fallback_separator) {
        let Some((label, value)) = fragment.split_once(':') else {
            continue;
        };

        let value = value.trim();
        let value = match first_number(value) {
            Some(number) => NutrientValue::Number(number),
            None => NutrientValue::Text(value.to_owned()),
        };

        table.insert(label.trim(), value);
    }

    table
}
