use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Meal slot token for lunch (`중식`).
pub const LUNCH: &str = "중식";

/// One row of `mealServiceDietInfo`: a single meal slot on a single day.
///
/// Every field is optional. Numbers are kept as their text form and any other
/// non-string value is treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "MMEAL_SC_NM", default, deserialize_with = "lenient_string")]
    pub meal_slot: Option<String>,
    #[serde(rename = "DDISH_NM", default, deserialize_with = "lenient_string")]
    pub dishes: Option<String>,
    #[serde(rename = "CAL_INFO", default, deserialize_with = "lenient_string")]
    pub calories: Option<String>,
    #[serde(rename = "NTR_INFO", default, deserialize_with = "lenient_string")]
    pub nutrients: Option<String>,
    #[serde(rename = "MLSV_YMD", default, deserialize_with = "lenient_string")]
    pub served_on: Option<String>,
    #[serde(rename = "SCHUL_NM", default, deserialize_with = "lenient_string")]
    pub school: Option<String>,
    #[serde(rename = "ORPLC_INFO", default, deserialize_with = "lenient_string")]
    pub origin: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// First record whose slot name contains `token`, otherwise the first record.
pub fn select_slot<'a>(records: &'a [MealRecord], token: &str) -> Option<&'a MealRecord> {
    records
        .iter()
        .find(|record| {
            record
                .meal_slot
                .as_deref()
                .is_some_and(|slot| slot.contains(token))
        })
        .or_else(|| records.first())
}
