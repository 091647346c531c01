use std::time::Duration;

use serde_json::Value;
use time::Date;

use crate::{FetchError, MealRecord, MealSource, date_key};

pub const MEAL_SERVICE_PATH: &str = "/hub/mealServiceDietInfo";

/// Connection details for the meal service.
#[derive(Debug, Clone)]
pub struct NeisSettings {
    pub base_url: String,
    pub key: String,
    /// Office of education code (`ATPT_OFCDC_SC_CODE`).
    pub atpt_code: String,
    /// School code (`SD_SCHUL_CODE`).
    pub school_code: String,
    pub page_size: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct NeisClient {
    http: reqwest::Client,
    settings: NeisSettings,
}

impl NeisClient {
    pub fn new(settings: NeisSettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &NeisSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{MEAL_SERVICE_PATH}",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl MealSource for NeisClient {
    #[tracing::instrument(skip(self), fields(school = %self.settings.school_code))]
    async fn fetch_day(&self, date: Date) -> Result<Vec<MealRecord>, FetchError> {
        let page_size = self.settings.page_size.to_string();
        let day = date_key(date);
        let params = [
            ("KEY", self.settings.key.as_str()),
            ("Type", "json"),
            ("pIndex", "1"),
            ("pSize", page_size.as_str()),
            ("ATPT_OFCDC_SC_CODE", self.settings.atpt_code.as_str()),
            ("SD_SCHUL_CODE", self.settings.school_code.as_str()),
            ("MLSV_YMD", day.as_str()),
        ];

        let response = self.http.get(self.endpoint()).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        let records = extract_rows(&payload);

        tracing::debug!(rows = records.len(), "meal service answered");

        Ok(records)
    }
}

/// Rows under `mealServiceDietInfo[1].row`.
///
/// A payload without that key (NEIS answers `{"RESULT": {...}}` when nothing
/// was served) yields no rows. Rows that are not objects are skipped.
pub fn extract_rows(payload: &Value) -> Vec<MealRecord> {
    let Some(rows) = payload
        .get("mealServiceDietInfo")
        .and_then(|info| info.get(1))
        .and_then(|section| section.get("row"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.is_object())
        .filter_map(|row| serde_json::from_value(row.clone()).ok())
        .collect()
}
