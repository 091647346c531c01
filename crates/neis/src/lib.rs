//! Client for the NEIS school meal service (`mealServiceDietInfo`).

mod cache;
mod client;
mod error;
mod record;

pub use cache::CachedMealSource;
pub use client::{MEAL_SERVICE_PATH, NeisClient, NeisSettings, extract_rows};
pub use error::FetchError;
pub use record::{LUNCH, MealRecord, select_slot};

use time::Date;

/// Anything that can produce the meal records for a given day.
#[async_trait::async_trait]
pub trait MealSource: Send + Sync {
    /// Rows for `date`, or an empty list when the school served nothing.
    async fn fetch_day(&self, date: Date) -> Result<Vec<MealRecord>, FetchError>;
}

/// `YYYYMMDD`, the date format NEIS expects in `MLSV_YMD`.
pub fn date_key(date: Date) -> String {
    format!(
        "{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Fetches a day and turns any upstream failure into "no data".
#[tracing::instrument(skip(source))]
pub async fn fetch_or_empty(source: &dyn MealSource, date: Date) -> Vec<MealRecord> {
    match source.fetch_day(date).await {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(err = %err, "meal service unavailable, showing empty state");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn date_key_is_compact() {
        assert_eq!(date_key(date!(2025 - 08 - 11)), "20250811");
        assert_eq!(date_key(date!(2024 - 01 - 02)), "20240102");
    }
}
