//! Turns a dashboard query into a validated request and the data the page
//! and the JSON endpoint render.

use lunchguide_menu::{
    AllergenProfile, DailyTargets, MealView, RawMeal, TargetOverrides, TargetPreset, ViewOptions,
    assemble, is_known, parse_option_label, split_menu_items,
};
use lunchguide_neis::{MealRecord, MealSource, fetch_or_empty, select_slot};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset, macros::format_description};

use crate::config::DashboardConfig;

/// Raw query string parameters. Everything is text so a bad value can be
/// reported instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
    #[serde(default)]
    pub allergen: Vec<String>,
    pub risky_only: Option<String>,
    pub preset: Option<String>,
    pub energy: Option<String>,
    pub carbohydrate: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    pub meal: Option<String>,
    /// Set by the page form; marks the selection as one to remember.
    pub apply: Option<String>,
}

impl DashboardQuery {
    pub fn is_submission(&self) -> bool {
        self.apply.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub date: Date,
    pub meal: String,
    pub preset: TargetPreset,
    pub overrides: TargetOverrides,
    pub options: ViewOptions,
    pub notices: Vec<String>,
}

impl DashboardRequest {
    pub fn from_query(query: DashboardQuery, config: &DashboardConfig, today: Date) -> Self {
        let mut notices = Vec::new();

        let date = match query.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(value) => parse_date(value).unwrap_or_else(|| {
                notices.push(format!("잘못된 날짜 '{value}' 대신 오늘 날짜를 조회합니다."));
                today
            }),
        };

        let mut codes = Vec::new();
        for value in &query.allergen {
            match parse_option_label(value).filter(|code| is_known(*code)) {
                Some(code) => codes.push(code),
                None => notices.push(format!("알 수 없는 알레르기 항목 '{value}'은(는) 무시합니다.")),
            }
        }
        let profile = AllergenProfile::new(codes);

        let preset = match query.preset.as_deref().map(str::trim) {
            None | Some("") => config.preset(),
            Some(value) => value.parse().unwrap_or_else(|_| {
                notices.push(format!("알 수 없는 기준 '{value}' 대신 기본 기준을 사용합니다."));
                config.preset()
            }),
        };

        let mut overrides = TargetOverrides {
            energy: parse_override("energy", query.energy.as_deref(), &mut notices),
            carbohydrate: parse_override("carbohydrate", query.carbohydrate.as_deref(), &mut notices),
            protein: parse_override("protein", query.protein.as_deref(), &mut notices),
            fat: parse_override("fat", query.fat.as_deref(), &mut notices),
        };
        for field in overrides.retain_valid() {
            notices.push(format!("{field} 목표치가 허용 범위를 벗어나 기본값을 사용합니다."));
        }

        let meal = query
            .meal
            .as_deref()
            .map(str::trim)
            .filter(|meal| !meal.is_empty())
            .unwrap_or(config.default_meal.as_str())
            .to_owned();

        let risky_only = query
            .risky_only
            .as_deref()
            .is_some_and(|value| matches!(value, "on" | "true" | "1"));

        Self {
            date,
            meal,
            preset,
            overrides,
            options: ViewOptions {
                profile,
                risky_only,
                targets: overrides.apply(preset.targets()),
            },
            notices,
        }
    }
}

fn parse_override(field: &str, value: Option<&str>, notices: &mut Vec<String>) -> Option<f64> {
    let value = value.map(str::trim).filter(|value| !value.is_empty())?;
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(number),
        _ => {
            notices.push(format!("{field} 목표치 '{value}'을(를) 숫자로 읽을 수 없습니다."));
            None
        }
    }
}

/// Accepts `YYYY-MM-DD` and the compact `YYYYMMDD`.
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .or_else(|_| Date::parse(value, format_description!("[year][month][day]")))
        .ok()
}

pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Calendar date at the configured UTC offset.
pub fn today(config: &DashboardConfig) -> Date {
    let offset = UtcOffset::from_hms(config.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub date: String,
    pub meal: String,
    /// Slot actually shown, which differs from `meal` after a fallback.
    pub meal_slot: Option<String>,
    pub available_slots: Vec<String>,
    pub school: Option<String>,
    pub origin: Vec<String>,
    pub preset: TargetPreset,
    pub preset_label: &'static str,
    pub targets: DailyTargets,
    pub profile: AllergenProfile,
    pub profile_summary: Option<String>,
    pub risky_only: bool,
    pub view: Option<MealView>,
    pub notices: Vec<String>,
}

impl Dashboard {
    pub fn build(records: &[MealRecord], request: &DashboardRequest) -> Self {
        let selected = select_slot(records, &request.meal);
        if selected.is_some_and(|record| record.meal_slot.as_deref() != Some(request.meal.as_str()))
        {
            tracing::debug!(meal = %request.meal, "requested slot missing, using first record");
        }

        let view = selected.map(|record| {
            assemble(
                RawMeal {
                    dishes: record.dishes.as_deref(),
                    calories: record.calories.as_deref(),
                    nutrients: record.nutrients.as_deref(),
                },
                &request.options,
            )
        });

        Self {
            date: iso_date(request.date),
            meal: request.meal.to_owned(),
            meal_slot: selected.and_then(|record| record.meal_slot.to_owned()),
            available_slots: records
                .iter()
                .filter_map(|record| record.meal_slot.to_owned())
                .collect(),
            school: selected.and_then(|record| record.school.to_owned()),
            origin: split_menu_items(selected.and_then(|record| record.origin.as_deref())),
            preset: request.preset,
            preset_label: request.preset.label(),
            targets: request.options.targets,
            profile: request.options.profile.to_owned(),
            profile_summary: request.options.profile.summary(),
            risky_only: request.options.risky_only,
            view,
            notices: request.notices.to_owned(),
        }
    }

    pub fn has_meal(&self) -> bool {
        self.view.is_some()
    }
}

/// Fetches the requested day and builds the dashboard. Upstream failures
/// render as a day without meals.
#[tracing::instrument(skip_all, fields(date = %request.date, meal = %request.meal))]
pub async fn load(source: &dyn MealSource, request: &DashboardRequest) -> Dashboard {
    let records = fetch_or_empty(source, request.date).await;
    Dashboard::build(&records, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn request(query: DashboardQuery) -> DashboardRequest {
        DashboardRequest::from_query(query, &DashboardConfig::default(), date!(2025 - 08 - 11))
    }

    #[test]
    fn empty_query_uses_defaults() {
        let request = request(DashboardQuery::default());

        assert_eq!(request.date, date!(2025 - 08 - 11));
        assert_eq!(request.meal, "중식");
        assert_eq!(request.preset, TargetPreset::Adult);
        assert_eq!(request.options.targets, TargetPreset::Adult.targets());
        assert!(request.options.profile.is_empty());
        assert!(!request.options.risky_only);
        assert!(request.notices.is_empty());
    }

    #[test]
    fn bad_date_falls_back_to_today_with_notice() {
        let request = request(DashboardQuery {
            date: Some("2025-13-40".to_string()),
            ..Default::default()
        });

        assert_eq!(request.date, date!(2025 - 08 - 11));
        assert_eq!(request.notices.len(), 1);
    }

    #[test]
    fn compact_dates_are_accepted() {
        assert_eq!(parse_date("20250812"), Some(date!(2025 - 08 - 12)));
        assert_eq!(parse_date("2025-08-12"), Some(date!(2025 - 08 - 12)));
        assert_eq!(parse_date("12/08/2025"), None);
        assert_eq!(iso_date(date!(2025 - 01 - 02)), "2025-01-02");
    }

    #[test]
    fn allergen_values_accept_codes_and_option_labels() {
        let request = request(DashboardQuery {
            allergen: vec![
                "5".to_string(),
                "15. 닭고기".to_string(),
                "42".to_string(),
                "milk".to_string(),
            ],
            ..Default::default()
        });

        assert_eq!(
            request.options.profile.codes().iter().copied().collect::<Vec<_>>(),
            vec![5, 15]
        );
        assert_eq!(request.notices.len(), 2);
    }

    #[test]
    fn overrides_replace_only_valid_fields() {
        let request = request(DashboardQuery {
            preset: Some("high_male".to_string()),
            energy: Some("2200".to_string()),
            protein: Some("abc".to_string()),
            fat: Some("-3".to_string()),
            ..Default::default()
        });

        let base = TargetPreset::HighMale.targets();
        assert_eq!(request.options.targets.energy, 2200.0);
        assert_eq!(request.options.targets.protein, base.protein);
        assert_eq!(request.options.targets.fat, base.fat);
        assert_eq!(request.options.targets.carbohydrate, base.carbohydrate);
        assert_eq!(request.notices.len(), 2);
    }

    #[test]
    fn unknown_preset_uses_configured_default() {
        let config = DashboardConfig {
            default_preset: "elementary".to_string(),
            ..Default::default()
        };
        let request = DashboardRequest::from_query(
            DashboardQuery {
                preset: Some("toddler".to_string()),
                ..Default::default()
            },
            &config,
            date!(2025 - 08 - 11),
        );

        assert_eq!(request.preset, TargetPreset::Elementary);
        assert_eq!(request.notices.len(), 1);
    }

    #[test]
    fn risky_only_accepts_checkbox_values() {
        for value in ["on", "true", "1"] {
            let request = request(DashboardQuery {
                risky_only: Some(value.to_string()),
                ..Default::default()
            });
            assert!(request.options.risky_only);
        }

        let request = request(DashboardQuery {
            risky_only: Some("off".to_string()),
            ..Default::default()
        });
        assert!(!request.options.risky_only);
    }

    #[test]
    fn build_prefers_requested_slot_and_lists_all() {
        let records = vec![
            MealRecord {
                meal_slot: Some("조식".to_string()),
                dishes: Some("토스트(1,2)".to_string()),
                ..Default::default()
            },
            MealRecord {
                meal_slot: Some("중식".to_string()),
                dishes: Some("쌀밥<br/>어묵국(5,6)".to_string()),
                school: Some("서울고등학교".to_string()),
                origin: Some("쌀 : 국내산<br/>김치류 : 국내산".to_string()),
                ..Default::default()
            },
        ];

        let dashboard = Dashboard::build(&records, &request(DashboardQuery::default()));

        assert_eq!(dashboard.meal_slot.as_deref(), Some("중식"));
        assert_eq!(dashboard.available_slots, vec!["조식", "중식"]);
        assert_eq!(dashboard.school.as_deref(), Some("서울고등학교"));
        assert_eq!(dashboard.origin, vec!["쌀 : 국내산", "김치류 : 국내산"]);
        let view = dashboard.view.expect("meal view");
        assert_eq!(view.menu.total_items, 2);
    }

    #[test]
    fn build_without_records_has_no_meal() {
        let dashboard = Dashboard::build(&[], &request(DashboardQuery::default()));

        assert!(!dashboard.has_meal());
        assert!(dashboard.meal_slot.is_none());
        assert!(dashboard.available_slots.is_empty());
        assert_eq!(dashboard.date, "2025-08-11");
    }
}
