#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use lunchguide::{
    AppState, Config,
    config::{CacheConfig, DashboardConfig, NeisConfig, ObservabilityConfig, ServerConfig},
};
use lunchguide_neis::{FetchError, MealRecord, MealSource};
use time::Date;
use tower::ServiceExt;

pub struct StubMeals {
    records: Vec<MealRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubMeals {
    pub fn with(records: Vec<MealRecord>) -> Self {
        Self {
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MealSource for StubMeals {
    async fn fetch_day(&self, _date: Date) -> Result<Vec<MealRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            return Err(FetchError::Decode(err));
        }

        Ok(self.records.clone())
    }
}

/// Breakfast and lunch for one school day.
pub fn school_day() -> Vec<MealRecord> {
    vec![
        MealRecord {
            meal_slot: Some("조식".to_string()),
            dishes: Some("토스트(1,2,6)<br/>우유(2)".to_string()),
            calories: Some("450.0 Kcal".to_string()),
            ..Default::default()
        },
        MealRecord {
            meal_slot: Some("중식".to_string()),
            dishes: Some("쌀밥<br/>어묵국(5,6,13)<br/>배추김치(9,13)<br/>사과".to_string()),
            calories: Some("824.00 Kcal".to_string()),
            nutrients: Some(
                "탄수화물(g) : 120 / 단백질(g) : 35 / 지방(g) : 22 / 칼슘(mg) : 250".to_string(),
            ),
            served_on: Some("20250811".to_string()),
            school: Some("서울고등학교".to_string()),
            origin: Some("쌀 : 국내산<br/>김치류 : 국내산".to_string()),
        },
    ]
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        neis: NeisConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            key: String::new(),
            atpt_code: "B10".to_string(),
            school_code: "7010569".to_string(),
            timeout_secs: 1,
            page_size: 100,
        },
        cache: CacheConfig::default(),
        dashboard: DashboardConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub fn create_test_app(meals: Arc<StubMeals>) -> Router {
    create_test_app_with(test_config(), meals)
}

pub fn create_test_app_with(config: Config, meals: Arc<StubMeals>) -> Router {
    lunchguide::create_app(AppState { config, meals })
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body_bytes.to_vec()).unwrap()
}
