use std::sync::Arc;

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use lunchguide_neis::MealSource;

use crate::template::{NotFoundTemplate, Template};

mod api;
mod assets;
mod health;
mod index;

pub use assets::AssetsService;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub meals: Arc<dyn MealSource>,
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    template.render_with_status(StatusCode::NOT_FOUND, NotFoundTemplate)
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/", get(index::page))
        .route("/api/meal", get(api::meal))
        .nest_service("/static", AssetsService::new())
        .fallback(fallback)
        .with_state(app_state)
}
