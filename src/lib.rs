pub mod config;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod template;

use std::{sync::Arc, time::Duration};

use axum::Router;
use lunchguide_neis::{CachedMealSource, MealSource, NeisClient};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub use config::Config;
pub use routes::AppState;

/// NEIS client wrapped in the TTL cache described by `config.cache`.
pub fn meal_source(config: &Config) -> anyhow::Result<Arc<dyn MealSource>> {
    let client = NeisClient::new(config.neis.settings())?;

    Ok(Arc::new(CachedMealSource::new(
        client,
        Duration::from_secs(config.cache.ttl_secs),
        config.cache.max_entries,
    )))
}

/// Create app router
///
/// Routes plus the cache-control, compression and trace layers. Used by the
/// server and by integration tests with a stub [`MealSource`].
pub fn create_app(state: AppState) -> Router {
    routes::router(state)
        .layer(axum::middleware::from_fn(
            middleware::cache_control_middleware,
        ))
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http())
}
