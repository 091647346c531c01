use anyhow::Result;

use crate::cli::shutdown_signal;
use lunchguide::AppState;

pub async fn serve(
    config: lunchguide::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting lunchguide server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    if !config.neis.is_configured() {
        tracing::warn!("NEIS school is not configured, every day will show as empty");
    }

    let meals = lunchguide::meal_source(&config)?;
    tracing::info!(
        upstream = %config.neis.base_url,
        cache_ttl_secs = config.cache.ttl_secs,
        "Meal source ready"
    );

    let app = lunchguide::create_app(AppState { config, meals });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}
