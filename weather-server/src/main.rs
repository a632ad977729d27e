//! Binary crate for the weather HTTP API.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use weather_core::{Config, FallbackPolicy, WeatherService};
use weather_server::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let service = Arc::new(WeatherService::from_config(&config)?);
    service.spawn_cache_sweeper(config.cache_sweep_period);

    let mode = match service.fallback_policy() {
        FallbackPolicy::Always => "demo (synthetic data)",
        _ => "live",
    };
    tracing::info!(
        mode,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting weather service"
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("weather server listening on {addr}");

    let app = routes::app(service);
    axum::serve(listener, app).await?;

    Ok(())
}
