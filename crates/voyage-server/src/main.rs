//! Voyage Server - hazard-aware route optimization over HTTP

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voyage_server::api;
use voyage_server::config::Config;
use voyage_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voyage_server=debug".parse()?)
                .add_directive("voyage_core=info".parse()?),
        )
        .init();

    tracing::info!("Starting Voyage Server...");

    let config = Config::from_env();
    let port = config.server_port;
    if config.weather_enabled {
        tracing::info!(
            samples = config.weather_samples,
            timeout_s = config.weather_timeout_s,
            "live weather lookup enabled"
        );
    } else {
        tracing::warn!("live weather lookup disabled; requests without hazardZones assume clear weather");
    }
    let state = Arc::new(AppState::new(config));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
