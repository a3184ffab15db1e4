/// NASA Space Viewer: Astronomy Picture of the Day with archive fallback
mod clients;
mod config;
mod domain;
mod errors;
mod handlers;
mod routes;
mod services;
mod utils;

use crate::clients::NasaClient;
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::routes::build_router;
use crate::services::{ApodService, ViewController};
use crate::utils::{RandomArchiveDate, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        url = %config.apod_api_url,
        max_attempts = ?config.max_attempts,
        "Configuration loaded successfully"
    );

    // Initialize client and services
    let nasa_client = NasaClient::new(
        config.apod_api_url.clone(),
        config.nasa_api_key.clone(),
        Duration::from_secs(config.http_timeout_seconds),
    )?;
    let service = ApodService::new(
        Arc::new(nasa_client),
        Arc::new(RandomArchiveDate::new(SystemClock)),
        config.max_attempts,
    );
    let controller = Arc::new(ViewController::new(service, Arc::new(SystemClock)));

    // View activation: today's picture, finished in the background
    controller.spawn_chain(None, false).await;

    let app = build_router(AppState { controller });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("nasa_space_viewer listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
