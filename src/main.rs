//! housing-pricing server
//!
//! Loads configuration from the environment, wires the Anthropic provider
//! into the estimation service and serves the housing routes.

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderValue, Method};
use secrecy::ExposeSecret;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use housing_pricing::adapters::ai::{AnthropicConfig, AnthropicProvider};
use housing_pricing::adapters::http::{housing_router, HousingAppState};
use housing_pricing::application::{EstimationService, EstimationSettings};
use housing_pricing::config::{AppConfig, ConfigError, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let json_logs = config.server.log_format() == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    info!(
        "Starting housing-pricing v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.server.environment
    );

    config.validate().map_err(ConfigError::from)?;

    let api_key = config
        .ai
        .anthropic_api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let provider = AnthropicProvider::new(
        AnthropicConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_tokens(config.ai.max_tokens),
    )?;
    info!("Using model {}", config.ai.model);

    let estimator = EstimationService::new(
        Arc::new(provider),
        EstimationSettings {
            max_tokens: config.ai.max_tokens,
            timeout: config.ai.timeout(),
            max_retries: config.ai.max_retries,
            base_delay: Duration::from_secs(1),
        },
    );

    let app = housing_router()
        .with_state(HousingAppState::new(Arc::new(estimator)))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Allows the configured origins, or any origin when none are configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
