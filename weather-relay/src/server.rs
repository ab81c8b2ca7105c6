//! HTTP surface: `GET /weather` and `GET /health`.

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use weather_core::{Config, OpenMeteoProvider, WeatherProvider, WeatherQuery, respond};

/// Shared per-process state; the provider is the only thing handlers need.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(weather_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let provider = OpenMeteoProvider::new(&config.upstream)?;
    let app = router(AppState::new(Arc::new(provider)));

    let listener = TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;

    tracing::info!(
        "weather relay listening on {} (geocoding={}, forecast={})",
        listener.local_addr()?,
        config.upstream.geocoding_url,
        config.upstream.forecast_url,
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("weather relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::warn!("cannot listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn weather_handler(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> impl IntoResponse {
    // Repeated keys keep their first value; an unparseable query string is
    // treated like a missing one.
    let query = match pairs {
        Ok(Query(pairs)) => WeatherQuery::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!("unreadable query string: {}", rejection);
            WeatherQuery::default()
        }
    };

    let reply = respond(state.provider.as_ref(), &query).await;
    let status =
        StatusCode::from_u16(reply.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(reply.body))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
