use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{
    lookup_addresses, AddressProvider, JsonFixtureProvider, LookupContext, MockAddressProvider,
};
use shared::{
    error::ErrorCode,
    protocol::{LookupQuery, LookupResponse, LOOKUP_ROUTE},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Clone)]
struct AppState {
    lookup: LookupContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let lookup = build_lookup_context(&settings)?;
    let app = build_router(Arc::new(AppState { lookup }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, latency_ms = settings.lookup_latency_ms, "lookup server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_lookup_context(settings: &Settings) -> anyhow::Result<LookupContext> {
    let provider: Arc<dyn AddressProvider> = match &settings.fixtures_path {
        Some(path) => {
            let fixtures = JsonFixtureProvider::from_path(path).map_err(|error| {
                error!(%path, %error, "failed to load address fixtures");
                error
            })?;
            info!(%path, count = fixtures.len(), "serving addresses from fixtures");
            Arc::new(fixtures)
        }
        None => Arc::new(MockAddressProvider),
    };
    Ok(LookupContext::new(
        provider,
        Duration::from_millis(settings.lookup_latency_ms),
    ))
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(LOOKUP_ROUTE, get(get_addresses))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_addresses(
    State(state): State<Arc<AppState>>,
    query: Option<Query<LookupQuery>>,
) -> (StatusCode, Json<LookupResponse>) {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    match lookup_addresses(&state.lookup, &query).await {
        Ok(details) => (StatusCode::OK, Json(LookupResponse::Ok { details })),
        Err(err) => {
            let status = status_for(err.code);
            if status.is_server_error() {
                error!(message = %err.message, "address lookup failed");
            }
            (status, Json(LookupResponse::from(err)))
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
