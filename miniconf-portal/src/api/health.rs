//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// `config.name` of the loaded site, if set
    pub site: Option<String>,
}

/// GET /health
///
/// The site is loaded before the listener starts, so a responding portal is
/// always healthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let site = state
        .site
        .site_data()
        .get("config")
        .and_then(|config| config.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Json(HealthResponse {
        status: "ok",
        module: "miniconf-portal",
        version: env!("CARGO_PKG_VERSION"),
        site,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
