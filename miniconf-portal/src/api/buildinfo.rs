//! Build information API endpoint
//!
//! Provides version and build metadata, plus a summary of the loaded site

use axum::{extract::State, response::Json};
use serde::Serialize;

use miniconf_common::EntityKind;

use crate::AppState;

/// Build information response
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub build_timestamp: String,
    pub build_profile: String,
    /// Number of loaded datasets
    pub datasets: usize,
    /// Number of indexed papers
    pub papers: usize,
    /// Number of schedule days
    pub days: usize,
}

/// GET /api/buildinfo
pub async fn get_build_info(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(BuildInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        datasets: state.site.site_data().len(),
        papers: state.site.by_uid().len(EntityKind::Papers),
        days: state.site.by_date().len(),
    })
}
