//! miniconf-portal library
//!
//! Serves a loaded conference site over HTTP and exports it as static files.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use miniconf_common::SiteContext;

pub mod api;
pub mod error;
pub mod freeze;
pub mod pages;
pub mod render;
pub mod routes;

use pages::{HOME_MARKDOWN, REGISTRATION_MARKDOWN};
use render::{PageRenderer, ShellRenderer};

/// Favicon file name inside the site data directory
pub const FAVICON: &str = "favicon.ico";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded and indexed site data (read-only)
    pub site: Arc<SiteContext>,
    pub renderer: Arc<dyn PageRenderer>,
    /// Directory holding Home.md, registration.md and call bodies
    pub pages_dir: PathBuf,
    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state with the default renderer
    pub fn new(site: SiteContext, pages_dir: PathBuf, static_dir: PathBuf) -> Self {
        Self {
            site: Arc::new(site),
            renderer: Arc::new(ShellRenderer::default()),
            pages_dir,
            static_dir,
        }
    }

    /// Swap in a different page renderer
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Files a development watcher would track: every site data file plus
    /// the Markdown sources of the home and registration pages
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.site.watch_paths().to_vec();
        paths.push(self.pages_dir.join(HOME_MARKDOWN));
        paths.push(self.pages_dir.join(REGISTRATION_MARKDOWN));
        paths
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(api::index_redirect))
        .route("/favicon.ico", get(api::serve_favicon))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/:page", get(api::serve_page))
        .merge(api::health_routes())
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
