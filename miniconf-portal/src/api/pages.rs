//! Site page handlers
//!
//! All dynamic pages share the `/:page` route; the segment is parsed into a
//! [`Route`] and rendered from the shared site context.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::error::ApiError;
use crate::pages::Pages;
use crate::routes::{Page, Route};
use crate::{AppState, FAVICON};

/// GET /
pub async fn index_redirect() -> Redirect {
    Redirect::to(&Route::Page(Page::Index).path())
}

/// GET /:page
pub async fn serve_page(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, ApiError> {
    let route = Route::parse(&segment)
        .ok_or_else(|| ApiError::NotFound(format!("page '{}'", segment)))?;

    // Markdown pages read from disk, so render off the async workers
    let (route, rendered) = tokio::task::spawn_blocking(move || {
        let pages = Pages::new(&state.site, &state.pages_dir);
        pages
            .render(&route, state.renderer.as_ref())
            .map(|rendered| (route, rendered))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Render task failed: {}", e)))??;
    debug!("Served {} ({} bytes)", route, rendered.body.len());

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, rendered.kind.mime())],
        rendered.body,
    )
        .into_response())
}

/// GET /favicon.ico
pub async fn serve_favicon(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.site.root().join(FAVICON);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(FAVICON.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/vnd.microsoft.icon")],
        bytes,
    )
        .into_response())
}
