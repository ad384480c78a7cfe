//! Static export
//!
//! Renders every route of the site into a build directory so it can be
//! hosted without the portal process. Uses the same [`Pages`] builder as the
//! HTTP handlers, so served and exported pages are identical.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use miniconf_common::{EntityKind, Error, Result, SiteContext};

use crate::pages::Pages;
use crate::routes::{Page, Route};
use crate::{AppState, FAVICON};

/// Summary of a finished export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeReport {
    /// Rendered routes written
    pub pages: usize,
    /// Static files copied (favicon included)
    pub assets: usize,
}

/// Every route of the site, in export order
pub fn enumerate_routes(site: &SiteContext) -> Vec<Route> {
    let mut routes: Vec<Route> = Page::ALL.into_iter().map(Route::Page).collect();
    routes.push(Route::PapersJson);

    let by_uid = site.by_uid();
    routes.extend(
        by_uid
            .uids(EntityKind::Papers)
            .into_iter()
            .map(|uid| Route::Poster(uid.to_string())),
    );
    routes.extend(
        by_uid
            .uids(EntityKind::Workshops)
            .into_iter()
            .map(|uid| Route::Workshop(uid.to_string())),
    );
    routes.extend(site.site_data().names().map(|name| Route::Serve(name.to_string())));
    routes
}

/// Render the whole site into `build_dir`
///
/// The first failing route aborts the export.
pub fn freeze(state: &AppState, build_dir: &Path) -> Result<FreezeReport> {
    fs::create_dir_all(build_dir).map_err(|e| Error::io(build_dir, e))?;

    let pages = Pages::new(&state.site, &state.pages_dir);
    let mut report = FreezeReport::default();

    for route in enumerate_routes(&state.site) {
        let file_name = route.file_name();
        ensure_safe_segment(&file_name)?;

        let rendered = pages.render(&route, state.renderer.as_ref())?;
        let target = build_dir.join(&file_name);
        fs::write(&target, rendered.body).map_err(|e| Error::io(&target, e))?;
        debug!("Wrote {}", target.display());
        report.pages += 1;
    }

    if state.static_dir.is_dir() {
        report.assets += copy_dir(&state.static_dir, &build_dir.join("static"))?;
    } else {
        info!(
            "Static directory {} not found, skipping assets",
            state.static_dir.display()
        );
    }

    let favicon = state.site.root().join(FAVICON);
    if favicon.is_file() {
        let target = build_dir.join(FAVICON);
        fs::copy(&favicon, &target).map_err(|e| Error::io(&favicon, e))?;
        report.assets += 1;
    }

    info!(
        "Froze {} pages and {} assets into {}",
        report.pages,
        report.assets,
        build_dir.display()
    );
    Ok(report)
}

/// Reject file names that would escape the build directory
fn ensure_safe_segment(file_name: &str) -> Result<()> {
    let unsafe_name = file_name.is_empty()
        || file_name.contains(['/', '\\', '\0'])
        || file_name.starts_with('.');
    if unsafe_name {
        return Err(Error::Export(format!(
            "Refusing to write '{}': not a single safe path segment",
            file_name
        )));
    }
    Ok(())
}

/// Recursively copy `from` into `to`, returning the number of files copied
fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(from, e))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| Error::Export(format!("{}: {}", entry.path().display(), e)))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
            copied += 1;
        } else {
            debug!("Skipping {} (not a regular file)", entry.path().display());
        }
    }

    Ok(copied)
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(source) => Error::io(path, source),
        None => Error::Export(format!("Filesystem loop under {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_segments() {
        assert!(ensure_safe_segment("poster_p1.html").is_ok());
        assert!(ensure_safe_segment("poster_../x.html").is_err());
        assert!(ensure_safe_segment("serve_a\\b.json").is_err());
        assert!(ensure_safe_segment(".hidden").is_err());
    }

    #[test]
    fn test_copy_dir_nested() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let from = temp_dir.path().join("static");
        fs::create_dir_all(from.join("js").join("vendor")).unwrap();
        fs::create_dir_all(from.join("empty")).unwrap();
        fs::write(from.join("site.css"), "a").unwrap();
        fs::write(from.join("js").join("app.js"), "b").unwrap();
        fs::write(from.join("js").join("vendor").join("lib.js"), "c").unwrap();

        let to = temp_dir.path().join("build").join("static");
        assert_eq!(copy_dir(&from, &to).unwrap(), 3);
        assert_eq!(fs::read_to_string(to.join("js/vendor/lib.js")).unwrap(), "c");
        assert!(to.join("empty").is_dir());
    }
}
