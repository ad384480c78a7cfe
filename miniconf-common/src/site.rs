//! Immutable site context
//!
//! Built once at startup from the site data directory and shared read-only
//! with every consumer (HTTP handlers, page builders, static export).

use std::path::{Path, PathBuf};

use tracing::info;

use crate::index::{build_indexes, ByUid};
use crate::loader::{load_site_data, Datasets, LoadedContent};
use crate::schedule::ByDate;
use crate::Result;

/// Everything the portal knows about the conference
#[derive(Debug, Clone)]
pub struct SiteContext {
    root: PathBuf,
    site_data: Datasets,
    by_uid: ByUid,
    by_date: ByDate,
    watch_paths: Vec<PathBuf>,
}

impl SiteContext {
    /// Load and index a site data directory
    ///
    /// Fails on the first unreadable file, malformed dataset or invalid
    /// entity; there is no partially loaded site.
    pub fn load(dir: &Path) -> Result<Self> {
        let LoadedContent {
            datasets,
            watch_paths,
        } = load_site_data(dir)?;
        let context = Self::from_datasets(dir, datasets, watch_paths)?;
        info!("Data successfully loaded from {}", dir.display());
        Ok(context)
    }

    /// Index already-parsed datasets
    pub fn from_datasets(
        root: impl Into<PathBuf>,
        site_data: Datasets,
        watch_paths: Vec<PathBuf>,
    ) -> Result<Self> {
        let (by_uid, by_date) = build_indexes(&site_data)?;
        Ok(Self {
            root: root.into(),
            site_data,
            by_uid,
            by_date,
            watch_paths,
        })
    }

    /// Directory the site data was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw datasets, exactly as parsed
    pub fn site_data(&self) -> &Datasets {
        &self.site_data
    }

    pub fn by_uid(&self) -> &ByUid {
        &self.by_uid
    }

    pub fn by_date(&self) -> &ByDate {
        &self.by_date
    }

    /// Files a development server may watch to trigger a restart
    pub fn watch_paths(&self) -> &[PathBuf] {
        &self.watch_paths
    }
}
