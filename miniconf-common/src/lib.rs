//! # MiniConf Common Library
//!
//! Shared code for the MiniConf portal including:
//! - Site data loading (JSON, CSV/TSV and YAML datasets)
//! - Record normalization for papers, workshops and tutorials
//! - Identifier and schedule indexes
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod records;
pub mod schedule;
pub mod site;
pub mod time;

pub use error::{Error, Result};
pub use index::{ByUid, EntityKind};
pub use loader::{Datasets, LoadedContent};
pub use records::Record;
pub use schedule::{ByDate, Day, Session};
pub use site::SiteContext;
