//! Configuration loading and settings resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument or environment variable (clap handles both)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing config file is not an error: startup continues on defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "miniconf.toml";

/// Contents of a `miniconf.toml` file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Directory holding the conference datasets
    pub site_data: Option<PathBuf>,
    /// Directory holding Home.md, registration.md and call bodies
    pub pages_dir: Option<PathBuf>,
    /// Directory served under /static
    pub static_dir: Option<PathBuf>,
    /// Output directory for the static export
    pub build_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub logging: LoggingConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Fallback values used when neither CLI, environment nor TOML set a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub pages_dir: PathBuf,
    pub static_dir: PathBuf,
    pub build_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("."),
            static_dir: PathBuf::from("static"),
            build_dir: PathBuf::from("build"),
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Candidate config file locations, most specific first
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("miniconf").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/miniconf/config.toml"));
    }
    paths
}

/// A loaded config together with the file it came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// `None` when no file was found and defaults apply
    pub source: Option<PathBuf>,
}

/// Load configuration
///
/// An explicitly named file must exist. Otherwise the first existing default
/// location is used, and if there is none the defaults apply. Nothing is
/// logged here because this runs before the tracing subscriber is installed.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths().into_iter().find(|p| p.exists()),
    };

    let config = match &source {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    Ok(LoadedConfig { config, source })
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub site_data: Option<PathBuf>,
    pub pages_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
}

/// Fully resolved portal settings
#[derive(Debug, Clone, PartialEq)]
pub struct PortalSettings {
    pub site_data: PathBuf,
    pub pages_dir: PathBuf,
    pub static_dir: PathBuf,
    pub build_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl PortalSettings {
    /// Merge overrides, TOML and compiled defaults
    ///
    /// The site data directory has no default and must come from somewhere.
    pub fn resolve(overrides: SettingsOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let site_data = overrides
            .site_data
            .or_else(|| toml.site_data.clone())
            .ok_or_else(|| {
                Error::Config(
                    "Site data directory not configured. Pass it as an argument, \
                     set MINICONF_SITE_DATA, or add site_data to miniconf.toml"
                        .to_string(),
                )
            })?;

        let log_level = if overrides.debug {
            "debug".to_string()
        } else {
            toml.logging.level.clone()
        };

        Ok(Self {
            site_data,
            pages_dir: overrides
                .pages_dir
                .or_else(|| toml.pages_dir.clone())
                .unwrap_or(defaults.pages_dir),
            static_dir: overrides
                .static_dir
                .or_else(|| toml.static_dir.clone())
                .unwrap_or(defaults.static_dir),
            build_dir: overrides
                .build_dir
                .or_else(|| toml.build_dir.clone())
                .unwrap_or(defaults.build_dir),
            host: overrides
                .host
                .or_else(|| toml.host.clone())
                .unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            log_level,
        })
    }

    /// Socket address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
