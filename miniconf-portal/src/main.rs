//! MiniConf portal - Main entry point
//!
//! Loads a conference site data directory, indexes it, and either serves the
//! portal over HTTP or freezes it into a static build directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use miniconf_common::config::{load_config, PortalSettings, SettingsOverrides};
use miniconf_common::SiteContext;
use miniconf_portal::{build_router, freeze, AppState};

/// Command-line arguments for miniconf
#[derive(Parser, Debug)]
#[command(name = "miniconf")]
#[command(about = "Conference portal: serve or freeze a MiniConf site")]
#[command(version)]
struct Args {
    /// Site data directory
    #[arg(env = "MINICONF_SITE_DATA")]
    path: Option<PathBuf>,

    /// Freeze the site into the build directory instead of serving
    #[arg(short, long)]
    build: bool,

    /// TOML config file
    #[arg(short, long, env = "MINICONF_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MINICONF_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "MINICONF_HOST")]
    host: Option<String>,

    /// Directory holding Home.md, registration.md and call bodies
    #[arg(long, env = "MINICONF_PAGES_DIR")]
    pages_dir: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long, env = "MINICONF_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Output directory for --build
    #[arg(long, env = "MINICONF_BUILD_DIR")]
    build_dir: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, env = "MINICONF_DEBUG")]
    debug: bool,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            site_data: self.path.clone(),
            pages_dir: self.pages_dir.clone(),
            static_dir: self.static_dir.clone(),
            build_dir: self.build_dir.clone(),
            host: self.host.clone(),
            port: self.port,
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let settings = PortalSettings::resolve(args.overrides(), &loaded.config)?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MiniConf portal v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &loaded.source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => warn!("No config file found, using defaults"),
    }
    info!("Site data: {}", settings.site_data.display());

    let site = SiteContext::load(&settings.site_data).with_context(|| {
        format!(
            "Failed to load site data from {}",
            settings.site_data.display()
        )
    })?;

    let state = AppState::new(
        site,
        settings.pages_dir.clone(),
        settings.static_dir.clone(),
    );

    if args.build {
        let report = freeze::freeze(&state, &settings.build_dir).with_context(|| {
            format!("Failed to freeze site into {}", settings.build_dir.display())
        })?;
        info!(
            "Static site written to {} ({} pages, {} assets)",
            settings.build_dir.display(),
            report.pages,
            report.assets
        );
        return Ok(());
    }

    info!("Watching {} source files", state.watch_paths().len());

    let app = build_router(state);
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("miniconf listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
