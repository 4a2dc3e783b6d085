//! mdist-rw (Release Workflow) - release submission and review service
//!
//! Serves the submission wizard, owner catalog and admin review API on top of
//! the shared mdist.db.

use anyhow::{Context, Result};
use clap::Parser;
use mdist_common::config::{
    default_config_path, prepare_root_folder, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV,
};
use mdist_common::db::init_database;
use mdist_common::EventBus;
use mdist_rw::collaborators::{LocalAssetStore, RandomIdentifierGenerator};
use mdist_rw::settings::RuntimeSettings;
use mdist_rw::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(Parser, Debug)]
#[command(name = "mdist-rw", version, about = "mdist release workflow service")]
struct Args {
    /// Root folder holding mdist.db and uploaded assets
    #[arg(long, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("mdist-rw.toml"));
    let config = match config_path.as_deref() {
        Some(path) if path.exists() => TomlConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        _ => TomlConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    // Build identification before any database work
    info!(
        "Starting mdist Release Workflow (mdist-rw) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    info!("Root folder: {}", root_folder.display());

    let db_path = prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let settings = RuntimeSettings::load(&pool).await?;
    info!(
        "Release lead time: {} days, event bus capacity: {}",
        settings.release_min_lead_days, settings.event_bus_capacity
    );
    let event_bus = EventBus::new(settings.event_bus_capacity);

    let asset_dir = config
        .assets
        .directory
        .clone()
        .unwrap_or_else(|| root_folder.join("assets"));
    info!("Asset directory: {}", asset_dir.display());

    let identifiers = Arc::new(RandomIdentifierGenerator::new(
        config.identifiers.isrc_registrant.clone(),
    ));

    let state = AppState::new(
        pool,
        event_bus,
        settings,
        identifiers,
        LocalAssetStore::new(asset_dir),
    );
    state.sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", config.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("mdist-rw listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
