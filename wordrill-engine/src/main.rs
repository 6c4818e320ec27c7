//! wordrill - vocabulary drilling service
//!
//! Startup: tracing, build identification, configuration and root folder,
//! database, then the HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{error, info};
use wordrill_common::config::{database_path, resolve_root_folder, WordrillConfig};
use wordrill_common::db::init_database;
use wordrill_engine::{build_router, AppState, WordService};

#[derive(Debug, Parser)]
#[command(name = "wordrill", version, about = "Adaptive vocabulary drilling service")]
struct Args {
    /// Root folder holding wordrill.db (overrides WORDRILL_ROOT and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Path to config.toml (default: platform config locations)
    #[arg(long, env = "WORDRILL_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config file)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config file)
    #[arg(long, env = "WORDRILL_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting wordrill v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = WordrillConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path, config.engine.busy_timeout_ms).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let service = WordService::with_sqlite(
        pool,
        StdRng::from_entropy(),
        config.engine.score_batch_size,
    );
    let app = build_router(AppState::new(service));

    let bind = args.bind.unwrap_or(config.server.bind);
    let port = args.port.unwrap_or(config.server.port);
    let address = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("wordrill listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
