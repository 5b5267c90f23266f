//! Tournament registry HTTP server.
//!
//! Serves the tournament and player registries over JSON, backed by
//! PostgreSQL or, with `--in-memory`, by a process-local store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use log::info;
use pico_args::Arguments;
use tournaments::clock::SystemClock;
use tournaments::db::Database;
use tournaments_server::api::{self, AppState};
use tournaments_server::config::{ServerConfig, StorageBackend};
use tournaments_server::logging;

const HELP: &str = "\
Run the tournament registry server

USAGE:
  tournaments_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/tournaments]

FLAGS:
  --in-memory              Keep everything in memory instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  STORAGE                  postgres (default) or memory
  DB_MAX_CONNECTIONS       Maximum pool size
  DB_MIN_CONNECTIONS       Minimum pool size
  RUST_LOG                 Log filter (e.g., info,tournaments=debug)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs
            .opt_value_from_str("--bind")
            .context("Invalid --bind address")?,
        database_url: pargs
            .opt_value_from_str("--db-url")
            .context("Invalid --db-url")?,
        in_memory: pargs.contains("--in-memory"),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {:?}", remaining);
    }

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.in_memory)?;
    config.validate()?;

    let clock = Arc::new(SystemClock);
    let state = match config.storage {
        StorageBackend::InMemory => {
            info!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(clock)
        }
        StorageBackend::Postgres => {
            info!("Connecting to database");
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            db.apply_schema()
                .await
                .context("Failed to apply database schema")?;
            info!("Database connected successfully");
            AppState::postgres(db, clock)
        }
    };
    let database = state.database.clone();

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
