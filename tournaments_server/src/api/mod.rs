//! HTTP API for the tournament registry.
//!
//! # Modules
//!
//! - [`tournament`]: Tournament lifecycle (create, list, read, replace, delete)
//! - [`player`]: Player registration and maintenance
//! - [`error`]: Registry errors rendered as problem-detail JSON
//! - [`request_id`]: Request ID tagging for log correlation
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                           - Health check
//! POST   /api/tournaments                  - Create tournament
//! GET    /api/tournaments                  - List tournaments
//! GET    /api/tournaments/{id}             - Get tournament
//! PUT    /api/tournaments/{id}             - Replace tournament
//! DELETE /api/tournaments/{id}             - Delete tournament and its players
//! GET    /api/tournaments/{id}/players     - List a tournament's players
//! POST   /api/players                      - Register player
//! GET    /api/players                      - List players
//! GET    /api/players/{id}                 - Get player
//! PUT    /api/players/{id}                 - Update player
//! DELETE /api/players/{id}                 - Delete player
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tournaments::clock::SystemClock;
//! use tournaments_server::api::{AppState, create_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::in_memory(Arc::new(SystemClock));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod error;
pub mod player;
pub mod request_id;
pub mod tournament;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use tournaments::clock::Clock;
use tournaments::db::{Database, InMemoryStore, PgPlayerRepository, PgTournamentRepository};
use tournaments::{PlayerRegistrar, TournamentRegistry};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub tournaments: Arc<TournamentRegistry>,
    pub players: Arc<PlayerRegistrar>,
    /// Present when the registries run on PostgreSQL
    pub database: Option<Database>,
}

impl AppState {
    /// Wire both registries over a fresh in-memory store
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let tournaments = Arc::new(TournamentRegistry::new(
            store.clone(),
            store.clone(),
            clock.clone(),
        ));
        let players = Arc::new(PlayerRegistrar::new(store, tournaments.clone(), clock));

        Self {
            tournaments,
            players,
            database: None,
        }
    }

    /// Wire both registries over PostgreSQL
    pub fn postgres(database: Database, clock: Arc<dyn Clock>) -> Self {
        let tournament_repo = Arc::new(PgTournamentRepository::new(database.pool().clone()));
        let player_repo = Arc::new(PgPlayerRepository::new(database.pool().clone()));
        let tournaments = Arc::new(TournamentRegistry::new(
            tournament_repo,
            player_repo.clone(),
            clock.clone(),
        ));
        let players = Arc::new(PlayerRegistrar::new(
            player_repo,
            tournaments.clone(),
            clock,
        ));

        Self {
            tournaments,
            players,
            database: Some(database),
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let tournament_routes = Router::new()
        .route(
            "/",
            get(tournament::list_tournaments).post(tournament::create_tournament),
        )
        .route(
            "/{id}",
            get(tournament::get_tournament)
                .put(tournament::update_tournament)
                .delete(tournament::delete_tournament),
        )
        .route("/{id}/players", get(tournament::list_tournament_players));

    let player_routes = Router::new()
        .route("/", get(player::list_players).post(player::register_player))
        .route(
            "/{id}",
            get(player::get_player)
                .put(player::update_player)
                .delete(player::delete_player),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/tournaments", tournament_routes)
        .nest("/api/players", player_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id::request_id_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the store is reachable, or `503 Service Unavailable`
/// when the database check fails.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","storage":"postgres","database":true,"timestamp":"2031-03-20T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (storage, healthy) = match &state.database {
        Some(db) => ("postgres", db.health_check().await.is_ok()),
        None => ("memory", true),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
        "database": healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
