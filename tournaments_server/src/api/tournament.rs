//! Tournament API handlers.
//!
//! This module provides HTTP REST endpoints for tournament operations including:
//! - Creating a tournament (always starts `UPCOMING`)
//! - Listing and reading tournaments
//! - Replacing a tournament, status included
//! - Deleting a tournament together with its players
//! - Listing the players registered in a tournament
//!
//! # Examples
//!
//! Create a tournament:
//! ```bash
//! curl -X POST http://localhost:8080/api/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Spring Cup", "gameTitle": "Tekken 8", "maxPlayers": 16, "startDate": "2031-04-01"}'
//! ```
//!
//! Start it:
//! ```bash
//! curl -X PUT http://localhost:8080/api/tournaments/1 \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Spring Cup", "gameTitle": "Tekken 8", "maxPlayers": 16, "startDate": "2031-04-01", "status": "STARTED"}'
//! ```

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tournaments::{NewTournament, Tournament, TournamentId, TournamentStatus, TournamentUpdate};

use super::AppState;
use super::error::ApiResult;
use super::player::PlayerResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentPayload {
    pub name: String,
    pub game_title: String,
    pub max_players: i32,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTournamentPayload {
    pub name: String,
    pub game_title: String,
    pub max_players: i32,
    pub start_date: Option<NaiveDate>,
    pub status: TournamentStatus,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentResponse {
    pub id: TournamentId,
    pub name: String,
    pub game_title: String,
    pub max_players: i32,
    pub start_date: Option<NaiveDate>,
    pub status: TournamentStatus,
}

impl From<Tournament> for TournamentResponse {
    fn from(t: Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name,
            game_title: t.game_title,
            max_players: t.max_players,
            start_date: t.start_date,
            status: t.status,
        }
    }
}

impl From<CreateTournamentPayload> for NewTournament {
    fn from(p: CreateTournamentPayload) -> Self {
        Self {
            name: p.name,
            game_title: p.game_title,
            max_players: p.max_players,
            start_date: p.start_date,
        }
    }
}

impl From<UpdateTournamentPayload> for TournamentUpdate {
    fn from(p: UpdateTournamentPayload) -> Self {
        Self {
            name: p.name,
            game_title: p.game_title,
            max_players: p.max_players,
            start_date: p.start_date,
            status: p.status,
        }
    }
}

/// Create a tournament.
///
/// # Response
///
/// Returns `201 Created` with the stored tournament:
/// ```json
/// {
///   "id": 1,
///   "name": "Spring Cup",
///   "gameTitle": "Tekken 8",
///   "maxPlayers": 16,
///   "startDate": "2031-04-01",
///   "status": "UPCOMING"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or past start date, fewer than two seats
/// - `409 Conflict`: Name already in use
pub async fn create_tournament(
    State(state): State<AppState>,
    payload: Result<Json<CreateTournamentPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TournamentResponse>)> {
    let Json(payload) = payload?;
    let tournament = state.tournaments.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(tournament.into())))
}

/// List every tournament.
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TournamentResponse>>> {
    let tournaments = state.tournaments.find_all().await?;
    Ok(Json(tournaments.into_iter().map(Into::into).collect()))
}

/// Get one tournament.
///
/// # Errors
///
/// - `404 Not Found`: Tournament does not exist
pub async fn get_tournament(
    State(state): State<AppState>,
    path: Result<Path<TournamentId>, PathRejection>,
) -> ApiResult<Json<TournamentResponse>> {
    let Path(id) = path?;
    let tournament = state.tournaments.find_by_id(id).await?;
    Ok(Json(tournament.into()))
}

/// Replace a tournament.
///
/// Every field is overwritten, status included. Creation checks are not
/// repeated here.
///
/// # Errors
///
/// - `404 Not Found`: Tournament does not exist
/// - `409 Conflict`: Tournament has started
pub async fn update_tournament(
    State(state): State<AppState>,
    path: Result<Path<TournamentId>, PathRejection>,
    payload: Result<Json<UpdateTournamentPayload>, JsonRejection>,
) -> ApiResult<Json<TournamentResponse>> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let tournament = state.tournaments.update(id, payload.into()).await?;
    Ok(Json(tournament.into()))
}

/// Delete a tournament and its players.
///
/// # Errors
///
/// - `404 Not Found`: Tournament does not exist
/// - `409 Conflict`: Tournament has started
pub async fn delete_tournament(
    State(state): State<AppState>,
    path: Result<Path<TournamentId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.tournaments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the players registered in a tournament.
///
/// # Errors
///
/// - `404 Not Found`: Tournament does not exist
pub async fn list_tournament_players(
    State(state): State<AppState>,
    path: Result<Path<TournamentId>, PathRejection>,
) -> ApiResult<Json<Vec<PlayerResponse>>> {
    let Path(id) = path?;
    let players = state.tournaments.list_players(id).await?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}
