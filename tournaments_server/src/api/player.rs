//! Player API handlers.
//!
//! Registration, lookup, update, and removal of players. A player's
//! tournament is fixed at registration; a `tournamentId` sent on update is
//! ignored.
//!
//! # Examples
//!
//! Register a player:
//! ```bash
//! curl -X POST http://localhost:8080/api/players \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Danna", "nickName": "Sakura", "tournamentId": 1, "registrationDate": "2031-03-20"}'
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
use tournaments::{NewPlayer, Player, PlayerId, PlayerUpdate, TournamentId};

use super::AppState;
use super::error::ApiResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerPayload {
    pub name: String,
    pub nick_name: String,
    pub tournament_id: TournamentId,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerPayload {
    pub name: String,
    pub nick_name: String,
    pub registration_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: PlayerId,
    pub name: String,
    pub nick_name: String,
    pub tournament_id: TournamentId,
    pub registration_date: NaiveDate,
}

impl From<Player> for PlayerResponse {
    fn from(p: Player) -> Self {
        Self {
            id: p.id,
            name: p.name,
            nick_name: p.nick_name,
            tournament_id: p.tournament_id,
            registration_date: p.registration_date,
        }
    }
}

impl From<CreatePlayerPayload> for NewPlayer {
    fn from(p: CreatePlayerPayload) -> Self {
        Self {
            name: p.name,
            nick_name: p.nick_name,
            tournament_id: p.tournament_id,
            registration_date: p.registration_date,
        }
    }
}

impl From<UpdatePlayerPayload> for PlayerUpdate {
    fn from(p: UpdatePlayerPayload) -> Self {
        Self {
            name: p.name,
            nick_name: p.nick_name,
            registration_date: p.registration_date,
        }
    }
}

/// Register a player into a tournament.
///
/// # Errors
///
/// - `404 Not Found`: Tournament does not exist
/// - `400 Bad Request`: Start date missing or passed, registration dated after start
/// - `409 Conflict`: Tournament full, not upcoming, or nickname taken
pub async fn register_player(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlayerPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PlayerResponse>)> {
    let Json(payload) = payload?;
    let player = state.players.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(player.into())))
}

pub async fn list_players(State(state): State<AppState>) -> ApiResult<Json<Vec<PlayerResponse>>> {
    let players = state.players.read_all().await?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}

pub async fn get_player(
    State(state): State<AppState>,
    path: Result<Path<PlayerId>, PathRejection>,
) -> ApiResult<Json<PlayerResponse>> {
    let Path(id) = path?;
    let player = state.players.read_by_id(id).await?;
    Ok(Json(player.into()))
}

/// Update a player's name, nickname, and registration date.
///
/// # Errors
///
/// - `404 Not Found`: Player or its tournament does not exist
/// - `400 Bad Request`: Registration dated after the tournament start
/// - `409 Conflict`: Nickname taken in the tournament
pub async fn update_player(
    State(state): State<AppState>,
    path: Result<Path<PlayerId>, PathRejection>,
    payload: Result<Json<UpdatePlayerPayload>, JsonRejection>,
) -> ApiResult<Json<PlayerResponse>> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let player = state.players.update(id, payload.into()).await?;
    Ok(Json(player.into()))
}

pub async fn delete_player(
    State(state): State<AppState>,
    path: Result<Path<PlayerId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.players.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
