//! Integration tests for the HTTP API.
//!
//! The router runs over the in-memory store with a pinned clock, so no
//! database or socket is needed.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tournaments::clock::FixedClock;
use tournaments_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};
use tower::ServiceExt; // For `oneshot` method

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2031, 3, 15).unwrap()
}

/// Helper to create a test server over a fresh store
fn create_test_server() -> axum::Router {
    create_router(AppState::in_memory(Arc::new(FixedClock(today()))))
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn cup(name: &str, max_players: i32) -> Value {
    json!({
        "name": name,
        "gameTitle": "Tekken 8",
        "maxPlayers": max_players,
        "startDate": "2031-03-20"
    })
}

fn entrant(nick_name: &str, tournament_id: i64) -> Value {
    json!({
        "name": format!("Player {nick_name}"),
        "nickName": nick_name,
        "tournamentId": tournament_id,
        "registrationDate": "2031-03-15"
    })
}

async fn create_cup(app: &axum::Router, name: &str, max_players: i32) -> i64 {
    let (status, body) = send(app, "POST", "/api/tournaments", Some(cup(name, max_players))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server();

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
}

// ============================================================================
// Tournament Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_read_tournament() {
    let app = create_test_server();

    let (status, created) = send(&app, "POST", "/api/tournaments", Some(cup("Cup", 8))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "UPCOMING");
    assert_eq!(created["gameTitle"], "Tekken 8");
    assert_eq!(created["maxPlayers"], 8);
    assert_eq!(created["startDate"], "2031-03-20");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/tournaments/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, all) = send(&app, "GET", "/api/tournaments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_tournament_validation_errors() {
    let app = create_test_server();

    let (status, body) = send(&app, "POST", "/api/tournaments", Some(cup("Solo", 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Bad Request");
    assert_eq!(body["detail"], "The minimum number of players is 2");

    let past = json!({
        "name": "Past",
        "gameTitle": "Tekken 8",
        "maxPlayers": 4,
        "startDate": "2031-03-14"
    });
    let (status, body) = send(&app, "POST", "/api/tournaments", Some(past)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "The start date can not be in the past");

    let undated = json!({ "name": "Undated", "gameTitle": "Tekken 8", "maxPlayers": 4 });
    let (status, body) = send(&app, "POST", "/api/tournaments", Some(undated)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "The start date is required");
}

#[tokio::test]
async fn test_duplicate_tournament_name_conflicts() {
    let app = create_test_server();
    create_cup(&app, "Cup", 4).await;

    let (status, body) = send(&app, "POST", "/api/tournaments", Some(cup("Cup", 4))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "The tournament name already exists");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_test_server();

    let (status, body) = send(
        &app,
        "POST",
        "/api/tournaments",
        Some(json!({ "name": "Cup" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_non_numeric_id_is_problem_detail() {
    let app = create_test_server();

    let (status, body) = send(&app, "GET", "/api/tournaments/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Bad Request");
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, "DELETE", "/api/players/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_missing_tournament_is_not_found() {
    let app = create_test_server();

    let (status, body) = send(&app, "GET", "/api/tournaments/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "Not Found");
    assert_eq!(body["detail"], "The tournament does not exist");

    let (status, _) = send(&app, "GET", "/api/tournaments/42/players", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/tournaments/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_started_tournament_is_locked() {
    let app = create_test_server();
    let id = create_cup(&app, "Cup", 4).await;

    let start = json!({
        "name": "Cup",
        "gameTitle": "Tekken 8",
        "maxPlayers": 4,
        "startDate": "2031-03-20",
        "status": "STARTED"
    });
    let (status, body) = send(&app, "PUT", &format!("/api/tournaments/{id}"), Some(start.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "STARTED");

    let (status, body) = send(&app, "PUT", &format!("/api/tournaments/{id}"), Some(start)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "The Tournament has started");

    let (status, _) = send(&app, "DELETE", &format!("/api/tournaments/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", "/api/players", Some(entrant("ryu", id))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_tournament_removes_players() {
    let app = create_test_server();
    let id = create_cup(&app, "Cup", 4).await;
    let (status, player) = send(&app, "POST", "/api/players", Some(entrant("ryu", id))).await;
    assert_eq!(status, StatusCode::CREATED);
    let player_id = player["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/tournaments/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", &format!("/api/players/{player_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Player Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_list_players() {
    let app = create_test_server();
    let id = create_cup(&app, "Cup", 4).await;

    let (status, player) = send(&app, "POST", "/api/players", Some(entrant("ryu", id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(player["nickName"], "ryu");
    assert_eq!(player["tournamentId"], id);
    assert_eq!(player["registrationDate"], "2031-03-15");

    let (status, roster) = send(&app, "GET", &format!("/api/tournaments/{id}/players"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().unwrap().len(), 1);

    let (status, all) = send(&app, "GET", "/api/players", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, roster);
}

#[tokio::test]
async fn test_full_tournament_rejects_registration() {
    let app = create_test_server();
    let id = create_cup(&app, "Duo", 2).await;

    send(&app, "POST", "/api/players", Some(entrant("ryu", id))).await;
    send(&app, "POST", "/api/players", Some(entrant("ken", id))).await;
    let (status, body) = send(&app, "POST", "/api/players", Some(entrant("chun", id))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["title"], "Conflict");
    assert_eq!(body["detail"], "The tournament is full");
}

#[tokio::test]
async fn test_duplicate_nickname_conflicts() {
    let app = create_test_server();
    let first = create_cup(&app, "First", 4).await;
    let second = create_cup(&app, "Second", 4).await;

    send(&app, "POST", "/api/players", Some(entrant("ace", first))).await;
    let (status, body) = send(&app, "POST", "/api/players", Some(entrant("ace", first))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "The nickname is already taken in this tournament");

    let (status, _) = send(&app, "POST", "/api/players", Some(entrant("ace", second))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_registration_after_start_is_bad_request() {
    let app = create_test_server();
    let id = create_cup(&app, "Cup", 4).await;

    let late = json!({
        "name": "Late",
        "nickName": "late",
        "tournamentId": id,
        "registrationDate": "2031-03-21"
    });
    let (status, _) = send(&app, "POST", "/api/players", Some(late)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_player() {
    let app = create_test_server();
    let id = create_cup(&app, "Cup", 4).await;
    let (_, player) = send(&app, "POST", "/api/players", Some(entrant("ryu", id))).await;
    let player_id = player["id"].as_i64().unwrap();

    let update = json!({
        "name": "Ryu Hoshi",
        "nickName": "wanderer",
        "tournamentId": 999,
        "registrationDate": "2031-03-16"
    });
    let (status, updated) = send(&app, "PUT", &format!("/api/players/{player_id}"), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nickName"], "wanderer");
    assert_eq!(updated["tournamentId"], id);

    let (status, _) = send(&app, "DELETE", &format!("/api/players/{player_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &format!("/api/players/{player_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "The player does not exist");
}
