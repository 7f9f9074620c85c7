use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use live_scoreboard::{
    dao::match_store::MemoryMatchStore,
    routes,
    state::{AppState, SharedState},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> (Router, SharedState) {
    let state = AppState::with_store(Arc::new(MemoryMatchStore::new()));
    (routes::router(state.clone()), state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn new_match(home: &str, away: &str) -> Value {
    json!({
        "homeTeam": home,
        "awayTeam": away,
        "stadium": "Arena",
        "week": "1"
    })
}

#[tokio::test]
async fn create_applies_defaults_and_returns_201() {
    let (app, _) = app();
    let (status, body) = call(&app, Method::POST, "/api/matches", Some(new_match("A", "B"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["homeTeam"], "A");
    assert_eq!(body["homePlayers"], json!([]));
    assert_eq!(body["homeScore"], 0);
    assert_eq!(body["time"], "00:00");
    assert_eq!(body["isLive"], true);
}

#[tokio::test]
async fn create_replaces_every_existing_match() {
    let (app, _) = app();
    let (_, first) = call(&app, Method::POST, "/api/matches", Some(new_match("A", "B"))).await;
    let (_, second) = call(&app, Method::POST, "/api/matches", Some(new_match("C", "D"))).await;
    let (_, third) = call(&app, Method::POST, "/api/matches", Some(new_match("E", "F"))).await;

    assert!(third["id"].as_i64() > second["id"].as_i64());
    assert!(second["id"].as_i64() > first["id"].as_i64());

    let (status, list) = call(&app, Method::GET, "/api/matches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([third]));

    let old = format!("/api/matches/{}", first["id"]);
    let (status, body) = call(&app, Method::GET, &old, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Match not found"}));
}

#[tokio::test]
async fn reset_keeps_scores_and_marks_live() {
    let (app, _) = app();
    let mut payload = new_match("A", "B");
    payload["homeScore"] = json!(3);
    payload["awayScore"] = json!(5);
    payload["time"] = json!("05:30");
    let (_, created) = call(&app, Method::POST, "/api/matches", Some(payload)).await;
    let uri = format!("/api/matches/{}", created["id"]);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"time": "12:00", "isLive": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["time"], "12:00");
    assert_eq!(updated["isLive"], true);
    assert_eq!(updated["homeScore"], 3);
    assert_eq!(updated["awayScore"], 5);
}

#[tokio::test]
async fn negative_score_is_clamped_to_zero() {
    let (app, _) = app();
    let (_, created) = call(&app, Method::POST, "/api/matches", Some(new_match("A", "B"))).await;
    let uri = format!("/api/matches/{}", created["id"]);

    let (status, updated) = call(&app, Method::PUT, &uri, Some(json!({"homeScore": -1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["homeScore"], 0);
}

#[tokio::test]
async fn loose_clock_input_is_stored_zero_padded() {
    let (app, _) = app();
    let mut payload = new_match("A", "B");
    payload["time"] = json!(" 9:05 ");
    let (_, created) = call(&app, Method::POST, "/api/matches", Some(payload)).await;
    assert_eq!(created["time"], "09:05");
    let uri = format!("/api/matches/{}", created["id"]);

    for (raw, stored) in [("5:7", "05:07"), (" 05:30 ", "05:30"), ("000:030", "00:30")] {
        let (status, updated) = call(&app, Method::PUT, &uri, Some(json!({"time": raw}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["time"], stored);

        let (_, fetched) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(fetched["time"], stored);
    }
}

#[tokio::test]
async fn update_of_unknown_match_is_404() {
    let (app, _) = app();
    let (status, body) = call(&app, Method::PUT, "/api/matches/42", Some(json!({"week": "2"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Match not found");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, _) = app();
    let (_, created) = call(&app, Method::POST, "/api/matches", Some(new_match("A", "B"))).await;
    let uri = format!("/api/matches/{}", created["id"]);

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = call(&app, Method::GET, "/api/matches", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn missing_required_field_names_the_field() {
    let (app, _) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/matches",
        Some(json!({"homeTeam": "A", "awayTeam": "B", "week": "1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "stadium");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn invalid_clock_is_rejected_with_field() {
    let (app, _) = app();
    let mut payload = new_match("A", "B");
    payload["time"] = json!("12:75");
    let (status, body) = call(&app, Method::POST, "/api/matches", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "time");
}

#[tokio::test]
async fn blank_team_is_the_first_violation() {
    let (app, _) = app();
    let mut payload = new_match("  ", "B");
    payload["time"] = json!("bad");
    let (status, body) = call(&app, Method::POST, "/api/matches", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "homeTeam");
}

#[tokio::test]
async fn non_numeric_id_is_a_400_on_id() {
    let (app, _) = app();
    let (status, body) = call(&app, Method::GET, "/api/matches/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "id");
}

#[tokio::test]
async fn unconfigured_server_answers_503_with_setup_message() {
    let app = routes::router(AppState::unconfigured());

    let (status, body) = call(&app, Method::GET, "/api/matches", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].as_str().unwrap().contains("DATABASE_URL"));

    let (status, health) = call(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "unconfigured");
}

#[tokio::test]
async fn degraded_storage_answers_503() {
    let (app, state) = app();
    state.update_degraded(true);

    let (status, _) = call(&app, Method::POST, "/api/matches", Some(new_match("A", "B"))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, health) = call(&app, Method::GET, "/healthcheck", None).await;
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = app();
    let (status, doc) = call(&app, Method::GET, "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/matches"].is_object());
}
