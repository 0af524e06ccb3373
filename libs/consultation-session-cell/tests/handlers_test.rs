use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use consultation_session_cell::{consultation_routes, ConsultationCellState};
use shared_utils::test_utils::{shared_manual_clock, test_epoch, ManualClock, TestConfig};

fn create_test_app() -> (Arc<ManualClock>, Router) {
    let config = TestConfig::default().to_app_config();
    let (clock, shared) = shared_manual_clock(test_epoch());
    let state = Arc::new(ConsultationCellState::new(&config, shared));
    (clock, consultation_routes(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn book_in(app: &Router, offset: Duration) -> String {
    let (status, json) = send(
        app,
        "POST",
        "/",
        Some(json!({
            "scheduled_at": (test_epoch() + offset).to_rfc3339(),
            "room_id": "clinic-room-7"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check_reports_gate_config() {
    let (_, app) = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["join_window_seconds"], 300);
    assert_eq!(json["auto_start_at_scheduled_time"], false);
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn test_book_without_schedule_is_bad_request() {
    let (_, app) = create_test_app();

    let (status, json) = send(&app, "POST", "/", Some(json!({ "room_id": "r1" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("scheduled_at"));
}

#[tokio::test]
async fn test_book_and_fetch_countdown() {
    let (clock, app) = create_test_app();
    let id = book_in(&app, Duration::minutes(10)).await;

    let (status, json) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "scheduled");
    assert_eq!(json["countdown"], "10m 0s");
    assert_eq!(json["room_id"], "clinic-room-7");

    clock.advance(Duration::minutes(6));
    let (_, json) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(json["state"], "joinable");
    assert_eq!(json["countdown"], "4m 0s");
}

#[tokio::test]
async fn test_start_refused_until_joinable() {
    let (clock, app) = create_test_app();
    let id = book_in(&app, Duration::minutes(20)).await;

    let (status, _) = send(&app, "POST", &format!("/{}/start", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    clock.advance(Duration::minutes(16));
    let (status, json) = send(&app, "POST", &format!("/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "started");
    assert_eq!(json["session"]["state"], "live");

    let (status, json) = send(&app, "POST", &format!("/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "already_live");
}

#[tokio::test]
async fn test_join_link_only_while_joinable_or_live() {
    let (clock, app) = create_test_app();
    let id = book_in(&app, Duration::minutes(8)).await;

    let (status, _) = send(&app, "GET", &format!("/{}/join", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    clock.advance(Duration::minutes(4));
    let (status, json) = send(&app, "GET", &format!("/{}/join", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["join_url"], "https://meet.example.test/clinic-room-7");
    assert_eq!(json["state"], "joinable");

    let (status, json) = send(&app, "POST", &format!("/{}/end", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "ended");

    let (status, _) = send(&app, "GET", &format!("/{}/join", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, json) = send(&app, "POST", &format!("/{}/end", id), None).await;
    assert_eq!(json["outcome"], "already_ended");
}

#[tokio::test]
async fn test_unknown_and_archived_consultations_are_not_found() {
    let (_, app) = create_test_app();

    let (status, _) = send(
        &app,
        "GET",
        "/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = book_in(&app, Duration::hours(1)).await;
    let (status, json) = send(&app, "DELETE", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["room_id"], "clinic-room-7");

    let (status, _) = send(&app, "POST", &format!("/{}/start", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_taken_room_conflicts() {
    let (_, app) = create_test_app();
    book_in(&app, Duration::hours(2)).await;

    let (status, json) = send(
        &app,
        "POST",
        "/",
        Some(json!({
            "scheduled_at": (test_epoch() + Duration::hours(3)).to_rfc3339(),
            "room_id": "clinic-room-7"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("clinic-room-7"));
}

#[tokio::test]
async fn test_join_link_encodes_room_id() {
    let (_, app) = create_test_app();
    let (status, json) = send(
        &app,
        "POST",
        "/",
        Some(json!({
            "scheduled_at": (test_epoch() + Duration::minutes(1)).to_rfc3339(),
            "room_id": "other-room#x?y=1 z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "GET", &format!("/{}/join", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["join_url"],
        "https://meet.example.test/other-room%23x%3Fy%3D1%20z"
    );
    assert_eq!(json["room_id"], "other-room#x?y=1 z");
}
