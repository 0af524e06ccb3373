use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use message_status_cell::{message_status_routes, MessageCellState};
use shared_utils::test_utils::{shared_manual_clock, test_epoch, ManualClock};

fn create_test_app() -> (Arc<ManualClock>, Router) {
    let (clock, shared) = shared_manual_clock(test_epoch());
    let state = Arc::new(MessageCellState::new(shared));
    (clock, message_status_routes(state))
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
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_send_deliver_read_flow() {
    let (clock, app) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/",
        Some(json!({ "id": "m1", "chat_id": "c1", "sender_id": "doctor-1", "content": "Please rest today" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["created_at"], json!(test_epoch()));
    assert!(json["delivered_at"].is_null());

    clock.advance(Duration::seconds(2));
    let (status, json) = send(&app, "POST", "/m1/delivered", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "delivered");

    clock.advance(Duration::seconds(3));
    let (status, json) = send(&app, "POST", "/m1/read", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "read");

    let (status, json) = send(&app, "GET", "/m1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "read");

    let (_, json) = send(&app, "GET", "/statuses", None).await;
    assert_eq!(json["m1"], "read");
}

#[tokio::test]
async fn test_duplicate_send_conflicts() {
    let (_, app) = create_test_app();
    let body = json!({ "id": "dup", "chat_id": "c1", "sender_id": "patient-1", "content": "hi" });

    let (status, _) = send(&app, "POST", "/", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, "POST", "/", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("dup"));
}

#[tokio::test]
async fn test_unknown_message_is_not_found() {
    let (_, app) = create_test_app();

    let (status, _) = send(&app, "POST", "/unknown-id/delivered", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/unknown-id/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_order_acknowledgement_is_bad_request() {
    let (_, app) = create_test_app();
    send(
        &app,
        "POST",
        "/",
        Some(json!({ "id": "m2", "chat_id": "c1", "sender_id": "doctor-1", "content": "Results are in" })),
    )
    .await;

    let earlier = test_epoch() - Duration::minutes(1);
    let (status, _) = send(&app, "POST", "/m2/delivered", Some(json!({ "at": earlier }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_read_all_and_unread_count() {
    let (clock, app) = create_test_app();

    for (id, chat, sender) in [
        ("d1", "c1", "doctor-1"),
        ("d2", "c1", "doctor-1"),
        ("p1", "c1", "patient-1"),
        ("x1", "c2", "doctor-2"),
    ] {
        send(
            &app,
            "POST",
            "/",
            Some(json!({ "id": id, "chat_id": chat, "sender_id": sender, "content": "..." })),
        )
        .await;
    }

    let (_, json) = send(&app, "GET", "/chats/c1/unread/patient-1", None).await;
    assert_eq!(json["unread"], 2);

    clock.advance(Duration::seconds(10));
    let (status, json) = send(
        &app,
        "POST",
        "/chats/c1/read-all",
        Some(json!({ "reader_id": "patient-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["chat_id"], "c1");
    assert_eq!(json["updated"].as_array().unwrap().len(), 2);

    let (_, json) = send(&app, "GET", "/chats/c1/unread/patient-1", None).await;
    assert_eq!(json["unread"], 0);
    let (_, json) = send(&app, "GET", "/chats/c1/unread/doctor-1", None).await;
    assert_eq!(json["unread"], 1);

    let (_, json) = send(&app, "GET", "/x1/status", None).await;
    assert_eq!(json["status"], "sent");
}

#[tokio::test]
async fn test_send_without_chat_is_rejected() {
    let (_, app) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/",
        Some(json!({ "chat_id": " ", "sender_id": "patient-1", "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("chat_id"));
}

#[tokio::test]
async fn test_generated_id_when_missing() {
    let (_, app) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/",
        Some(json!({ "chat_id": "c1", "sender_id": "patient-1", "content": "Is this dosage right?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = json["id"].as_str().unwrap();
    assert!(!id.is_empty());
    let (status, json) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sender_id"], "patient-1");
}
