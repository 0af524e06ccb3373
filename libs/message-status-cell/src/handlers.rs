use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::error::MessageStatusError;
use crate::models::{
    AcknowledgeRequest, ChatMessage, MarkAllReadRequest, MarkAllReadResponse, MessageId,
    MessageStatus, MessageStatusResponse, NewMessage, SendMessageRequest, UnreadCountResponse,
};
use crate::state::MessageCellState;

fn map_status_error(err: MessageStatusError) -> AppError {
    match err {
        MessageStatusError::DuplicateMessage(_) => AppError::Conflict(err.to_string()),
        MessageStatusError::UnknownMessage(_) => AppError::NotFound(err.to_string()),
        MessageStatusError::OutOfOrderTimestamp { .. } => AppError::BadRequest(err.to_string()),
    }
}

pub async fn message_health_check(State(state): State<Arc<MessageCellState>>) -> Json<Value> {
    let tracked = state.tracker.lock().await.len();

    Json(json!({
        "status": "healthy",
        "service": "message-status-cell",
        "tracked_messages": tracked,
    }))
}

/// Register a newly sent message
#[axum::debug_handler]
pub async fn record_sent(
    State(state): State<Arc<MessageCellState>>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    if request.sender_id.trim().is_empty() {
        return Err(AppError::ValidationError("sender_id is required".to_string()));
    }
    if request.chat_id.trim().is_empty() {
        return Err(AppError::ValidationError("chat_id is required".to_string()));
    }

    let message = NewMessage {
        id: request.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        chat_id: request.chat_id,
        sender_id: request.sender_id,
        content: request.content,
        created_at: request.created_at.unwrap_or_else(|| state.clock.now()),
    };
    let id = message.id.clone();

    let mut tracker = state.tracker.lock().await;
    tracker.record_sent(message).map_err(map_status_error)?;
    let stored = tracker.message(&id).map_err(map_status_error)?;

    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn record_delivered(
    State(state): State<Arc<MessageCellState>>,
    Path(message_id): Path<MessageId>,
    Json(request): Json<AcknowledgeRequest>,
) -> Result<Json<MessageStatusResponse>, AppError> {
    let at = request.at.unwrap_or_else(|| state.clock.now());

    let status = state
        .tracker
        .lock()
        .await
        .record_delivered(&message_id, at)
        .map_err(|e| {
            warn!("Delivery acknowledgement rejected: {}", e);
            map_status_error(e)
        })?;

    Ok(Json(MessageStatusResponse {
        id: message_id,
        status,
    }))
}

pub async fn record_read(
    State(state): State<Arc<MessageCellState>>,
    Path(message_id): Path<MessageId>,
    Json(request): Json<AcknowledgeRequest>,
) -> Result<Json<MessageStatusResponse>, AppError> {
    let at = request.at.unwrap_or_else(|| state.clock.now());

    let status = state
        .tracker
        .lock()
        .await
        .record_read(&message_id, at)
        .map_err(|e| {
            warn!("Read acknowledgement rejected: {}", e);
            map_status_error(e)
        })?;

    Ok(Json(MessageStatusResponse {
        id: message_id,
        status,
    }))
}

pub async fn get_message(
    State(state): State<Arc<MessageCellState>>,
    Path(message_id): Path<MessageId>,
) -> Result<Json<ChatMessage>, AppError> {
    let message = state
        .tracker
        .lock()
        .await
        .message(&message_id)
        .map_err(map_status_error)?;

    Ok(Json(message))
}

pub async fn get_message_status(
    State(state): State<Arc<MessageCellState>>,
    Path(message_id): Path<MessageId>,
) -> Result<Json<MessageStatusResponse>, AppError> {
    let status = state
        .tracker
        .lock()
        .await
        .status_of(&message_id)
        .map_err(map_status_error)?;

    Ok(Json(MessageStatusResponse {
        id: message_id,
        status,
    }))
}

pub async fn get_all_statuses(
    State(state): State<Arc<MessageCellState>>,
) -> Json<HashMap<MessageId, MessageStatus>> {
    Json(state.tracker.lock().await.all_statuses())
}

/// Mark everything the reader has received in one chat as read
pub async fn mark_all_read(
    State(state): State<Arc<MessageCellState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<MarkAllReadRequest>,
) -> Json<MarkAllReadResponse> {
    let at = request.at.unwrap_or_else(|| state.clock.now());
    let updated = state
        .tracker
        .lock()
        .await
        .mark_all_read(&chat_id, &request.reader_id, at);

    info!(
        "Marked {} messages read in chat {} for {}",
        updated.len(),
        chat_id,
        request.reader_id
    );
    Json(MarkAllReadResponse {
        chat_id,
        reader_id: request.reader_id,
        updated,
    })
}

pub async fn get_unread_count(
    State(state): State<Arc<MessageCellState>>,
    Path((chat_id, user_id)): Path<(String, String)>,
) -> Json<UnreadCountResponse> {
    let unread = state
        .tracker
        .lock()
        .await
        .unread_count_for(&chat_id, &user_id);

    Json(UnreadCountResponse {
        chat_id,
        user_id,
        unread,
    })
}
