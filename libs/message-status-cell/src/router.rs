use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::MessageCellState;

pub fn message_status_routes(state: Arc<MessageCellState>) -> Router {
    Router::new()
        .route("/health", get(message_health_check))
        .route("/", post(record_sent))
        .route("/statuses", get(get_all_statuses))
        .route("/chats/{chat_id}/read-all", post(mark_all_read))
        .route("/chats/{chat_id}/unread/{user_id}", get(get_unread_count))
        .route("/{message_id}", get(get_message))
        .route("/{message_id}/status", get(get_message_status))
        .route("/{message_id}/delivered", post(record_delivered))
        .route("/{message_id}/read", post(record_read))
        .with_state(state)
}
