use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use consultation_session_cell::{consultation_routes, ConsultationCellState};
use message_status_cell::{message_status_routes, MessageCellState};

pub fn create_router(
    consultations: Arc<ConsultationCellState>,
    messages: Arc<MessageCellState>,
) -> Router {
    Router::new()
        .route("/", get(|| async { "Consultation API is running!" }))
        .nest("/consultations", consultation_routes(consultations))
        .nest("/messages", message_status_routes(messages))
}
