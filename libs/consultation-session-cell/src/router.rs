// libs/consultation-session-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::ConsultationCellState;

/// Creates the consultation lifecycle routes
pub fn consultation_routes(state: Arc<ConsultationCellState>) -> Router {
    Router::new()
        .route("/health", get(consultation_health_check))
        .route("/", post(book_consultation))
        .route(
            "/{consultation_id}",
            get(get_consultation).delete(archive_consultation),
        )
        .route("/{consultation_id}/start", post(start_consultation))
        .route("/{consultation_id}/end", post(end_consultation))
        .route("/{consultation_id}/join", get(get_join_link))
        .with_state(state)
}
