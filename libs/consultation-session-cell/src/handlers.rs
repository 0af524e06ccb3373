// libs/consultation-session-cell/src/handlers.rs
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

use crate::models::{
    ConsultationSession, CreateConsultationRequest, EndConsultationResponse, JoinLinkResponse,
    SessionGateError, SessionSnapshot, StartConsultationResponse, StartOutcome,
};
use crate::state::ConsultationCellState;

fn map_gate_error(err: SessionGateError) -> AppError {
    match err {
        SessionGateError::InvalidConfiguration { message } => AppError::BadRequest(message),
        SessionGateError::SessionNotFound(id) => {
            AppError::NotFound(format!("Consultation {} not found", id))
        }
        SessionGateError::RoomInUse(room_id) => {
            AppError::Conflict(format!("Room {} is already in use", room_id))
        }
    }
}

// ==============================================================================
// HEALTH
// ==============================================================================

pub async fn consultation_health_check(
    State(state): State<Arc<ConsultationCellState>>,
) -> Json<Value> {
    let registry = state.registry.read().await;
    let config = registry.config();

    Json(json!({
        "status": "healthy",
        "service": "consultation-session-cell",
        "active_sessions": registry.len(),
        "join_window_seconds": config.join_window_seconds,
        "auto_start_at_scheduled_time": config.auto_start_at_scheduled_time,
        "conferencing_base_url": state.room_link.base_url(),
    }))
}

// ==============================================================================
// CONSULTATION LIFECYCLE HANDLERS
// ==============================================================================

/// Book a consultation and open a gate for it
#[axum::debug_handler]
pub async fn book_consultation(
    State(state): State<Arc<ConsultationCellState>>,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let snapshot = state
        .registry
        .write()
        .await
        .book(request)
        .map_err(map_gate_error)?;

    info!(
        "Booked consultation {} in room {} for {}",
        snapshot.id, snapshot.room_id, snapshot.scheduled_at
    );
    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_consultation(
    State(state): State<Arc<ConsultationCellState>>,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .registry
        .write()
        .await
        .snapshot(consultation_id)
        .map_err(map_gate_error)?;

    Ok(Json(snapshot))
}

/// Explicit start from either participant
#[axum::debug_handler]
pub async fn start_consultation(
    State(state): State<Arc<ConsultationCellState>>,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<StartConsultationResponse>, AppError> {
    let (outcome, session) = state
        .registry
        .write()
        .await
        .start(consultation_id)
        .map_err(map_gate_error)?;

    if outcome == StartOutcome::NotJoinable {
        warn!(
            "Start refused for consultation {}: window opens in {}s",
            consultation_id, session.seconds_until_joinable
        );
        return Err(AppError::Conflict(format!(
            "Consultation cannot be started yet; scheduled in {}",
            session.countdown
        )));
    }

    info!("Start on consultation {} -> {:?}", consultation_id, outcome);
    Ok(Json(StartConsultationResponse { outcome, session }))
}

pub async fn end_consultation(
    State(state): State<Arc<ConsultationCellState>>,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<EndConsultationResponse>, AppError> {
    let (outcome, session) = state
        .registry
        .write()
        .await
        .end(consultation_id)
        .map_err(map_gate_error)?;

    info!("End on consultation {} -> {:?}", consultation_id, outcome);
    Ok(Json(EndConsultationResponse { outcome, session }))
}

/// Join URL for the conferencing iframe, only while the call can be joined
pub async fn get_join_link(
    State(state): State<Arc<ConsultationCellState>>,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<JoinLinkResponse>, AppError> {
    let snapshot = state
        .registry
        .write()
        .await
        .snapshot(consultation_id)
        .map_err(map_gate_error)?;

    if !snapshot.state.allows_join() {
        return Err(AppError::Conflict(format!(
            "Consultation is {}; join link unavailable",
            snapshot.state
        )));
    }

    Ok(Json(JoinLinkResponse {
        join_url: state.room_link.join_url(&snapshot.room_id),
        room_id: snapshot.room_id,
        state: snapshot.state,
    }))
}

pub async fn archive_consultation(
    State(state): State<Arc<ConsultationCellState>>,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<ConsultationSession>, AppError> {
    let session = state
        .registry
        .write()
        .await
        .remove(consultation_id)
        .map_err(map_gate_error)?;

    info!("Archived consultation {}", consultation_id);
    Ok(Json(session))
}
