// libs/consultation-session-cell/src/lib.rs
//! # Consultation Session Cell
//!
//! Lifecycle gate for scheduled video consultations. The video itself runs
//! inside an external conferencing iframe; this cell only decides *when* a
//! consultation may be joined, when it is live, and when it has ended.
//!
//! ## Lifecycle
//!
//! ```text
//! Scheduled --(scheduled_at - now <= join window)--> Joinable
//! Joinable  --(start, or scheduled time with auto-start)--> Live
//! any       --(end)--> Ended   (terminal)
//! ```
//!
//! State is pulled, never pushed: every query re-evaluates against the
//! injected clock, and a host calls [`SessionGate::tick`] (usually through
//! [`ConsultationRegistry::tick_all`]) on its own timer to drive countdowns.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------+
//! |               Consultation Session Cell             |
//! +-----------------------------------------------------+
//! |  handlers.rs    |  HTTP endpoint handlers           |
//! |  router.rs      |  Route definitions                |
//! |  models.rs      |  Data structures & DTOs           |
//! |  state.rs       |  Shared router state              |
//! |  services/      |  Lifecycle logic                  |
//! |    gate.rs      |  Per-consultation state machine   |
//! |    countdown.rs |  Countdown / elapsed formatting   |
//! |    registry.rs  |  Gates keyed by consultation id   |
//! |    room.rs      |  Conferencing join URLs           |
//! +-----------------------------------------------------+
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /health` - Cell health and gate configuration
//! - `POST /` - Book a consultation
//! - `GET /{id}` - Current state and countdown
//! - `POST /{id}/start` - Explicit start
//! - `POST /{id}/end` - Explicit end
//! - `GET /{id}/join` - Conferencing join URL
//! - `DELETE /{id}` - Archive
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use consultation_session_cell::{consultation_routes, ConsultationCellState};
//! use shared_config::AppConfig;
//! use shared_utils::clock::SystemClock;
//!
//! let config = AppConfig::from_env();
//! let state = Arc::new(ConsultationCellState::new(&config, SystemClock::shared()));
//! let routes = consultation_routes(state);
//! ```

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use models::{
    ConsultationSession, CreateConsultationRequest, EndOutcome, GateConfig, GateState,
    SessionGateError, SessionSnapshot, StartOutcome, StateChange,
};

pub use services::{ConsultationRegistry, RoomLink, SessionGate};

pub use router::consultation_routes;
pub use state::ConsultationCellState;
