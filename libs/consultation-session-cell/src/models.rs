// libs/consultation-session-cell/src/models.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_config::AppConfig;

/// Booked length used when the caller does not say otherwise.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Extra time after the booked end before an unfinished consultation counts as overdue.
pub const OVERDUE_GRACE_MINUTES: i64 = 15;

// ==============================================================================
// CONSULTATION LIFECYCLE MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Scheduled,
    Joinable,
    Live,
    Ended,
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Ended)
    }

    /// Whether a host may hand out the conferencing join URL in this state.
    pub fn allows_join(&self) -> bool {
        matches!(self, GateState::Joinable | GateState::Live)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Scheduled => write!(f, "scheduled"),
            GateState::Joinable => write!(f, "joinable"),
            GateState::Live => write!(f, "live"),
            GateState::Ended => write!(f, "ended"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateConfig {
    pub join_window_seconds: u32,
    pub auto_start_at_scheduled_time: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            join_window_seconds: shared_config::DEFAULT_JOIN_WINDOW_SECONDS,
            auto_start_at_scheduled_time: true,
        }
    }
}

impl GateConfig {
    pub fn join_window(&self) -> Duration {
        Duration::seconds(i64::from(self.join_window_seconds))
    }
}

impl From<&AppConfig> for GateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            join_window_seconds: config.join_window_seconds,
            auto_start_at_scheduled_time: config.auto_start_at_scheduled_time,
        }
    }
}

/// Persistent record of a booked consultation.
///
/// The lifecycle phase is carried by the two command timestamps: `ended_at`
/// means the call is over, `started_at` alone means it is live, and neither
/// means the state is still derived from the clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationSession {
    pub id: Uuid,
    pub room_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ConsultationSession {
    pub fn new(
        id: Uuid,
        room_id: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_id: room_id.into(),
            scheduled_at,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            started_at: None,
            ended_at: None,
            created_at,
        }
    }

    pub fn scheduled_end(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Result of an explicit start command. Only `Started` changes anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    Started,
    AlreadyLive,
    AlreadyEnded,
    NotJoinable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndOutcome {
    Ended,
    AlreadyEnded,
}

/// Point-in-time view of a gate, suitable for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub room_id: String,
    pub state: GateState,
    pub countdown: String,
    /// Seconds until the join window opens; negative once it has opened.
    pub seconds_until_joinable: i64,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub overdue: bool,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub id: Uuid,
    pub from: GateState,
    pub to: GateState,
}

// ==============================================================================
// API REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConsultationRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub room_id: Option<String>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartConsultationResponse {
    pub outcome: StartOutcome,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndConsultationResponse {
    pub outcome: EndOutcome,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinLinkResponse {
    pub room_id: String,
    pub join_url: String,
    pub state: GateState,
}

// ==============================================================================
// ERROR HANDLING
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionGateError {
    #[error("Invalid consultation configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Consultation session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Room {0} is already assigned to another consultation")]
    RoomInUse(String),
}

impl SessionGateError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SessionGateError::InvalidConfiguration {
            message: message.into(),
        }
    }
}
