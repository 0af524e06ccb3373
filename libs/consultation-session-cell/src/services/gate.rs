// libs/consultation-session-cell/src/services/gate.rs
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_utils::clock::SharedClock;

use crate::models::{
    ConsultationSession, EndOutcome, GateConfig, GateState, SessionGateError, SessionSnapshot,
    StartOutcome, OVERDUE_GRACE_MINUTES,
};
use crate::services::countdown;

/// Lifecycle gate for a single scheduled consultation.
///
/// State is recomputed from the injected clock on every query. The only
/// stored transitions are the explicit `start`/`end` commands (and an
/// auto-start latched by `tick`), which make `Live` and `Ended` sticky.
pub struct SessionGate {
    session: ConsultationSession,
    config: GateConfig,
    clock: SharedClock,
    last_observed: GateState,
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("last_observed", &self.last_observed)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    pub fn new(
        room_id: impl Into<String>,
        scheduled_at: Option<DateTime<Utc>>,
        config: GateConfig,
        clock: SharedClock,
    ) -> Result<Self, SessionGateError> {
        let scheduled_at = scheduled_at
            .ok_or_else(|| SessionGateError::invalid("scheduled_at is required"))?;
        let session = ConsultationSession::new(Uuid::new_v4(), room_id, scheduled_at, clock.now());

        Self::from_session(session, config, clock)
    }

    /// Rebuild a gate around an existing record, e.g. one loaded from storage.
    pub fn from_session(
        session: ConsultationSession,
        config: GateConfig,
        clock: SharedClock,
    ) -> Result<Self, SessionGateError> {
        if session.room_id.trim().is_empty() {
            return Err(SessionGateError::invalid("room_id must not be blank"));
        }
        if session.duration_minutes == 0 {
            return Err(SessionGateError::invalid("duration_minutes must be positive"));
        }

        let mut gate = Self {
            session,
            config,
            clock,
            last_observed: GateState::Scheduled,
        };
        gate.last_observed = gate.state();
        Ok(gate)
    }

    pub fn with_duration_minutes(mut self, minutes: u32) -> Result<Self, SessionGateError> {
        if minutes == 0 {
            return Err(SessionGateError::invalid("duration_minutes must be positive"));
        }
        self.session.duration_minutes = minutes;
        Ok(self)
    }

    pub fn id(&self) -> Uuid {
        self.session.id
    }

    pub fn room_id(&self) -> &str {
        &self.session.room_id
    }

    pub fn session(&self) -> &ConsultationSession {
        &self.session
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// State reported by the most recent `tick` (or construction).
    pub fn last_observed_state(&self) -> GateState {
        self.last_observed
    }

    /// Pure state derivation for a given instant.
    pub fn evaluate(&self, now: DateTime<Utc>) -> GateState {
        if self.session.ended_at.is_some() {
            return GateState::Ended;
        }
        if self.session.started_at.is_some() {
            return GateState::Live;
        }

        let remaining = self.session.scheduled_at - now;
        if self.config.auto_start_at_scheduled_time && remaining <= Duration::zero() {
            GateState::Live
        } else if remaining <= self.config.join_window() {
            GateState::Joinable
        } else {
            GateState::Scheduled
        }
    }

    pub fn state(&self) -> GateState {
        self.evaluate(self.clock.now())
    }

    /// Time until the join window opens at `now`; negative once open.
    pub fn until_joinable_at(&self, now: DateTime<Utc>) -> Duration {
        (self.session.scheduled_at - self.config.join_window()) - now
    }

    pub fn countdown_at(&self, now: DateTime<Utc>) -> String {
        match self.evaluate(now) {
            GateState::Scheduled => countdown::format_until_start(self.session.scheduled_at - now),
            GateState::Joinable => {
                countdown::format_minutes_seconds(self.session.scheduled_at - now)
            }
            GateState::Live => countdown::format_elapsed(now - self.effective_start()),
            GateState::Ended => match (self.session.started_at, self.session.ended_at) {
                (Some(started), Some(ended)) => countdown::format_elapsed(ended - started),
                _ => String::new(),
            },
        }
    }

    pub fn countdown(&self) -> String {
        self.countdown_at(self.clock.now())
    }

    /// Unfinished consultations become overdue once the booked slot plus a
    /// grace period has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.session.ended_at.is_none()
            && now > self.session.scheduled_end() + Duration::minutes(OVERDUE_GRACE_MINUTES)
    }

    /// Periodic re-evaluation driven by the host. Latches an auto-start so a
    /// later clock correction cannot take the call back out of `Live`.
    pub fn tick(&mut self) -> SessionSnapshot {
        let now = self.clock.now();
        let state = self.evaluate(now);

        if state == GateState::Live && self.session.started_at.is_none() {
            debug!(
                "Auto-starting consultation {} at scheduled time {}",
                self.session.id, self.session.scheduled_at
            );
            self.session.started_at = Some(self.session.scheduled_at);
        }

        if state != self.last_observed {
            debug!(
                "Consultation {} moved {} -> {}",
                self.session.id, self.last_observed, state
            );
            self.last_observed = state;
        }

        self.snapshot_at(now)
    }

    pub fn start(&mut self) -> StartOutcome {
        let now = self.clock.now();

        match self.evaluate(now) {
            GateState::Ended => StartOutcome::AlreadyEnded,
            GateState::Live => {
                // Auto-start may be in effect without having been latched yet.
                if self.session.started_at.is_none() {
                    self.session.started_at = Some(self.session.scheduled_at);
                }
                StartOutcome::AlreadyLive
            }
            GateState::Joinable => {
                debug!("Starting consultation {} at {}", self.session.id, now);
                self.session.started_at = Some(now);
                self.last_observed = GateState::Live;
                StartOutcome::Started
            }
            GateState::Scheduled => {
                debug!(
                    "Refusing to start consultation {}: join window not open",
                    self.session.id
                );
                StartOutcome::NotJoinable
            }
        }
    }

    pub fn end(&mut self) -> EndOutcome {
        let now = self.clock.now();

        match self.evaluate(now) {
            GateState::Ended => EndOutcome::AlreadyEnded,
            state => {
                if state == GateState::Live && self.session.started_at.is_none() {
                    self.session.started_at = Some(self.session.scheduled_at);
                }
                // Never record an end before the recorded start.
                let ended_at = self.session.started_at.map_or(now, |started| started.max(now));
                debug!("Ending consultation {} from {}", self.session.id, state);
                self.session.ended_at = Some(ended_at);
                self.last_observed = GateState::Ended;
                EndOutcome::Ended
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_at(self.clock.now())
    }

    fn snapshot_at(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            id: self.session.id,
            room_id: self.session.room_id.clone(),
            state: self.evaluate(now),
            countdown: self.countdown_at(now),
            seconds_until_joinable: self.until_joinable_at(now).num_seconds(),
            scheduled_at: self.session.scheduled_at,
            duration_minutes: self.session.duration_minutes,
            started_at: self.session.started_at,
            ended_at: self.session.ended_at,
            overdue: self.is_overdue(now),
            evaluated_at: now,
        }
    }

    fn effective_start(&self) -> DateTime<Utc> {
        self.session.started_at.unwrap_or(self.session.scheduled_at)
    }
}
