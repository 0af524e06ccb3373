// libs/consultation-session-cell/src/services/registry.rs
use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use shared_utils::clock::SharedClock;

use crate::models::{
    ConsultationSession, CreateConsultationRequest, EndOutcome, GateConfig, SessionGateError,
    SessionSnapshot, StartOutcome, StateChange, DEFAULT_DURATION_MINUTES,
};
use crate::services::gate::SessionGate;
use crate::services::room::RoomLink;

/// In-process collection of gates, one per booked consultation.
///
/// Gates share no state with each other; the registry only routes commands
/// by id, keeps room ids unique among held consultations and drives the
/// periodic tick across all of them.
pub struct ConsultationRegistry {
    gates: HashMap<Uuid, SessionGate>,
    overdue_reported: HashSet<Uuid>,
    config: GateConfig,
    clock: SharedClock,
}

impl ConsultationRegistry {
    pub fn new(config: GateConfig, clock: SharedClock) -> Self {
        Self {
            gates: HashMap::new(),
            overdue_reported: HashSet::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn book(
        &mut self,
        request: CreateConsultationRequest,
    ) -> Result<SessionSnapshot, SessionGateError> {
        let scheduled_at = request
            .scheduled_at
            .ok_or_else(|| SessionGateError::invalid("scheduled_at is required"))?;

        let now = self.clock.now();
        let id = Uuid::new_v4();
        let room_id = request
            .room_id
            .filter(|room| !room.trim().is_empty())
            .unwrap_or_else(|| RoomLink::generate_room_id(id, now));
        if self.room_in_use(&room_id) {
            return Err(SessionGateError::RoomInUse(room_id));
        }

        let mut session = ConsultationSession::new(id, room_id, scheduled_at, now);
        session.duration_minutes = request.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);

        let gate = SessionGate::from_session(session, self.config, self.clock.clone())?;
        let snapshot = gate.snapshot();

        debug!(
            "Booked consultation {} in room {} for {}",
            id, snapshot.room_id, scheduled_at
        );
        self.gates.insert(id, gate);

        Ok(snapshot)
    }

    pub fn room_in_use(&self, room_id: &str) -> bool {
        self.gates.values().any(|gate| gate.room_id() == room_id)
    }

    pub fn get(&self, id: Uuid) -> Result<&SessionGate, SessionGateError> {
        self.gates.get(&id).ok_or(SessionGateError::SessionNotFound(id))
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut SessionGate, SessionGateError> {
        self.gates
            .get_mut(&id)
            .ok_or(SessionGateError::SessionNotFound(id))
    }

    /// Re-evaluate one consultation and return its current view.
    pub fn snapshot(&mut self, id: Uuid) -> Result<SessionSnapshot, SessionGateError> {
        Ok(self.get_mut(id)?.tick())
    }

    pub fn start(&mut self, id: Uuid) -> Result<(StartOutcome, SessionSnapshot), SessionGateError> {
        let gate = self.get_mut(id)?;
        let outcome = gate.start();
        Ok((outcome, gate.tick()))
    }

    pub fn end(&mut self, id: Uuid) -> Result<(EndOutcome, SessionSnapshot), SessionGateError> {
        let gate = self.get_mut(id)?;
        let outcome = gate.end();
        Ok((outcome, gate.tick()))
    }

    /// Archive a consultation, handing back its final record.
    pub fn remove(&mut self, id: Uuid) -> Result<ConsultationSession, SessionGateError> {
        self.overdue_reported.remove(&id);
        self.gates
            .remove(&id)
            .map(|gate| gate.session().clone())
            .ok_or(SessionGateError::SessionNotFound(id))
    }

    /// Archive every gate whose `Ended` state has already been observed by a tick,
    /// releasing its room id. Returns the final records.
    pub fn evict_ended(&mut self) -> Vec<ConsultationSession> {
        let ended: Vec<Uuid> = self
            .gates
            .iter()
            .filter(|(_, gate)| gate.last_observed_state().is_terminal())
            .map(|(id, _)| *id)
            .collect();

        let archived: Vec<ConsultationSession> = ended
            .into_iter()
            .filter_map(|id| self.remove(id).ok())
            .collect();

        if !archived.is_empty() {
            debug!("Evicted {} ended consultations", archived.len());
        }
        archived
    }

    /// Tick every gate, reporting the ones whose state changed since the previous tick.
    pub fn tick_all(&mut self) -> Vec<StateChange> {
        let mut changes = Vec::new();

        for (id, gate) in self.gates.iter_mut() {
            let before = gate.last_observed_state();
            let snapshot = gate.tick();
            if snapshot.state != before {
                changes.push(StateChange {
                    id: *id,
                    from: before,
                    to: snapshot.state,
                });
            }
        }

        if !changes.is_empty() {
            debug!("Tick produced {} state changes", changes.len());
        }
        changes
    }

    pub fn overdue(&self) -> Vec<Uuid> {
        let now = self.clock.now();
        self.gates
            .iter()
            .filter(|(_, gate)| gate.is_overdue(now))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Overdue consultations not returned by an earlier call.
    pub fn newly_overdue(&mut self) -> Vec<Uuid> {
        let overdue = self.overdue();
        overdue
            .into_iter()
            .filter(|id| self.overdue_reported.insert(*id))
            .collect()
    }
}
