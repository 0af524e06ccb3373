use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use consultation_session_cell::ConsultationCellState;

/// Drives every consultation gate on a fixed period.
///
/// Ended consultations are archived by the first pass that sees them, and an overdue
/// consultation is warned about only once. The gates never schedule
/// themselves; aborting the returned handle stops all time-based transitions.
pub fn spawn_gate_ticker(state: Arc<ConsultationCellState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let mut registry = state.registry.write().await;
            for change in registry.tick_all() {
                info!(
                    "Consultation {} is now {} (was {})",
                    change.id, change.to, change.from
                );
            }
            for id in registry.newly_overdue() {
                warn!("Consultation {} is overdue", id);
            }
            for session in registry.evict_ended() {
                info!(
                    "Archived consultation {} (room {})",
                    session.id, session.room_id
                );
            }
        }
    })
}
