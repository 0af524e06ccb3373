// libs/consultation-session-cell/src/state.rs
use tokio::sync::RwLock;

use shared_config::AppConfig;
use shared_utils::clock::SharedClock;

use crate::models::GateConfig;
use crate::services::{ConsultationRegistry, RoomLink};

/// Shared router state for the consultation cell.
pub struct ConsultationCellState {
    pub registry: RwLock<ConsultationRegistry>,
    pub room_link: RoomLink,
}

impl ConsultationCellState {
    pub fn new(config: &AppConfig, clock: SharedClock) -> Self {
        Self {
            registry: RwLock::new(ConsultationRegistry::new(GateConfig::from(config), clock)),
            room_link: RoomLink::from_config(config),
        }
    }
}
