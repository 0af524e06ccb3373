// libs/consultation-session-cell/src/services/room.rs
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_config::AppConfig;

/// Builds join URLs for the external conferencing provider.
///
/// The provider is only ever addressed by room id; the host embeds the
/// resulting URL in an iframe.
#[derive(Debug, Clone)]
pub struct RoomLink {
    base_url: String,
}

impl RoomLink {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.conferencing_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The room id is percent-encoded as a single path segment.
    pub fn join_url(&self, room_id: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(room_id.trim_matches('/'))
        )
    }

    /// Room id for a consultation booked without one.
    pub fn generate_room_id(consultation_id: Uuid, at: DateTime<Utc>) -> String {
        format!("consultation_{}_{}", consultation_id.simple(), at.timestamp_millis())
    }
}
