use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use shared_config::AppConfig;

use crate::clock::{Clock, SharedClock};

pub struct TestConfig {
    pub join_window_seconds: u32,
    pub auto_start_at_scheduled_time: bool,
    pub conferencing_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            join_window_seconds: 300,
            auto_start_at_scheduled_time: false,
            conferencing_base_url: "https://meet.example.test".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            join_window_seconds: self.join_window_seconds,
            auto_start_at_scheduled_time: self.auto_start_at_scheduled_time,
            conferencing_base_url: self.conferencing_base_url.clone(),
            gate_tick_interval_seconds: 1,
            server_port: 0,
        }
    }
}

/// Hand-driven clock for deterministic time-based tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// A clock pinned to a fixed, readable instant (2025-03-14 09:00:00 UTC).
    pub fn at_epoch() -> Self {
        Self::new(test_epoch())
    }

    pub fn shared(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn rewind(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now -= by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Wrap a manual clock so it can be handed to components taking a `SharedClock`
/// while the test keeps its own handle for advancing time.
pub fn shared_manual_clock(start: DateTime<Utc>) -> (Arc<ManualClock>, SharedClock) {
    let clock = ManualClock::shared(start);
    let shared: SharedClock = clock.clone();
    (clock, shared)
}

pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .expect("test epoch is a valid UTC instant")
}
