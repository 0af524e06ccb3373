use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Lifecycle components never read the system clock directly; a host injects
/// one of these so the same logic runs against wall time in production and a
/// hand-driven clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl SystemClock {
    pub fn shared() -> SharedClock {
        Arc::new(SystemClock)
    }
}
