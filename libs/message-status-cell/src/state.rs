use tokio::sync::Mutex;

use shared_utils::clock::SharedClock;

use crate::services::MessageStatusTracker;

/// Shared router state for the message status cell.
///
/// The single mutex serializes every acknowledgement, which gives the tracker
/// the one-writer-per-message guarantee it relies on.
pub struct MessageCellState {
    pub tracker: Mutex<MessageStatusTracker>,
    pub clock: SharedClock,
}

impl MessageCellState {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            tracker: Mutex::new(MessageStatusTracker::new()),
            clock,
        }
    }
}
