use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MessageStatusError {
    #[error("Message already tracked: {0}")]
    DuplicateMessage(String),

    #[error("Message not tracked: {0}")]
    UnknownMessage(String),

    #[error("Acknowledgement for {id} at {at} precedes {earliest_allowed}")]
    OutOfOrderTimestamp {
        id: String,
        at: DateTime<Utc>,
        earliest_allowed: DateTime<Utc>,
    },
}
