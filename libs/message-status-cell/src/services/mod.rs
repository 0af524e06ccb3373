pub mod store;
pub mod tracker;

pub use store::{InMemoryMessageStore, MessageStore};
pub use tracker::MessageStatusTracker;
