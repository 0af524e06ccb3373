use std::collections::HashMap;

use crate::models::ChatMessage;

/// Storage seam for tracked messages.
///
/// The tracker only ever loads a record, changes it, and saves it back, so a
/// persistent or networked store can stand in for the in-memory one.
pub trait MessageStore {
    fn contains(&self, id: &str) -> bool;
    fn load(&self, id: &str) -> Option<ChatMessage>;
    fn save(&mut self, message: ChatMessage);
    fn all(&self) -> Vec<ChatMessage>;
}

#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    messages: HashMap<String, ChatMessage>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn contains(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    fn load(&self, id: &str) -> Option<ChatMessage> {
        self.messages.get(id).cloned()
    }

    fn save(&mut self, message: ChatMessage) {
        self.messages.insert(message.id.clone(), message);
    }

    fn all(&self) -> Vec<ChatMessage> {
        self.messages.values().cloned().collect()
    }
}
