use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::MessageStatusError;
use crate::models::{AckKind, Acknowledgement, ChatMessage, MessageId, MessageStatus, NewMessage};
use crate::services::store::{InMemoryMessageStore, MessageStore};

/// Records delivery and read acknowledgements per message.
///
/// Assumes a single writer per message id; hosts with concurrent
/// acknowledgement sources serialize calls before they reach the tracker.
pub struct MessageStatusTracker<S: MessageStore = InMemoryMessageStore> {
    store: S,
}

impl Default for MessageStatusTracker<InMemoryMessageStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStatusTracker<InMemoryMessageStore> {
    pub fn new() -> Self {
        Self::with_store(InMemoryMessageStore::new())
    }
}

impl<S: MessageStore> MessageStatusTracker<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record_sent(&mut self, message: NewMessage) -> Result<MessageStatus, MessageStatusError> {
        if self.store.contains(&message.id) {
            return Err(MessageStatusError::DuplicateMessage(message.id));
        }

        let message = ChatMessage::from(message);
        let status = message.status();
        debug!("Tracking message {} from {}", message.id, message.sender_id);
        self.store.save(message);
        Ok(status)
    }

    /// The first recorded delivery wins; later ones are ignored.
    pub fn record_delivered(
        &mut self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<MessageStatus, MessageStatusError> {
        let mut message = self.load(id)?;

        if at < message.created_at {
            return Err(out_of_order(id, at, message.created_at));
        }
        if message.delivered_at.is_some() {
            debug!("Ignoring repeated delivery for message {}", id);
            return Ok(message.status());
        }

        message.delivered_at = Some(at);
        let status = message.status();
        self.store.save(message);
        Ok(status)
    }

    /// A read without a prior delivery also records the delivery at the same instant.
    pub fn record_read(
        &mut self,
        id: &str,
        at: DateTime<Utc>,
    ) -> Result<MessageStatus, MessageStatusError> {
        let mut message = self.load(id)?;

        let earliest_allowed = message.delivered_at.unwrap_or(message.created_at);
        if at < earliest_allowed {
            return Err(out_of_order(id, at, earliest_allowed));
        }
        if message.read_at.is_some() {
            debug!("Ignoring repeated read for message {}", id);
            return Ok(message.status());
        }

        if message.delivered_at.is_none() {
            message.delivered_at = Some(at);
        }
        message.read_at = Some(at);
        let status = message.status();
        self.store.save(message);
        Ok(status)
    }

    pub fn apply(&mut self, ack: Acknowledgement) -> Result<MessageStatus, MessageStatusError> {
        match ack.kind {
            AckKind::Delivery => self.record_delivered(&ack.id, ack.at),
            AckKind::Read => self.record_read(&ack.id, ack.at),
        }
    }

    pub fn status_of(&self, id: &str) -> Result<MessageStatus, MessageStatusError> {
        Ok(self.load(id)?.status())
    }

    pub fn all_statuses(&self) -> HashMap<MessageId, MessageStatus> {
        self.store
            .all()
            .into_iter()
            .map(|message| {
                let status = message.status();
                (message.id, status)
            })
            .collect()
    }

    pub fn message(&self, id: &str) -> Result<ChatMessage, MessageStatusError> {
        self.load(id)
    }

    pub fn unread_count_for(&self, chat_id: &str, user_id: &str) -> usize {
        self.store
            .all()
            .iter()
            .filter(|message| message.is_unread_by(chat_id, user_id))
            .count()
    }

    /// Read every message in `chat_id` sent by someone other than `reader_id`
    /// that is still unread.
    ///
    /// Messages for which `at` would break timestamp ordering are left alone.
    /// Returns the ids that changed, oldest first.
    pub fn mark_all_read(
        &mut self,
        chat_id: &str,
        reader_id: &str,
        at: DateTime<Utc>,
    ) -> Vec<MessageId> {
        let mut pending: Vec<ChatMessage> = self
            .store
            .all()
            .into_iter()
            .filter(|message| message.is_unread_by(chat_id, reader_id))
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut updated = Vec::with_capacity(pending.len());
        for message in pending {
            match self.record_read(&message.id, at) {
                Ok(_) => updated.push(message.id),
                Err(err) => debug!("Skipping message {} in bulk read: {}", message.id, err),
            }
        }
        updated
    }

    pub fn len(&self) -> usize {
        self.store.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, id: &str) -> Result<ChatMessage, MessageStatusError> {
        self.store
            .load(id)
            .ok_or_else(|| MessageStatusError::UnknownMessage(id.to_string()))
    }
}

fn out_of_order(id: &str, at: DateTime<Utc>, earliest_allowed: DateTime<Utc>) -> MessageStatusError {
    MessageStatusError::OutOfOrderTimestamp {
        id: id.to_string(),
        at,
        earliest_allowed,
    }
}
