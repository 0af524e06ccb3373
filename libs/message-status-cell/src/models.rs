use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type MessageId = String;

/// Consolidated delivery state for display. Ordered so that later stages compare greater.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Sent => write!(f, "sent"),
            MessageStatus::Delivered => write!(f, "delivered"),
            MessageStatus::Read => write!(f, "read"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn status(&self) -> MessageStatus {
        if self.read_at.is_some() {
            MessageStatus::Read
        } else if self.delivered_at.is_some() {
            MessageStatus::Delivered
        } else {
            MessageStatus::Sent
        }
    }

    /// Unread by `user_id` within the conversation `chat_id`; own messages never count.
    pub fn is_unread_by(&self, chat_id: &str, user_id: &str) -> bool {
        self.chat_id == chat_id && self.sender_id != user_id && self.read_at.is_none()
    }
}

/// A message as handed over at send time, before any acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessage {
    pub id: MessageId,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewMessage> for ChatMessage {
    fn from(message: NewMessage) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            content: message.content,
            created_at: message.created_at,
            delivered_at: None,
            read_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AckKind {
    Delivery,
    Read,
}

/// Acknowledgement event from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Acknowledgement {
    pub id: MessageId,
    pub at: DateTime<Utc>,
    pub kind: AckKind,
}

// ==============================================================================
// API REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub id: Option<MessageId>,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AcknowledgeRequest {
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct MarkAllReadRequest {
    pub reader_id: String,
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageStatusResponse {
    pub id: MessageId,
    pub status: MessageStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub chat_id: String,
    pub reader_id: String,
    pub updated: Vec<MessageId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub chat_id: String,
    pub user_id: String,
    pub unread: usize,
}
