//! Built-in sender that stages messages for the transport.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use super::Sender;
use crate::error::BusError;

/// A serialized message waiting to be picked up by the transport.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    /// Message identifier assigned on send.
    pub id: Uuid,
    /// Destination topic.
    pub topic: String,
    /// Serializer content type of `payload`.
    pub content_type: String,
    /// Serialized body.
    pub payload: Vec<u8>,
    /// Time the message was accepted.
    pub enqueued_at: DateTime<Utc>,
}

/// Default [`Sender`]: appends every message to an in-process outbox.
///
/// The transport drains the outbox with [`TopicSender::drain`].
#[derive(Debug, Default)]
pub struct TopicSender {
    outbox: Mutex<Vec<OutboundMessage>>,
}

impl TopicSender {
    /// Creates a sender with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every staged message, oldest first.
    pub fn drain(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.outbox.lock())
    }

    /// Returns the number of staged messages.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.outbox.lock().len()
    }
}

impl Sender for TopicSender {
    fn send(&self, topic: &str, content_type: &str, payload: Vec<u8>) -> Result<Uuid, BusError> {
        if topic.trim().is_empty() {
            return Err(BusError::Send("topic name is empty".to_string()));
        }
        let message = OutboundMessage {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            content_type: content_type.to_string(),
            payload,
            enqueued_at: Utc::now(),
        };
        let id = message.id;
        self.outbox.lock().push(message);
        tracing::debug!(%id, topic, "message staged");
        Ok(id)
    }
}
