//! Component contracts resolved from the dependency container.
//!
//! The configuration layer only wires these together. Every contract has
//! a built-in implementation that is used unless the caller registers an
//! override on the builder:
//!
//! | Contract       | Default                  |
//! |----------------|--------------------------|
//! | [`Serializer`] | [`JsonSerializer`]       |
//! | [`Sender`]     | [`TopicSender`]          |
//! | [`Receiver`]   | [`SubscriptionReceiver`] |
//! | [`Bus`]        | [`ServiceBus`]           |

pub mod bus;
pub mod receiver;
pub mod sender;
pub mod serializer;

use std::fmt;

use uuid::Uuid;

use crate::config::BusSettings;
use crate::error::BusError;
use crate::registration::SubscriberType;

pub use bus::{BusId, ServiceBus};
pub use receiver::{Endpoint, SubscriptionReceiver};
pub use sender::{OutboundMessage, TopicSender};
pub use serializer::JsonSerializer;

/// Encodes message bodies for the wire and decodes them back.
pub trait Serializer: fmt::Debug + Send + Sync {
    /// MIME type written next to every serialized body.
    fn content_type(&self) -> &'static str;

    /// Encodes a message body.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Serialization`] if the body cannot be encoded.
    fn serialize(&self, body: &serde_json::Value) -> Result<Vec<u8>, BusError>;

    /// Decodes a message body.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Serialization`] if the bytes are not a valid body.
    fn deserialize(&self, bytes: &[u8]) -> Result<serde_json::Value, BusError>;
}

/// Hands serialized messages to the transport.
pub trait Sender: fmt::Debug + Send + Sync {
    /// Sends `payload` on `topic` and returns the assigned message id.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Send`] if the message cannot be accepted.
    fn send(&self, topic: &str, content_type: &str, payload: Vec<u8>) -> Result<Uuid, BusError>;
}

/// Owns the receive endpoints created for registered subscribers.
pub trait Receiver: fmt::Debug + Send + Sync {
    /// Creates (or returns the existing) endpoint for `subscriber`.
    ///
    /// `settings.max_threads` bounds how many handler calls the endpoint
    /// may run at once.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Endpoint`] if the endpoint cannot be created.
    fn register_endpoint(
        &self,
        settings: &BusSettings,
        subscriber: &SubscriberType,
    ) -> Result<Endpoint, BusError>;

    /// Returns every endpoint created so far, in creation order.
    fn endpoints(&self) -> Vec<Endpoint>;
}

/// Client-facing messaging component.
pub trait Bus: fmt::Debug + Send + Sync {
    /// Identity of this bus instance.
    fn id(&self) -> BusId;

    /// Serializes `body` and publishes it on the configured topic.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`] if serialization or sending fails.
    fn publish(&self, body: &serde_json::Value) -> Result<Uuid, BusError>;

    /// Returns the receive endpoints registered for this bus.
    fn endpoints(&self) -> Vec<Endpoint>;
}
