//! Default bus component.
//!
//! [`ServiceBus`] ties the configured settings to the sender, receiver and
//! serializer resolved from the container. Constructing it registers a
//! receive endpoint for every known subscriber, which is why the container
//! builds it exactly once, during priming.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Bus, Endpoint, Receiver, Sender, Serializer};
use crate::config::BusSettings;
use crate::error::BusError;
use crate::registration::SubscriberType;

/// Unique identifier of a bus instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(Uuid);

impl BusId {
    /// Creates a new random `BusId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BusId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default [`Bus`] implementation.
#[derive(Debug)]
pub struct ServiceBus {
    id: BusId,
    settings: Arc<BusSettings>,
    sender: Arc<dyn Sender>,
    receiver: Arc<dyn Receiver>,
    serializer: Arc<dyn Serializer>,
}

impl ServiceBus {
    /// Creates the bus and registers one endpoint per subscriber.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the receiver while registering
    /// endpoints.
    pub fn new(
        settings: Arc<BusSettings>,
        subscribers: &[SubscriberType],
        sender: Arc<dyn Sender>,
        receiver: Arc<dyn Receiver>,
        serializer: Arc<dyn Serializer>,
    ) -> Result<Self, BusError> {
        for subscriber in subscribers {
            receiver.register_endpoint(&settings, subscriber)?;
        }

        let bus = Self {
            id: BusId::new(),
            settings,
            sender,
            receiver,
            serializer,
        };
        tracing::info!(
            bus_id = %bus.id,
            topic = %bus.settings.topic_name,
            endpoints = subscribers.len(),
            "service bus created"
        );
        Ok(bus)
    }
}

impl Bus for ServiceBus {
    fn id(&self) -> BusId {
        self.id
    }

    fn publish(&self, body: &serde_json::Value) -> Result<Uuid, BusError> {
        let payload = self.serializer.serialize(body)?;
        self.sender.send(
            &self.settings.topic_name,
            self.serializer.content_type(),
            payload,
        )
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        self.receiver.endpoints()
    }
}
