//! Component container: composes the serializer, sender, receiver and bus.
//!
//! [`ContainerBuilder`] collects optional overrides. A later registration
//! for the same contract replaces an earlier one, and any contract left
//! without an override falls back to its built-in implementation.
//! [`ContainerBuilder::build`] composes the components in dependency order:
//!
//! ```text
//! Serializer ─┐
//! Sender ─────┼──► Bus (built by Container::prime)
//! Receiver ───┘
//! ```
//!
//! Every component is singleton-scoped: the container holds exactly one
//! instance per contract for its whole lifetime.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::components::{
    Bus, JsonSerializer, Receiver, Sender, Serializer, ServiceBus, SubscriptionReceiver,
    TopicSender,
};
use crate::config::BusSettings;
use crate::error::BusError;
use crate::registration::SubscriberType;

/// Pending component registrations.
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    serializer: Option<Arc<dyn Serializer>>,
    sender: Option<Arc<dyn Sender>>,
    receiver: Option<Arc<dyn Receiver>>,
}

impl ContainerBuilder {
    /// Creates a builder with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a serializer, replacing any earlier registration.
    pub fn register_serializer(&mut self, serializer: Arc<dyn Serializer>) -> &mut Self {
        self.serializer = Some(serializer);
        self
    }

    /// Registers a sender, replacing any earlier registration.
    pub fn register_sender(&mut self, sender: Arc<dyn Sender>) -> &mut Self {
        self.sender = Some(sender);
        self
    }

    /// Registers a receiver, replacing any earlier registration.
    pub fn register_receiver(&mut self, receiver: Arc<dyn Receiver>) -> &mut Self {
        self.receiver = Some(receiver);
        self
    }

    /// Returns `true` if a serializer override is registered.
    #[must_use]
    pub fn has_serializer(&self) -> bool {
        self.serializer.is_some()
    }

    /// Composes the container for the given settings and subscribers.
    ///
    /// The bus is not created here; call [`Container::prime`].
    #[must_use]
    pub fn build(self, settings: Arc<BusSettings>, subscribers: Vec<SubscriberType>) -> Container {
        let serializer = self.serializer.unwrap_or_else(|| {
            tracing::debug!("using built-in json serializer");
            Arc::new(JsonSerializer::new())
        });
        let sender = self.sender.unwrap_or_else(|| Arc::new(TopicSender::new()));
        let receiver = self
            .receiver
            .unwrap_or_else(|| Arc::new(SubscriptionReceiver::new()));

        tracing::debug!(
            serializer = ?serializer,
            sender = ?sender,
            receiver = ?receiver,
            "container composed"
        );

        Container {
            settings,
            subscribers,
            serializer,
            sender,
            receiver,
            bus: Mutex::new(None),
        }
    }
}

/// Built component container.
#[derive(Debug)]
pub struct Container {
    settings: Arc<BusSettings>,
    subscribers: Vec<SubscriberType>,
    serializer: Arc<dyn Serializer>,
    sender: Arc<dyn Sender>,
    receiver: Arc<dyn Receiver>,
    bus: Mutex<Option<Arc<dyn Bus>>>,
}

impl Container {
    /// Resolves the bus, creating it on the first call.
    ///
    /// Creating the bus registers a receive endpoint for every subscriber,
    /// so the configuration builder calls this once while building. Later
    /// calls return the cached instance and have no side effects.
    ///
    /// # Errors
    ///
    /// Returns the receiver's error if endpoint registration fails. The bus
    /// is not cached in that case.
    pub fn prime(&self) -> Result<Arc<dyn Bus>, BusError> {
        let mut slot = self.bus.lock();
        if let Some(bus) = slot.as_ref() {
            return Ok(Arc::clone(bus));
        }

        let bus: Arc<dyn Bus> = Arc::new(ServiceBus::new(
            Arc::clone(&self.settings),
            &self.subscribers,
            Arc::clone(&self.sender),
            Arc::clone(&self.receiver),
            Arc::clone(&self.serializer),
        )?);
        *slot = Some(Arc::clone(&bus));
        tracing::info!(bus_id = %bus.id(), "bus primed");
        Ok(bus)
    }

    /// Returns the bus if it has been primed.
    #[must_use]
    pub fn resolve_bus(&self) -> Option<Arc<dyn Bus>> {
        self.bus.lock().as_ref().map(Arc::clone)
    }

    /// Resolves the serializer.
    #[must_use]
    pub fn serializer(&self) -> Arc<dyn Serializer> {
        Arc::clone(&self.serializer)
    }

    /// Resolves the sender.
    #[must_use]
    pub fn sender(&self) -> Arc<dyn Sender> {
        Arc::clone(&self.sender)
    }

    /// Resolves the receiver.
    #[must_use]
    pub fn receiver(&self) -> Arc<dyn Receiver> {
        Arc::clone(&self.receiver)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::components::Endpoint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingReceiver {
        inner: SubscriptionReceiver,
        calls: AtomicUsize,
    }

    impl Receiver for CountingReceiver {
        fn register_endpoint(
            &self,
            settings: &BusSettings,
            subscriber: &SubscriberType,
        ) -> Result<Endpoint, BusError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.register_endpoint(settings, subscriber)
        }

        fn endpoints(&self) -> Vec<Endpoint> {
            self.inner.endpoints()
        }
    }

    #[derive(Debug)]
    struct FailingReceiver;

    impl Receiver for FailingReceiver {
        fn register_endpoint(
            &self,
            _settings: &BusSettings,
            subscriber: &SubscriberType,
        ) -> Result<Endpoint, BusError> {
            Err(BusError::Endpoint(format!("cannot subscribe {subscriber}")))
        }

        fn endpoints(&self) -> Vec<Endpoint> {
            Vec::new()
        }
    }

    #[derive(Debug)]
    struct NamedSerializer(&'static str);

    impl Serializer for NamedSerializer {
        fn content_type(&self) -> &'static str {
            self.0
        }

        fn serialize(&self, body: &serde_json::Value) -> Result<Vec<u8>, BusError> {
            Ok(body.to_string().into_bytes())
        }

        fn deserialize(&self, bytes: &[u8]) -> Result<serde_json::Value, BusError> {
            Ok(serde_json::from_slice(bytes)?)
        }
    }

    fn settings() -> Arc<BusSettings> {
        Arc::new(BusSettings {
            application_id: "app1".to_string(),
            ..BusSettings::default()
        })
    }

    #[test]
    fn defaults_are_used_without_overrides() {
        let container = ContainerBuilder::new().build(settings(), Vec::new());
        assert_eq!(container.serializer().content_type(), "application/json");
        assert!(container.resolve_bus().is_none());
    }

    #[test]
    fn last_serializer_registration_wins() {
        let mut builder = ContainerBuilder::new();
        builder
            .register_serializer(Arc::new(NamedSerializer("first")))
            .register_serializer(Arc::new(NamedSerializer("second")));
        assert!(builder.has_serializer());

        let container = builder.build(settings(), Vec::new());
        assert_eq!(container.serializer().content_type(), "second");
    }

    #[test]
    fn prime_registers_endpoints_once() {
        let receiver = Arc::new(CountingReceiver::default());
        let mut builder = ContainerBuilder::new();
        builder.register_receiver(Arc::<CountingReceiver>::clone(&receiver));
        let container = builder.build(
            settings(),
            vec![SubscriberType::new("a::One"), SubscriberType::new("a::Two")],
        );

        assert_eq!(receiver.calls.load(Ordering::SeqCst), 0);

        let first = container.prime();
        let second = container.prime();
        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("priming failed");
        };
        assert_eq!(first.id(), second.id());
        assert_eq!(receiver.calls.load(Ordering::SeqCst), 2);
        assert_eq!(receiver.endpoints().len(), 2);

        let Some(resolved) = container.resolve_bus() else {
            panic!("bus not cached");
        };
        assert_eq!(resolved.id(), first.id());
    }

    #[test]
    fn failed_prime_leaves_bus_unresolvable() {
        let mut builder = ContainerBuilder::new();
        builder.register_receiver(Arc::new(FailingReceiver));
        let container = builder.build(settings(), vec![SubscriberType::new("a::One")]);

        assert!(matches!(container.prime(), Err(BusError::Endpoint(_))));
        assert!(container.resolve_bus().is_none());
    }

    #[test]
    fn sender_override_receives_published_messages() {
        let sender = Arc::new(TopicSender::new());
        let mut builder = ContainerBuilder::new();
        builder.register_sender(Arc::<TopicSender>::clone(&sender));
        let container = builder.build(settings(), Vec::new());

        let Ok(bus) = container.prime() else {
            panic!("priming failed");
        };
        let _ = bus.publish(&serde_json::json!({"k": "v"}));
        assert_eq!(sender.pending(), 1);
    }
}
