//! Built-in receiver that tracks one endpoint per subscriber.
//!
//! Endpoints are created when the bus is primed. Each endpoint binds a
//! subscriber type to a named subscription on the configured topic.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use super::Receiver;
use crate::config::BusSettings;
use crate::error::BusError;
use crate::registration::SubscriberType;

/// A receive endpoint for a single subscriber type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Subscriber type served by this endpoint.
    pub subscriber: SubscriberType,
    /// Topic the subscription listens on.
    pub topic: String,
    /// Subscription name, `<application_id>.<subscriber short name>`.
    pub subscription: String,
    /// Maximum concurrent handler calls for this endpoint.
    pub max_concurrent_calls: u8,
    /// Time the endpoint was registered.
    pub registered_at: DateTime<Utc>,
}

/// Default [`Receiver`].
#[derive(Debug, Default)]
pub struct SubscriptionReceiver {
    endpoints: Mutex<Vec<Endpoint>>,
}

impl SubscriptionReceiver {
    /// Creates a receiver with no endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscription name used for `subscriber` under `settings`.
    ///
    /// Only the last path segment of the type name is used, so two
    /// subscriber types may map to the same name; the receiver refuses the
    /// second one.
    #[must_use]
    pub fn subscription_name(settings: &BusSettings, subscriber: &SubscriberType) -> String {
        format!("{}.{}", settings.application_id, subscriber.short_name())
    }
}

impl Receiver for SubscriptionReceiver {
    fn register_endpoint(
        &self,
        settings: &BusSettings,
        subscriber: &SubscriberType,
    ) -> Result<Endpoint, BusError> {
        if settings.topic_name.trim().is_empty() {
            return Err(BusError::Endpoint(format!(
                "no topic configured for subscriber {subscriber}"
            )));
        }

        let mut endpoints = self.endpoints.lock();
        if let Some(existing) = endpoints.iter().find(|e| &e.subscriber == subscriber) {
            return Ok(existing.clone());
        }

        let subscription = Self::subscription_name(settings, subscriber);
        if let Some(taken) = endpoints
            .iter()
            .find(|e| e.topic == settings.topic_name && e.subscription == subscription)
        {
            return Err(BusError::Endpoint(format!(
                "subscription {subscription} of {subscriber} is already used by {}",
                taken.subscriber
            )));
        }

        let endpoint = Endpoint {
            subscriber: subscriber.clone(),
            topic: settings.topic_name.clone(),
            subscription,
            max_concurrent_calls: settings.max_threads.max(1),
            registered_at: Utc::now(),
        };
        endpoints.push(endpoint.clone());

        tracing::info!(
            subscriber = %endpoint.subscriber,
            topic = %endpoint.topic,
            subscription = %endpoint.subscription,
            "endpoint registered"
        );
        Ok(endpoint)
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        self.endpoints.lock().clone()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn settings() -> BusSettings {
        BusSettings {
            application_id: "app1".to_string(),
            max_threads: 4,
            ..BusSettings::default()
        }
    }

    #[test]
    fn endpoint_uses_topic_and_subscription_name() {
        let receiver = SubscriptionReceiver::new();
        let subscriber = SubscriberType::new("shop::handlers::OrderPlaced");
        let Ok(endpoint) = receiver.register_endpoint(&settings(), &subscriber) else {
            panic!("registration failed");
        };
        assert_eq!(endpoint.topic, "pro_ext_topic");
        assert_eq!(endpoint.subscription, "app1.OrderPlaced");
        assert_eq!(endpoint.max_concurrent_calls, 4);
    }

    #[test]
    fn registering_twice_keeps_one_endpoint() {
        let receiver = SubscriptionReceiver::new();
        let subscriber = SubscriberType::new("a::B");
        let first = receiver.register_endpoint(&settings(), &subscriber);
        let second = receiver.register_endpoint(&settings(), &subscriber);
        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("registration failed");
        };
        assert_eq!(first, second);
        assert_eq!(receiver.endpoints().len(), 1);
    }

    #[test]
    fn missing_topic_is_an_endpoint_error() {
        let receiver = SubscriptionReceiver::new();
        let settings = BusSettings {
            topic_name: String::new(),
            ..settings()
        };
        let result = receiver.register_endpoint(&settings, &SubscriberType::new("a::B"));
        assert!(matches!(result, Err(BusError::Endpoint(_))));
        assert!(receiver.endpoints().is_empty());
    }

    #[test]
    fn same_short_name_on_one_topic_is_rejected() {
        let receiver = SubscriptionReceiver::new();
        let billing = SubscriberType::new("billing::OrderPlaced");
        let shipping = SubscriberType::new("shipping::OrderPlaced");

        let Ok(_endpoint) = receiver.register_endpoint(&settings(), &billing) else {
            panic!("registration failed");
        };
        let Err(BusError::Endpoint(message)) = receiver.register_endpoint(&settings(), &shipping)
        else {
            panic!("expected a subscription collision");
        };
        assert!(message.contains("billing::OrderPlaced"));

        let endpoints = receiver.endpoints();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints.first().map(|e| &e.subscriber), Some(&billing));
    }
}
