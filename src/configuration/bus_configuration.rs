//! The frozen, process-wide bus configuration.

use std::sync::Arc;

use crate::components::{Bus, Serializer};
use crate::config::BusSettings;
use crate::container::{Container, ContainerBuilder};
use crate::error::BusError;
use crate::registration::{AssemblyId, RegistrationTracker, SubscriberType};

/// Read-only configuration contract consumed by the rest of the client.
///
/// A `BusConfiguration` only exists once validation passed, the container
/// was composed and the bus was primed. Nothing in it can change
/// afterwards.
#[derive(Debug)]
pub struct BusConfiguration {
    settings: Arc<BusSettings>,
    registrations: RegistrationTracker,
    container: Container,
    bus: Arc<dyn Bus>,
}

impl BusConfiguration {
    /// Validates the draft, composes the container and primes the bus.
    ///
    /// # Errors
    ///
    /// - [`BusError::Configuration`] if no application id is set. No
    ///   component is created in that case.
    /// - Any error raised by the receiver while the bus registers its
    ///   endpoints.
    pub fn assemble(
        settings: BusSettings,
        registrations: RegistrationTracker,
        components: ContainerBuilder,
    ) -> Result<Self, BusError> {
        if !settings.has_application_id() {
            return Err(BusError::Configuration(
                "ApplicationId must be set.".to_string(),
            ));
        }

        let settings = Arc::new(settings);
        let container = components.build(
            Arc::clone(&settings),
            registrations.registered_subscribers().to_vec(),
        );
        let bus = container.prime()?;

        Ok(Self {
            settings,
            registrations,
            container,
            bus,
        })
    }

    /// The bus resolved during priming.
    #[must_use]
    pub fn bus(&self) -> Arc<dyn Bus> {
        Arc::clone(&self.bus)
    }

    /// The serializer resolved from the container.
    #[must_use]
    pub fn default_serializer(&self) -> Arc<dyn Serializer> {
        self.container.serializer()
    }

    /// The component container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// All settings as one record.
    #[must_use]
    pub fn settings(&self) -> &BusSettings {
        &self.settings
    }

    /// Threads the receiver may use to call message handlers (at least 1).
    #[must_use]
    pub fn max_threads(&self) -> u8 {
        self.settings.max_threads
    }

    /// Registered assemblies in registration order.
    #[must_use]
    pub fn registered_assemblies(&self) -> &[AssemblyId] {
        self.registrations.registered_assemblies()
    }

    /// Registered subscriber types in registration order.
    #[must_use]
    pub fn registered_subscribers(&self) -> &[SubscriberType] {
        self.registrations.registered_subscribers()
    }

    /// Application id.
    #[must_use]
    pub fn application_id(&self) -> &str {
        &self.settings.application_id
    }

    /// Service bus namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.settings.namespace
    }

    /// Issuer name.
    #[must_use]
    pub fn issuer_name(&self) -> &str {
        &self.settings.issuer_name
    }

    /// Issuer key.
    #[must_use]
    pub fn issuer_key(&self) -> &str {
        &self.settings.issuer_key
    }

    /// Service path.
    #[must_use]
    pub fn service_path(&self) -> &str {
        &self.settings.service_path
    }

    /// Topic name.
    #[must_use]
    pub fn topic_name(&self) -> &str {
        &self.settings.topic_name
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_application_id_is_a_configuration_error() {
        let result = BusConfiguration::assemble(
            BusSettings::default(),
            RegistrationTracker::new(),
            ContainerBuilder::new(),
        );
        let Err(BusError::Configuration(message)) = result else {
            panic!("expected a configuration error");
        };
        assert_eq!(message, "ApplicationId must be set.");
    }

    #[test]
    fn assemble_primes_bus_with_endpoints() {
        let mut registrations = RegistrationTracker::new();
        let _ = registrations.add_registered_subscriber(SubscriberType::new("a::Handler"));
        let settings = BusSettings {
            application_id: "app1".to_string(),
            ..BusSettings::default()
        };

        let Ok(config) =
            BusConfiguration::assemble(settings, registrations, ContainerBuilder::new())
        else {
            panic!("assemble failed");
        };
        assert_eq!(config.bus().endpoints().len(), 1);
        let Some(cached) = config.container().resolve_bus() else {
            panic!("bus not cached in container");
        };
        assert_eq!(cached.id(), config.bus().id());
        assert_eq!(config.application_id(), "app1");
        assert_eq!(config.topic_name(), "pro_ext_topic");
        assert_eq!(config.max_threads(), 1);
    }
}
