//! Fluent builder over the shared configuration draft.
//!
//! Builders are handed out by [`ConfigurationHost`]. Every builder acquired
//! before the configuration is built points at the same draft, so a
//! setting applied through one builder is visible through all of them.
//! Setters only mutate the draft; components are created by
//! [`ConfigurationBuilder::build`].

use std::sync::Arc;

use parking_lot::Mutex;

use super::{BusConfiguration, ConfigurationHost};
use crate::components::{Receiver, Sender, Serializer};
use crate::config::BusSettings;
use crate::container::ContainerBuilder;
use crate::error::BusError;
use crate::registration::{AssemblyId, RegistrationTracker, SubscriberAssembly, SubscriberType};

/// Settings and registrations accumulated before the build.
#[derive(Debug, Default)]
pub(crate) struct Draft {
    pub(crate) settings: BusSettings,
    pub(crate) registrations: RegistrationTracker,
}

pub(crate) type SharedDraft = Arc<Mutex<Draft>>;

/// Accumulates settings and component overrides, then builds the
/// [`BusConfiguration`].
///
/// Setters on a single builder are not meant to be called from several
/// threads at once.
///
/// Once any builder of the same host has built, the draft is discarded:
/// setters on a builder acquired earlier still succeed but write into the
/// discarded draft and never reach the published configuration, and
/// [`ConfigurationBuilder::build`] fails with
/// [`BusError::AlreadyConfigured`].
#[derive(Debug)]
pub struct ConfigurationBuilder<'h> {
    host: &'h ConfigurationHost,
    draft: SharedDraft,
    components: ContainerBuilder,
}

impl<'h> ConfigurationBuilder<'h> {
    pub(crate) fn new(
        host: &'h ConfigurationHost,
        draft: SharedDraft,
        components: ContainerBuilder,
    ) -> Self {
        Self {
            host,
            draft,
            components,
        }
    }

    /// Sets the application id. Required.
    #[must_use]
    pub fn with_application_id(self, application_id: impl Into<String>) -> Self {
        self.draft.lock().settings.application_id = application_id.into();
        self
    }

    /// Sets the service bus namespace.
    #[must_use]
    pub fn with_namespace(self, namespace: impl Into<String>) -> Self {
        self.draft.lock().settings.namespace = namespace.into();
        self
    }

    /// Sets the issuer name.
    #[must_use]
    pub fn with_issuer_name(self, issuer_name: impl Into<String>) -> Self {
        self.draft.lock().settings.issuer_name = issuer_name.into();
        self
    }

    /// Sets the issuer key.
    #[must_use]
    pub fn with_issuer_key(self, issuer_key: impl Into<String>) -> Self {
        self.draft.lock().settings.issuer_key = issuer_key.into();
        self
    }

    /// Sets the service path.
    #[must_use]
    pub fn with_service_path(self, service_path: impl Into<String>) -> Self {
        self.draft.lock().settings.service_path = service_path.into();
        self
    }

    /// Sets the topic name.
    #[must_use]
    pub fn with_topic_name(self, topic_name: impl Into<String>) -> Self {
        self.draft.lock().settings.topic_name = topic_name.into();
        self
    }

    /// Sets how many threads may call message handlers.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if `max_threads` is 0.
    pub fn with_max_threads(self, max_threads: u8) -> Result<Self, BusError> {
        if max_threads == 0 {
            return Err(BusError::InvalidArgument("max_threads"));
        }
        self.draft.lock().settings.max_threads = max_threads;
        Ok(self)
    }

    /// Replaces every setting at once, e.g. with [`BusSettings::from_env`].
    ///
    /// Registrations are kept. A `max_threads` of 0 is raised to 1.
    #[must_use]
    pub fn with_settings_from(self, settings: BusSettings) -> Self {
        {
            let mut draft = self.draft.lock();
            draft.settings = BusSettings {
                max_threads: settings.max_threads.max(1),
                ..settings
            };
        }
        self
    }

    /// Registers an assembly and every subscriber type it lists.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the assembly id or any of
    /// its subscriber types is blank. Nothing is registered in that case.
    pub fn register_assembly(self, assembly: &SubscriberAssembly) -> Result<Self, BusError> {
        if assembly.id().is_blank() {
            return Err(BusError::InvalidArgument("assembly"));
        }
        if assembly.subscribers().iter().any(SubscriberType::is_blank) {
            return Err(BusError::InvalidArgument("subscriber"));
        }
        {
            let mut draft = self.draft.lock();
            draft
                .registrations
                .add_registered_assembly(assembly.id().clone())?;
            for subscriber in assembly.subscribers() {
                draft
                    .registrations
                    .add_registered_subscriber(subscriber.clone())?;
            }
        }
        Ok(self)
    }

    /// Registers a single subscriber type.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the subscriber is blank.
    pub fn register_subscriber(
        self,
        subscriber: impl Into<SubscriberType>,
    ) -> Result<Self, BusError> {
        self.draft
            .lock()
            .registrations
            .add_registered_subscriber(subscriber.into())?;
        Ok(self)
    }

    /// Registers a serializer that replaces the built-in JSON serializer.
    #[must_use]
    pub fn register_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.components.register_serializer(serializer);
        self
    }

    /// Registers a sender that replaces the built-in one.
    #[must_use]
    pub fn register_sender(mut self, sender: Arc<dyn Sender>) -> Self {
        self.components.register_sender(sender);
        self
    }

    /// Registers a receiver that replaces the built-in one.
    #[must_use]
    pub fn register_receiver(mut self, receiver: Arc<dyn Receiver>) -> Self {
        self.components.register_receiver(receiver);
        self
    }

    /// Current application id of the shared draft.
    #[must_use]
    pub fn application_id(&self) -> String {
        self.draft.lock().settings.application_id.clone()
    }

    /// Snapshot of the shared draft's settings.
    #[must_use]
    pub fn settings(&self) -> BusSettings {
        self.draft.lock().settings.clone()
    }

    /// Assemblies registered so far.
    #[must_use]
    pub fn registered_assemblies(&self) -> Vec<AssemblyId> {
        self.draft
            .lock()
            .registrations
            .registered_assemblies()
            .to_vec()
    }

    /// Subscribers registered so far.
    #[must_use]
    pub fn registered_subscribers(&self) -> Vec<SubscriberType> {
        self.draft
            .lock()
            .registrations
            .registered_subscribers()
            .to_vec()
    }

    /// Returns `true` if both builders mutate the same draft.
    #[must_use]
    pub fn shares_draft_with(&self, other: &ConfigurationBuilder<'_>) -> bool {
        Arc::ptr_eq(&self.draft, &other.draft)
    }

    /// Validates the draft, composes the components and primes the bus.
    ///
    /// On success the configuration is frozen and published as the host's
    /// instance.
    ///
    /// # Errors
    ///
    /// - [`BusError::Configuration`] if no application id is set.
    /// - [`BusError::AlreadyConfigured`] if the host was built already,
    ///   through this or any other builder. The draft this builder holds
    ///   was discarded at that point.
    /// - Any receiver error raised while priming the bus.
    pub fn build(self) -> Result<Arc<BusConfiguration>, BusError> {
        let Self {
            host,
            draft,
            components,
        } = self;
        host.finalize(&draft, components)
    }
}
