//! Lifecycle of the single bus configuration.
//!
//! [`ConfigurationHost`] walks through three states:
//!
//! ```text
//! Unconfigured ──acquire──► Building ──build──► Built
//! ```
//!
//! The first acquisition creates the shared draft under a lock; racing
//! callers all receive builders over that same draft. A successful build
//! freezes the configuration, after which acquiring a builder or building
//! again fails with [`BusError::AlreadyConfigured`]. A failed build leaves
//! the host in `Building` so the caller can fix the inputs and retry.
//!
//! No host lock is held while the bus is primed, so components may query
//! the host from inside `Receiver::register_endpoint`. A second build
//! started while one is priming fails with [`BusError::AlreadyConfigured`].
//!
//! The process-wide host is reached through [`with_settings`],
//! [`with_container`] and [`instance`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::builder::{Draft, SharedDraft};
use super::{BusConfiguration, ConfigurationBuilder};
use crate::container::ContainerBuilder;
use crate::error::BusError;

static GLOBAL: ConfigurationHost = ConfigurationHost::new();

/// Lifecycle state of a [`ConfigurationHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No builder has been acquired yet.
    Unconfigured,
    /// A draft exists and is being mutated.
    Building,
    /// The configuration is frozen and the bus primed.
    Built,
}

/// Owner of the shared draft and, once built, of the frozen configuration.
#[derive(Debug, Default)]
pub struct ConfigurationHost {
    draft: Mutex<Option<SharedDraft>>,
    building: AtomicBool,
    built: OnceLock<Arc<BusConfiguration>>,
}

impl ConfigurationHost {
    /// Creates an unconfigured host.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            draft: Mutex::new(None),
            building: AtomicBool::new(false),
            built: OnceLock::new(),
        }
    }

    /// Acquires a builder with no pre-registered components.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::AlreadyConfigured`] if the configuration has
    /// been built.
    pub fn with_settings(&self) -> Result<ConfigurationBuilder<'_>, BusError> {
        self.with_container(Some(ContainerBuilder::new()))
    }

    /// Acquires a builder seeded with the caller's component registrations.
    ///
    /// # Errors
    ///
    /// - [`BusError::InvalidArgument`] if `components` is `None`.
    /// - [`BusError::AlreadyConfigured`] if the configuration has been
    ///   built.
    pub fn with_container(
        &self,
        components: Option<ContainerBuilder>,
    ) -> Result<ConfigurationBuilder<'_>, BusError> {
        let components = components.ok_or(BusError::InvalidArgument("container"))?;
        if self.built.get().is_some() {
            return Err(BusError::AlreadyConfigured);
        }

        let mut slot = self.draft.lock();
        if self.built.get().is_some() {
            return Err(BusError::AlreadyConfigured);
        }
        let draft = slot.get_or_insert_with(|| {
            tracing::info!("bus configuration draft created");
            Arc::new(Mutex::new(Draft::default()))
        });
        Ok(ConfigurationBuilder::new(self, Arc::clone(draft), components))
    }

    /// Returns the built configuration, or `None` until a build succeeded.
    #[must_use]
    pub fn instance(&self) -> Option<Arc<BusConfiguration>> {
        self.built.get().map(Arc::clone)
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        if self.built.get().is_some() {
            return LifecycleState::Built;
        }
        if self.draft.lock().is_some() {
            LifecycleState::Building
        } else {
            LifecycleState::Unconfigured
        }
    }

    pub(crate) fn finalize(
        &self,
        draft: &SharedDraft,
        components: ContainerBuilder,
    ) -> Result<Arc<BusConfiguration>, BusError> {
        let (settings, registrations) = {
            let _slot = self.draft.lock();
            if self.built.get().is_some() || self.building.swap(true, Ordering::AcqRel) {
                return Err(BusError::AlreadyConfigured);
            }
            let draft = draft.lock();
            (draft.settings.clone(), draft.registrations.clone())
        };
        let custom_serializer = components.has_serializer();

        // Priming runs caller-supplied components; no host lock is held here.
        let assembled = BusConfiguration::assemble(settings, registrations, components);

        let mut slot = self.draft.lock();
        self.building.store(false, Ordering::Release);
        let config = match assembled {
            Ok(config) => Arc::new(config),
            Err(err) => {
                tracing::error!(error = %err, "bus configuration failed");
                return Err(err);
            }
        };
        if self.built.set(Arc::clone(&config)).is_err() {
            return Err(BusError::AlreadyConfigured);
        }
        *slot = None;
        drop(slot);

        tracing::info!(
            application_id = %config.application_id(),
            topic = %config.topic_name(),
            max_threads = config.max_threads(),
            subscribers = config.registered_subscribers().len(),
            custom_serializer,
            "bus configuration built"
        );
        Ok(config)
    }
}

/// Acquires a builder over the process-wide configuration.
///
/// # Errors
///
/// Returns [`BusError::AlreadyConfigured`] if the process-wide
/// configuration has been built.
pub fn with_settings() -> Result<ConfigurationBuilder<'static>, BusError> {
    GLOBAL.with_settings()
}

/// Acquires a builder over the process-wide configuration, seeded with
/// the caller's component registrations.
///
/// # Errors
///
/// - [`BusError::InvalidArgument`] if `components` is `None`.
/// - [`BusError::AlreadyConfigured`] if the process-wide configuration has
///   been built.
pub fn with_container(
    components: Option<ContainerBuilder>,
) -> Result<ConfigurationBuilder<'static>, BusError> {
    GLOBAL.with_container(components)
}

/// The process-wide configuration, or `None` until it has been built.
#[must_use]
pub fn instance() -> Option<Arc<BusConfiguration>> {
    GLOBAL.instance()
}

/// The process-wide host.
#[must_use]
pub fn global() -> &'static ConfigurationHost {
    &GLOBAL
}
