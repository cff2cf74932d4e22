//! # servicebus-bootstrap
//!
//! Configuration lifecycle and component wiring for a topic-based service
//! bus client.
//!
//! A process configures its bus exactly once: it acquires a builder,
//! applies settings and registrations, and builds. Building validates the
//! settings, composes the serializer, sender, receiver and bus, and primes
//! the bus so every registered subscriber has a receive endpoint before
//! the configuration is returned.
//!
//! ```no_run
//! use servicebus_bootstrap::configuration;
//! use servicebus_bootstrap::registration::SubscriberType;
//!
//! # fn main() -> Result<(), servicebus_bootstrap::error::BusError> {
//! struct OrderPlaced;
//!
//! let config = configuration::with_settings()?
//!     .with_application_id("orders")
//!     .with_namespace("contoso")
//!     .register_subscriber(SubscriberType::of::<OrderPlaced>())?
//!     .build()?;
//!
//! let bus = config.bus();
//! bus.publish(&serde_json::json!({ "order_id": 42 }))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ConfigurationHost (configuration/)
//!     │
//!     ├── ConfigurationBuilder ── RegistrationTracker (registration/)
//!     │
//!     └── BusConfiguration
//!             │
//!             └── Container (container)
//!                     ├── Serializer ┐
//!                     ├── Sender ────┼──► Bus (components/)
//!                     └── Receiver ──┘
//! ```

pub mod components;
pub mod config;
pub mod configuration;
pub mod container;
pub mod error;
pub mod registration;
