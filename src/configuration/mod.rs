//! Configuration lifecycle: the shared draft, its fluent builder and the
//! frozen configuration it produces.
//!
//! ```text
//! with_settings() ─► ConfigurationBuilder ─► build() ─► BusConfiguration
//!                        (shared draft)         │
//!                                               ├─ validate application id
//!                                               ├─ compose container
//!                                               └─ prime bus
//! ```

pub mod builder;
pub mod bus_configuration;
pub mod host;

pub use builder::ConfigurationBuilder;
pub use bus_configuration::BusConfiguration;
pub use host::{ConfigurationHost, LifecycleState, global, instance, with_container, with_settings};
