//! Registration layer: subscriber identities and the tracker that
//! deduplicates them.

pub mod subscriber;
pub mod tracker;

pub use subscriber::{AssemblyId, SubscriberAssembly, SubscriberType};
pub use tracker::{OrderedSet, RegistrationTracker};
