//! Identifiers for subscriber types and the assemblies that group them.
//!
//! Subscribers are registered explicitly: a [`SubscriberType`] names a
//! handler type (usually through [`SubscriberType::of`]) and a
//! [`SubscriberAssembly`] lists the subscriber types a component ships.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a message subscriber type.
///
/// Two values are the same subscriber when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberType(String);

impl SubscriberType {
    /// Creates a subscriber identifier from a type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Names the Rust type `T` as a subscriber.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Returns the full type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment of the type name, without generics.
    ///
    /// `my_app::handlers::OrderPlaced` becomes `OrderPlaced`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Returns `true` if the identifier is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SubscriberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriberType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identity of a subscriber assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssemblyId(String);

impl AssemblyId {
    /// Creates an assembly identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the assembly name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssemblyId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A named group of subscriber types.
///
/// Registering an assembly with the configuration builder registers the
/// assembly itself and every subscriber it lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberAssembly {
    id: AssemblyId,
    subscribers: Vec<SubscriberType>,
}

impl SubscriberAssembly {
    /// Creates an empty assembly.
    #[must_use]
    pub fn new(id: impl Into<AssemblyId>) -> Self {
        Self {
            id: id.into(),
            subscribers: Vec::new(),
        }
    }

    /// Adds a subscriber type to the assembly.
    #[must_use]
    pub fn with_subscriber(mut self, subscriber: impl Into<SubscriberType>) -> Self {
        self.subscribers.push(subscriber.into());
        self
    }

    /// Adds the Rust type `T` as a subscriber.
    #[must_use]
    pub fn with<T: ?Sized>(self) -> Self {
        self.with_subscriber(SubscriberType::of::<T>())
    }

    /// Returns the assembly identifier.
    #[must_use]
    pub fn id(&self) -> &AssemblyId {
        &self.id
    }

    /// Returns the subscriber types listed by this assembly.
    #[must_use]
    pub fn subscribers(&self) -> &[SubscriberType] {
        &self.subscribers
    }
}

impl From<String> for AssemblyId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
