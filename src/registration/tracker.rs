//! Deduplicating registry of known assemblies and subscriber types.
//!
//! [`RegistrationTracker`] is filled while the configuration is being
//! built and read afterwards by the receiver to create one endpoint per
//! subscriber. Listings keep first-insertion order.

use std::collections::HashSet;
use std::hash::Hash;

use super::{AssemblyId, SubscriberType};
use crate::error::BusError;

/// Insertion-ordered set: a list plus a membership index.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    index: HashSet<T>,
}

impl<T: Clone + Eq + Hash> OrderedSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Inserts `value` unless already present. Returns `true` if inserted.
    pub fn insert(&mut self, value: T) -> bool {
        if self.index.contains(&value) {
            return false;
        }
        self.index.insert(value.clone());
        self.items.push(value);
        true
    }

    /// Returns the members in first-insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone + Eq + Hash> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Known assemblies and subscriber types.
#[derive(Debug, Clone, Default)]
pub struct RegistrationTracker {
    assemblies: OrderedSet<AssemblyId>,
    subscribers: OrderedSet<SubscriberType>,
}

impl RegistrationTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an assembly. Re-adding a known assembly is a no-op.
    ///
    /// Returns `true` if the assembly was not known before.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the identifier is blank.
    pub fn add_registered_assembly(&mut self, assembly: AssemblyId) -> Result<bool, BusError> {
        if assembly.is_blank() {
            return Err(BusError::InvalidArgument("assembly"));
        }
        Ok(self.assemblies.insert(assembly))
    }

    /// Records a subscriber type. Re-adding a known type is a no-op.
    ///
    /// Returns `true` if the subscriber was not known before.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the identifier is blank.
    pub fn add_registered_subscriber(
        &mut self,
        subscriber: SubscriberType,
    ) -> Result<bool, BusError> {
        if subscriber.is_blank() {
            return Err(BusError::InvalidArgument("subscriber"));
        }
        Ok(self.subscribers.insert(subscriber))
    }

    /// Known assemblies in registration order.
    #[must_use]
    pub fn registered_assemblies(&self) -> &[AssemblyId] {
        self.assemblies.as_slice()
    }

    /// Known subscriber types in registration order.
    #[must_use]
    pub fn registered_subscribers(&self) -> &[SubscriberType] {
        self.subscribers.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_set_keeps_first_insertion_order() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.as_slice(), &["b", "a"]);
    }

    #[test]
    fn duplicate_assembly_is_listed_once() {
        let mut tracker = RegistrationTracker::new();
        assert!(matches!(
            tracker.add_registered_assembly(AssemblyId::new("A")),
            Ok(true)
        ));
        assert!(matches!(
            tracker.add_registered_assembly(AssemblyId::new("A")),
            Ok(false)
        ));
        assert_eq!(tracker.registered_assemblies().len(), 1);
    }

    #[test]
    fn subscribers_keep_first_insertion_order() {
        let mut tracker = RegistrationTracker::new();
        for name in ["x::Second", "x::First", "x::Second", "x::Third", "x::First"] {
            let _ = tracker.add_registered_subscriber(SubscriberType::new(name));
        }
        let names: Vec<&str> = tracker
            .registered_subscribers()
            .iter()
            .map(SubscriberType::as_str)
            .collect();
        assert_eq!(names, vec!["x::Second", "x::First", "x::Third"]);
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        let mut tracker = RegistrationTracker::new();
        assert!(matches!(
            tracker.add_registered_assembly(AssemblyId::new("")),
            Err(BusError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.add_registered_subscriber(SubscriberType::new(" ")),
            Err(BusError::InvalidArgument(_))
        ));
        assert!(tracker.registered_assemblies().is_empty());
        assert!(tracker.registered_subscribers().is_empty());
    }
}
