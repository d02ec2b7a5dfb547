#![forbid(unsafe_code)]

//! Ordered listener list used to bubble events to parent controllers.
//!
//! Listeners are held weakly: a parent usually owns its children, so strong
//! references in the other direction would form a cycle. Entries whose
//! controller has been dropped or disposed are pruned lazily.
//!
//! # Invariants
//!
//! 1. Listeners are returned in registration order.
//! 2. A controller appears at most once (pointer identity); registering it
//!    again is a programmer error and panics.
//! 3. A disposed listener is never counted or returned again.

use std::sync::Weak;

use crate::controller::{ControllerRef, Node};

fn live(entry: &Weak<Node>) -> Option<ControllerRef> {
    ControllerRef::upgrade(entry).filter(|listener| !listener.is_disposed())
}

/// Listeners registered on one controller.
#[derive(Default)]
pub struct ListenerList {
    entries: Vec<Weak<Node>>,
}

impl ListenerList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener`.
    ///
    /// # Panics
    ///
    /// If `listener` is already registered.
    pub fn add(&mut self, listener: &ControllerRef) {
        assert!(
            !self.contains(listener),
            "controller {} ({}) is already registered as a listener",
            listener.id(),
            listener.kind()
        );
        self.entries.push(listener.downgrade());
    }

    /// Remove `listener`. Returns `true` if it was registered.
    pub fn remove(&mut self, listener: &ControllerRef) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !listener.is_node(entry));
        self.entries.len() != before
    }

    /// Whether `listener` is registered.
    #[must_use]
    pub fn contains(&self, listener: &ControllerRef) -> bool {
        self.entries.iter().any(|entry| listener.is_node(entry))
    }

    /// Number of listeners neither dropped nor disposed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter_map(live).count()
    }

    /// Whether no live listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Prune dead entries and return the remaining listeners in order.
    pub fn live_targets(&mut self) -> Vec<ControllerRef> {
        let mut targets = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| match live(entry) {
            Some(listener) => {
                targets.push(listener);
                true
            }
            None => false,
        });
        targets
    }
}
