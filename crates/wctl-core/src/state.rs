#![forbid(unsafe_code)]

//! Controller state records for permalinks and back/forward replay.
//!
//! A controller reports where it is by setting a [`ControllerState`] on its
//! [`StateTracker`]. The tracker remembers the previous value for exactly one
//! transition and raises a *new transition* flag that the window collects
//! into its browser history after the dispatch completes.
//!
//! # Invariants
//!
//! 1. Setting the state to the value it already holds is a no-op.
//! 2. A transition is only recorded while the tracker is in
//!    [`DispatchPhase::Dispatching`]. Replays ([`DispatchPhase::Replaying`])
//!    and idle updates change the state silently, so replaying a back-button
//!    step never shows up as a fresh forward step.
//! 3. The initial state is [`ControllerState::Null`].

use std::fmt;
use std::sync::Arc;

/// Immutable named checkpoint of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ControllerState {
    /// No bookmarkable state reached yet.
    #[default]
    Null,
    /// A named, bookmarkable state.
    Named(Arc<str>),
}

impl ControllerState {
    /// Create a named state.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Whether this is the null sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The state name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<null>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ControllerState {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

/// What the owning controller is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPhase {
    /// Outside any dispatch (construction, teardown).
    #[default]
    Idle,
    /// Handling a live user or child-controller event.
    Dispatching,
    /// Replaying a state from browser history.
    Replaying,
}

/// A recorded move from one state to another.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateTransition {
    /// State before the move.
    pub previous: ControllerState,
    /// State after the move.
    pub current: ControllerState,
}

/// Current/previous state plus the pending-transition flag.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    current: ControllerState,
    previous: ControllerState,
    phase: DispatchPhase,
    new_transition: bool,
}

impl StateTracker {
    /// Create a tracker in the null state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn current(&self) -> &ControllerState {
        &self.current
    }

    /// State held before the last change.
    #[must_use]
    pub fn previous(&self) -> &ControllerState {
        &self.previous
    }

    /// Current dispatch phase.
    #[must_use]
    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    /// Switch phase, returning the phase that was active before.
    pub fn set_phase(&mut self, phase: DispatchPhase) -> DispatchPhase {
        std::mem::replace(&mut self.phase, phase)
    }

    /// Move to `state`. Returns `true` if the state changed.
    pub fn set(&mut self, state: impl Into<ControllerState>) -> bool {
        let state = state.into();
        if state == self.current {
            return false;
        }
        self.previous = std::mem::replace(&mut self.current, state);
        if self.phase == DispatchPhase::Dispatching {
            self.new_transition = true;
        }
        true
    }

    /// Whether a transition is waiting to be collected.
    #[must_use]
    pub fn has_new_transition(&self) -> bool {
        self.new_transition
    }

    /// Collect and clear the pending transition.
    pub fn take_transition(&mut self) -> Option<StateTransition> {
        if !std::mem::take(&mut self.new_transition) {
            return None;
        }
        Some(StateTransition {
            previous: self.previous.clone(),
            current: self.current.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dispatching() -> StateTracker {
        let mut tracker = StateTracker::new();
        tracker.set_phase(DispatchPhase::Dispatching);
        tracker
    }

    #[test]
    fn starts_null() {
        let tracker = StateTracker::new();
        assert!(tracker.current().is_null());
        assert!(tracker.previous().is_null());
        assert_eq!(tracker.phase(), DispatchPhase::Idle);
        assert!(!tracker.has_new_transition());
    }

    #[test]
    fn same_state_is_not_a_transition() {
        let mut tracker = dispatching();
        assert!(tracker.set("step1"));
        tracker.take_transition();
        assert!(!tracker.set("step1"));
        assert!(tracker.take_transition().is_none());
    }

    #[test]
    fn dispatch_change_records_transition() {
        let mut tracker = dispatching();
        tracker.set("step1");
        tracker.set("step2");
        let transition = tracker.take_transition().expect("transition");
        assert_eq!(transition.previous, ControllerState::named("step1"));
        assert_eq!(transition.current, ControllerState::named("step2"));
        assert!(tracker.take_transition().is_none());
    }

    #[test]
    fn replay_changes_state_silently() {
        let mut tracker = StateTracker::new();
        tracker.set_phase(DispatchPhase::Replaying);
        assert!(tracker.set("step1"));
        assert_eq!(tracker.current().name(), Some("step1"));
        assert!(!tracker.has_new_transition());
    }

    #[test]
    fn idle_change_is_silent() {
        let mut tracker = StateTracker::new();
        tracker.set("initial");
        assert!(!tracker.has_new_transition());
        assert!(tracker.previous().is_null());
    }

    #[test]
    fn set_phase_returns_previous_phase() {
        let mut tracker = StateTracker::new();
        assert_eq!(tracker.set_phase(DispatchPhase::Replaying), DispatchPhase::Idle);
        assert_eq!(tracker.set_phase(DispatchPhase::Idle), DispatchPhase::Replaying);
    }

    #[test]
    fn display_formats_null_and_named() {
        assert_eq!(ControllerState::Null.to_string(), "<null>");
        assert_eq!(ControllerState::named("edit").to_string(), "edit");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn transitions_serialize_for_permalinks() {
        let transition = StateTransition {
            previous: ControllerState::Null,
            current: ControllerState::named("step2"),
        };
        let json = serde_json::to_string(&transition).unwrap();
        assert_eq!(json, r#"{"previous":"null","current":{"named":"step2"}}"#);
        let parsed: StateTransition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, transition);
    }

    proptest! {
        #[test]
        fn only_dispatching_phase_raises_transitions(
            steps in proptest::collection::vec(("[a-c]", 0u8..3), 1..32)
        ) {
            let mut tracker = StateTracker::new();
            for (name, phase) in steps {
                tracker.take_transition();
                let phase = match phase {
                    0 => DispatchPhase::Idle,
                    1 => DispatchPhase::Dispatching,
                    _ => DispatchPhase::Replaying,
                };
                tracker.set_phase(phase);
                let before = tracker.current().clone();
                let changed = tracker.set(name.as_str());
                prop_assert_eq!(changed, before.name() != Some(name.as_str()));
                prop_assert_eq!(
                    tracker.has_new_transition(),
                    changed && phase == DispatchPhase::Dispatching
                );
                if changed {
                    prop_assert_eq!(tracker.previous(), &before);
                }
            }
        }
    }
}
