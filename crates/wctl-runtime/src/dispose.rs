#![forbid(unsafe_code)]

//! One-shot dispose guard and the live-controller counter.
//!
//! # Design Invariants
//!
//! 1. `Live -> Disposed` happens at most once per guard; there is no way back.
//! 2. The flag is flipped under the lock *before* any teardown work, so of two
//!    racing dispose calls exactly one wins and the other returns at once.
//! 3. The live counter is a diagnostic statistic. Nothing branches on it.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

static LIVE_CONTROLLERS: AtomicUsize = AtomicUsize::new(0);

/// Number of controllers created and not yet torn down, process-wide.
#[must_use]
pub fn live_controller_count() -> usize {
    LIVE_CONTROLLERS.load(Ordering::Relaxed)
}

pub(crate) fn register_live() -> usize {
    LIVE_CONTROLLERS.fetch_add(1, Ordering::Relaxed) + 1
}

pub(crate) fn release_live() -> usize {
    let previous = LIVE_CONTROLLERS
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
        .unwrap_or(0);
    previous.saturating_sub(1)
}

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Accepting dispatches.
    #[default]
    Live,
    /// Torn down (or being torn down). Terminal.
    Disposed,
}

/// Lock-protected lifecycle flag.
#[derive(Debug, Default)]
pub struct DisposeGuard {
    state: Mutex<Lifecycle>,
}

impl DisposeGuard {
    /// A guard in the live state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip to [`Lifecycle::Disposed`]. Returns `true` only for the caller
    /// that performed the flip.
    pub fn begin_dispose(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == Lifecycle::Disposed {
            return false;
        }
        *state = Lifecycle::Disposed;
        true
    }

    /// Current lifecycle.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the guard has been flipped.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lifecycle() == Lifecycle::Disposed
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
