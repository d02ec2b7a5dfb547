#![forbid(unsafe_code)]

//! Window control facade and the back-office contract.
//!
//! Every controller owns one [`WindowControl`]. Creating it registers the
//! controller with the window back-office under a [`BusinessPath`], which is
//! what bookmarks and deep links are rebuilt from. After each component
//! dispatch the facade reports completion (with any new state transition) so
//! the back-office can maintain browser history.

use std::fmt;
use std::sync::Arc;

use wctl_core::{ControllerId, StateTransition};

use crate::controller::ControllerRef;
use crate::translator::Translator;

/// Position of a controller in the window, as `[Kind:id]` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BusinessPath(Arc<str>);

impl BusinessPath {
    /// The empty path of the window itself.
    #[must_use]
    pub fn root() -> Self {
        Self(Arc::from(""))
    }

    /// Path of a child created below `self`.
    #[must_use]
    pub fn child(&self, kind: &str, id: ControllerId) -> Self {
        Self(Arc::from(format!("{}[{kind}:{id}]", self.0)))
    }

    /// Parse `[Kind:id]` segments. Malformed segments are skipped.
    #[must_use]
    pub fn segments(&self) -> Vec<(&str, ControllerId)> {
        self.0
            .split(']')
            .filter_map(|segment| {
                let segment = segment.strip_prefix('[')?;
                let (kind, id) = segment.rsplit_once(':')?;
                let id = id.parse::<u64>().ok()?;
                Some((kind, ControllerId::from_raw(id)))
            })
            .collect()
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().len()
    }

    /// String form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation record handed to the back-office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedController {
    /// New controller.
    pub id: ControllerId,
    /// Controller kind.
    pub kind: &'static str,
    /// Where it sits in the window.
    pub business_path: BusinessPath,
}

/// Window-side bookkeeping a controller reports to.
///
/// Implementations must be thread-safe: disposal may happen on a thread other
/// than the one dispatching requests.
pub trait WindowBackOffice: Send + Sync {
    /// A controller was created at the given position.
    fn controller_created(&self, created: &CreatedController);

    /// A handle for a created controller exists and can receive dispatches.
    fn controller_attached(&self, controller: &ControllerRef) {
        let _ = controller;
    }

    /// `controller` finished its teardown and will never dispatch again.
    fn controller_disposed(&self, controller: ControllerId) {
        let _ = controller;
    }

    /// A component dispatch into `controller` finished.
    fn dispatch_completed(&self, controller: ControllerId, transition: Option<StateTransition>);

    /// Translator for framework messages.
    fn translator(&self) -> Arc<dyn Translator>;

    /// Whether controllers should emit activity events.
    fn activity_logging(&self) -> bool {
        true
    }
}

/// Per-controller facade over the window back-office.
#[derive(Clone)]
pub struct WindowControl {
    owner: Option<ControllerId>,
    business_path: BusinessPath,
    back_office: Arc<dyn WindowBackOffice>,
}

impl WindowControl {
    /// The window's own control, parent of every top-level controller.
    #[must_use]
    pub fn root(back_office: Arc<dyn WindowBackOffice>) -> Self {
        Self {
            owner: None,
            business_path: BusinessPath::root(),
            back_office,
        }
    }

    /// Control for a controller created below `parent`.
    ///
    /// Registers the creation with the back-office immediately.
    #[must_use]
    pub fn for_controller(parent: &WindowControl, owner: ControllerId, kind: &'static str) -> Self {
        let business_path = parent.business_path.child(kind, owner);
        let created = CreatedController {
            id: owner,
            kind,
            business_path: business_path.clone(),
        };
        parent.back_office.controller_created(&created);
        tracing::debug!(controller = owner.get(), kind, path = %business_path, "controller created");
        Self {
            owner: Some(owner),
            business_path,
            back_office: Arc::clone(&parent.back_office),
        }
    }

    /// Controller this control belongs to (`None` for the window root).
    #[must_use]
    pub fn owner(&self) -> Option<ControllerId> {
        self.owner
    }

    /// Business path of the owner.
    #[must_use]
    pub fn business_path(&self) -> &BusinessPath {
        &self.business_path
    }

    /// Underlying back-office.
    #[must_use]
    pub fn back_office(&self) -> &Arc<dyn WindowBackOffice> {
        &self.back_office
    }

    /// Translator of the hosting window.
    #[must_use]
    pub fn translator(&self) -> Arc<dyn Translator> {
        self.back_office.translator()
    }

    /// Report that a component dispatch into the owner finished.
    pub fn dispatch_completed(&self, transition: Option<StateTransition>) {
        if let Some(owner) = self.owner {
            self.back_office.dispatch_completed(owner, transition);
        }
    }
}

impl fmt::Debug for WindowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowControl")
            .field("owner", &self.owner)
            .field("business_path", &self.business_path)
            .finish()
    }
}
