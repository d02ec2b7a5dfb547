#![forbid(unsafe_code)]

//! Stock window back-office.
//!
//! [`Window`] is the bookkeeping behind one browser window or tab:
//!
//! - the creation log of live controllers (business paths for deep links),
//! - a registry of live controller handles to route incoming actions,
//! - a bounded back/forward history of state transitions,
//! - the root panel that renders the window,
//! - teardown of every controller when the window goes away.
//!
//! The window lock is never held while calling into a controller, since
//! controllers report back through [`WindowBackOffice`] during dispatch.
//!
//! Disposed controllers leave the creation log, the registry and the history
//! when their teardown completes. Controllers dropped without a dispose are
//! pruned the next time a controller attaches.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use wctl_core::{
    Component, ComponentId, ControllerId, ControllerState, Event, Panel, StateTransition,
    UserRequest,
};

use crate::config::RuntimeConfig;
use crate::controller::{ControllerRef, Node};
use crate::translator::{Catalog, Translator};
use crate::window::{CreatedController, WindowBackOffice, WindowControl};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by window operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// No live handle is registered for the controller.
    UnknownController(ControllerId),
    /// The controller exists but has been disposed.
    ControllerDisposed(ControllerId),
    /// Nothing to navigate to.
    NoHistory,
    /// The window itself has been disposed.
    Disposed,
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::UnknownController(id) => write!(f, "unknown controller {id}"),
            WindowError::ControllerDisposed(id) => write!(f, "controller {id} is disposed"),
            WindowError::NoHistory => f.write_str("no history entry to navigate to"),
            WindowError::Disposed => f.write_str("window is disposed"),
        }
    }
}

impl std::error::Error for WindowError {}

// ─────────────────────────────────────────────────────────────────────────────
// Window
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded browser-history step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Controller that made the transition.
    pub controller: ControllerId,
    /// The transition itself.
    pub transition: StateTransition,
}

#[derive(Default)]
struct Book {
    created: Vec<CreatedController>,
    controllers: HashMap<ControllerId, Weak<Node>>,
    dispatches: u64,
    back: VecDeque<HistoryEntry>,
    forward: Vec<HistoryEntry>,
    disposed: bool,
}

impl Book {
    fn forget(&mut self, id: ControllerId) {
        self.controllers.remove(&id);
        self.created.retain(|created| created.id != id);
        self.back.retain(|entry| entry.controller != id);
        self.forward.retain(|entry| entry.controller != id);
    }
}

/// Back-office of a single window.
pub struct Window {
    config: RuntimeConfig,
    translator: Arc<dyn Translator>,
    root: Panel,
    book: Mutex<Book>,
}

impl Window {
    /// Window with default configuration.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_config(RuntimeConfig::default())
    }

    /// Window using the built-in catalog in the configured default locale.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Arc<Self> {
        let translator = Arc::new(Catalog::with_builtin(&config.default_locale));
        Self::with_translator(config, translator)
    }

    /// Window with a custom translator.
    #[must_use]
    pub fn with_translator(config: RuntimeConfig, translator: Arc<dyn Translator>) -> Arc<Self> {
        Arc::new(Self {
            config,
            translator,
            root: Panel::new(),
            book: Mutex::new(Book::default()),
        })
    }

    /// Parent control for top-level controllers of this window.
    #[must_use]
    pub fn root_control(self: &Arc<Self>) -> WindowControl {
        let back_office: Arc<dyn WindowBackOffice> = Arc::clone(self) as Arc<dyn WindowBackOffice>;
        WindowControl::root(back_office)
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Root panel of the window.
    #[must_use]
    pub fn panel(&self) -> Panel {
        self.root.clone()
    }

    /// Show `controller`'s output as the window content.
    pub fn set_content(&self, controller: &ControllerRef) {
        self.root.set_content(Arc::new(controller.panel()));
    }

    /// Render the window.
    #[must_use]
    pub fn render(&self) -> String {
        self.root.render_to_string()
    }

    /// Live controllers created in this window, in creation order.
    #[must_use]
    pub fn created_controllers(&self) -> Vec<CreatedController> {
        self.book().created.clone()
    }

    /// Number of completed component dispatches.
    #[must_use]
    pub fn dispatch_count(&self) -> u64 {
        self.book().dispatches
    }

    /// Back-navigation entries, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.book().back.iter().cloned().collect()
    }

    /// Whether [`Window::back`] has something to replay.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.book().back.is_empty()
    }

    /// Whether [`Window::forward`] has something to replay.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        !self.book().forward.is_empty()
    }

    /// Live handle of a registered controller.
    #[must_use]
    pub fn controller(&self, id: ControllerId) -> Option<ControllerRef> {
        self.book()
            .controllers
            .get(&id)
            .and_then(ControllerRef::upgrade)
    }

    /// Whether the window has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.book().disposed
    }

    /// Route a user action on `source` to `controller`.
    pub fn dispatch(
        &self,
        request: &UserRequest,
        controller: ControllerId,
        source: ComponentId,
        event: &Event,
    ) -> Result<(), WindowError> {
        let target = self.live_target(controller)?;
        target.dispatch(request, source, event);
        Ok(())
    }

    /// Browser back: replay the previous state of the newest transition.
    pub fn back(&self, request: &UserRequest) -> Result<HistoryEntry, WindowError> {
        let entry = {
            let mut book = self.book();
            if book.disposed {
                return Err(WindowError::Disposed);
            }
            book.back.pop_back().ok_or(WindowError::NoHistory)?
        };
        self.replay(request, &entry, &entry.transition.previous)?;
        self.book().forward.push(entry.clone());
        Ok(entry)
    }

    /// Browser forward: replay the state an earlier back step left.
    pub fn forward(&self, request: &UserRequest) -> Result<HistoryEntry, WindowError> {
        let entry = {
            let mut book = self.book();
            if book.disposed {
                return Err(WindowError::Disposed);
            }
            book.forward.pop().ok_or(WindowError::NoHistory)?
        };
        self.replay(request, &entry, &entry.transition.current)?;
        self.book().back.push_back(entry.clone());
        Ok(entry)
    }

    /// Dispose every controller of the window, newest first. Idempotent.
    pub fn dispose(&self) {
        let targets: Vec<ControllerRef> = {
            let mut book = self.book();
            if book.disposed {
                return;
            }
            book.disposed = true;
            book.back.clear();
            book.forward.clear();
            let Book {
                created,
                controllers,
                ..
            } = &*book;
            created
                .iter()
                .rev()
                .filter_map(|c| controllers.get(&c.id).and_then(ControllerRef::upgrade))
                .collect()
        };
        tracing::debug!(controllers = targets.len(), "window disposing");
        for target in &targets {
            target.dispose();
        }
    }

    fn replay(
        &self,
        request: &UserRequest,
        entry: &HistoryEntry,
        state: &ControllerState,
    ) -> Result<(), WindowError> {
        let target = self.live_target(entry.controller)?;
        if !target.replay_state(request, state) {
            return Err(WindowError::ControllerDisposed(entry.controller));
        }
        tracing::debug!(controller = entry.controller.get(), state = %state, "history replayed");
        Ok(())
    }

    fn live_target(&self, id: ControllerId) -> Result<ControllerRef, WindowError> {
        let book = self.book();
        if book.disposed {
            return Err(WindowError::Disposed);
        }
        book.controllers
            .get(&id)
            .and_then(ControllerRef::upgrade)
            .ok_or(WindowError::UnknownController(id))
    }

    fn book(&self) -> MutexGuard<'_, Book> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WindowBackOffice for Window {
    fn controller_created(&self, created: &CreatedController) {
        self.book().created.push(created.clone());
    }

    fn controller_attached(&self, controller: &ControllerRef) {
        let mut book = self.book();
        let dropped: Vec<ControllerId> = book
            .controllers
            .iter()
            .filter(|(_, handle)| handle.strong_count() == 0)
            .map(|(id, _)| *id)
            .collect();
        for id in &dropped {
            book.forget(*id);
        }
        book.controllers
            .insert(controller.id(), controller.downgrade());
    }

    fn controller_disposed(&self, controller: ControllerId) {
        self.book().forget(controller);
    }

    fn dispatch_completed(&self, controller: ControllerId, transition: Option<StateTransition>) {
        let mut book = self.book();
        book.dispatches += 1;
        let Some(transition) = transition else {
            return;
        };
        if self.config.history_limit == 0 {
            return;
        }
        book.forward.clear();
        book.back.push_back(HistoryEntry {
            controller,
            transition,
        });
        while book.back.len() > self.config.history_limit {
            book.back.pop_front();
        }
    }

    fn translator(&self) -> Arc<dyn Translator> {
        Arc::clone(&self.translator)
    }

    fn activity_logging(&self) -> bool {
        self.config.activity_log
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.book();
        f.debug_struct("Window")
            .field("created", &book.created.len())
            .field("dispatches", &book.dispatches)
            .field("history", &book.back.len())
            .field("disposed", &book.disposed)
            .finish()
    }
}
