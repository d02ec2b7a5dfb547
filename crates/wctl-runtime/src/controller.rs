#![forbid(unsafe_code)]

//! Controllers: dispatch entry points and the dispose lifecycle.
//!
//! A concrete controller is a plain struct that embeds a [`ControllerCore`] by
//! value and implements [`Controller`]. Once built it is wrapped in a
//! [`ControllerRef`], the thread-safe handle the window dispatches through.
//!
//! # Lifecycle
//!
//! ```text
//!   DeferredCore::new ──bind──▶ ControllerCore ──ControllerRef::new──▶ LIVE
//!                                                                      │
//!              dispatch / dispatch_controller_event / replay_state ◀───┤
//!                                                                      │ dispose (once)
//!                                                                      ▼
//!                                                                  DISPOSED
//!                                         (every dispatch renders the fallback)
//! ```
//!
//! # Design Invariants
//!
//! 1. Teardown hooks run at most once, no matter how many threads call
//!    [`ControllerRef::dispose`].
//! 2. After `dispose` returns, no handler of the controller is invoked again.
//! 3. Teardown never panics: hook panics are caught and logged.
//! 4. Handler panics during live dispatch are not caught here.
//! 5. A controller is never re-entered on the thread already dispatching into
//!    it; doing so panics instead of deadlocking.
//! 6. Events fired during a dispatch are delivered after the controller lock
//!    is released, so listeners may read the source back.
//! 7. The dispatch phase is restored even when a handler panics.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Duplicate listener | `add_listener` twice | Panic |
//! | Second disposed-message controller | Programmer error | Panic, first kept |
//! | Second initial component | Programmer error | Panic, first kept |
//! | Hook panics in teardown | Controller bug | `error!` logged per hook, remaining hooks still run |
//! | Dispose from inside own dispatch | Handler disposing its own controller | Teardown runs when the dispatch returns |
//! | Handler panics | Controller bug | Panic propagates, queued events are dropped, phase restored |
//! | Event fired from a teardown hook | Listeners are already being detached | Discarded |

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::thread::{self, ThreadId};

use wctl_core::{
    Component, ComponentId, ControllerId, ControllerState, DispatchPhase, Event, Locale, Message,
    Panel, StateTracker, UserRequest,
};

use crate::activity::ActivityContext;
use crate::dispose::{DisposeGuard, Lifecycle, panic_message, register_live, release_live};
use crate::listeners::ListenerList;
use crate::translator::{DISPOSED_MESSAGE_KEY, Translator};
use crate::window::{BusinessPath, WindowBackOffice, WindowControl};

// ─────────────────────────────────────────────────────────────────────────────
// Controller trait
// ─────────────────────────────────────────────────────────────────────────────

/// Behavior of a concrete controller.
///
/// Only [`Controller::event`] and [`Controller::on_dispose`] are required.
pub trait Controller: Send + 'static {
    /// Embedded bookkeeping.
    fn core(&self) -> &ControllerCore;

    /// Embedded bookkeeping, mutable.
    fn core_mut(&mut self) -> &mut ControllerCore;

    /// Handle an event raised by one of this controller's components.
    fn event(&mut self, ctx: &DispatchContext<'_>, source: ComponentId, event: &Event);

    /// Handle an event fired by a controller this one listens to.
    fn controller_event(&mut self, ctx: &DispatchContext<'_>, source: ControllerId, event: &Event) {
        let _ = (ctx, source, event);
    }

    /// Restore the view for a state replayed from browser history.
    fn adjust_state(&mut self, ctx: &DispatchContext<'_>, state: &ControllerState) {
        let _ = (ctx, state);
    }

    /// First teardown hook.
    fn pre_dispose(&mut self, activity: &ActivityContext) {
        let _ = activity;
    }

    /// Release resources held by the controller.
    fn on_dispose(&mut self, activity: &ActivityContext);
}

/// Everything a handler gets to see about the call it is serving.
pub struct DispatchContext<'a> {
    request: &'a UserRequest,
    activity: &'a ActivityContext,
}

impl<'a> DispatchContext<'a> {
    /// The user request being handled.
    #[must_use]
    pub fn request(&self) -> &'a UserRequest {
        self.request
    }

    /// Activity context of the controller.
    #[must_use]
    pub fn activity(&self) -> &'a ActivityContext {
        self.activity
    }

    /// Locale the controller captured, if any.
    #[must_use]
    pub fn locale(&self) -> Option<&'a str> {
        self.activity.locale()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared state (reachable without locking the controller)
// ─────────────────────────────────────────────────────────────────────────────

struct Shared {
    id: ControllerId,
    kind: &'static str,
    business_path: BusinessPath,
    guard: DisposeGuard,
    panel: Panel,
    initial_component: OnceLock<Arc<dyn Component>>,
    locale: OnceLock<Locale>,
    disposed_message: OnceLock<ControllerRef>,
    translator: Arc<dyn Translator>,
    activity_logging: bool,
    handle: OnceLock<Weak<Node>>,
    dispatching: Mutex<Option<ThreadId>>,
    deferred_teardown: AtomicBool,
}

impl Shared {
    fn capture_locale(&self, request: &UserRequest) {
        if let Some(locale) = request.locale() {
            self.locale.get_or_init(|| locale.clone());
        }
    }

    fn activity(&self) -> ActivityContext {
        ActivityContext::new(self.id, self.kind, self.business_path.clone())
            .with_locale(self.locale.get().cloned())
            .with_logging(self.activity_logging)
    }

    fn dispatching_here(&self) -> bool {
        let current = thread::current().id();
        *self.dispatching.lock().unwrap_or_else(PoisonError::into_inner) == Some(current)
    }

    fn show_disposed_message(&self) {
        if let Some(custom) = self.disposed_message.get() {
            self.panel.set_content(Arc::new(custom.panel()));
            return;
        }
        let locale = self.locale.get().map(String::as_str);
        let text = self.translator.translate(locale, DISPOSED_MESSAGE_KEY);
        self.panel
            .set_content(Arc::new(Message::new(DISPOSED_MESSAGE_KEY, text)));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ControllerCore
// ─────────────────────────────────────────────────────────────────────────────

/// Bookkeeping embedded by value in every controller: identity, window
/// control, listeners, state record and the wrapper panel.
pub struct ControllerCore {
    shared: Arc<Shared>,
    window_control: WindowControl,
    listeners: ListenerList,
    state: StateTracker,
    children: Vec<ControllerRef>,
    pending_listen: Vec<ControllerRef>,
    outbox: Vec<Outgoing>,
}

/// An event fired during a dispatch, waiting for the source lock to drop.
struct Outgoing {
    request: UserRequest,
    source: ControllerId,
    event: Event,
    targets: Vec<ControllerRef>,
}

fn deliver(outgoing: Vec<Outgoing>) {
    for Outgoing {
        request,
        source,
        event,
        targets,
    } in outgoing
    {
        for target in targets {
            // An earlier listener may have disposed this one.
            if target.is_disposed() {
                continue;
            }
            target.dispatch_controller_event(&request, source, &event);
        }
    }
}

impl ControllerCore {
    /// Create the core of a controller placed below `parent`.
    ///
    /// Registers the controller with the window back-office and counts it as
    /// live.
    #[must_use]
    pub fn new(parent: &WindowControl, kind: &'static str) -> Self {
        DeferredCore::new(kind).bind(parent)
    }

    /// Controller id.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.shared.id
    }

    /// Controller kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.shared.kind
    }

    /// Window control of this controller; children are created below it.
    #[must_use]
    pub fn window_control(&self) -> &WindowControl {
        &self.window_control
    }

    /// Business path of this controller.
    #[must_use]
    pub fn business_path(&self) -> &BusinessPath {
        &self.shared.business_path
    }

    /// Wrapper panel holding the controller's output.
    #[must_use]
    pub fn panel(&self) -> &Panel {
        &self.shared.panel
    }

    /// Locale captured from the first request that carried one.
    #[must_use]
    pub fn locale(&self) -> Option<&Locale> {
        self.shared.locale.get()
    }

    /// Whether the controller has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.guard.is_disposed()
    }

    /// Set the component this controller renders.
    ///
    /// # Panics
    ///
    /// If an initial component was already set.
    pub fn set_initial_component(&mut self, component: Arc<dyn Component>) {
        if self.shared.initial_component.set(Arc::clone(&component)).is_err() {
            panic!(
                "controller {} ({}) already has an initial component",
                self.shared.id, self.shared.kind
            );
        }
        self.shared.panel.set_content(component);
    }

    /// The component set through [`ControllerCore::set_initial_component`].
    #[must_use]
    pub fn initial_component(&self) -> Option<&Arc<dyn Component>> {
        self.shared.initial_component.get()
    }

    /// Use `controller`'s output instead of the generic notice after disposal.
    ///
    /// # Panics
    ///
    /// If a disposed-message controller was already registered; the first
    /// registration stays in effect.
    pub fn set_disposed_message_controller(&mut self, controller: ControllerRef) {
        if let Err(rejected) = self.shared.disposed_message.set(controller) {
            panic!(
                "controller {} ({}) already has a disposed-message controller; rejected {}",
                self.shared.id,
                self.shared.kind,
                rejected.id()
            );
        }
    }

    /// Registered disposed-message controller.
    #[must_use]
    pub fn disposed_message_controller(&self) -> Option<&ControllerRef> {
        self.shared.disposed_message.get()
    }

    /// State record.
    #[must_use]
    pub fn state(&self) -> &StateTracker {
        &self.state
    }

    /// Move to a new bookmarkable state. Returns `true` if it changed.
    pub fn set_state(&mut self, state: impl Into<ControllerState>) -> bool {
        let state = state.into();
        let changed = self.state.set(state);
        if changed {
            tracing::trace!(
                controller = self.shared.id.get(),
                state = %self.state.current(),
                transition = self.state.has_new_transition(),
                "controller state set"
            );
        }
        changed
    }

    /// Register `listener` for events fired by this controller.
    ///
    /// # Panics
    ///
    /// If `listener` is already registered.
    pub fn add_listener(&mut self, listener: &ControllerRef) {
        self.listeners.add(listener);
    }

    /// Unregister `listener`. Returns `true` if it was registered.
    pub fn remove_listener(&mut self, listener: &ControllerRef) -> bool {
        self.listeners.remove(listener)
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Fire `event` to all live listeners in registration order.
    ///
    /// Delivery happens as soon as the current dispatch releases this
    /// controller, before the dispatch call returns. Returns the number of
    /// listeners the event was queued for.
    pub fn fire_event(&mut self, request: &UserRequest, event: &Event) -> usize {
        let targets = self.listeners.live_targets();
        let queued = targets.len();
        if queued > 0 {
            self.outbox.push(Outgoing {
                request: request.clone(),
                source: self.shared.id,
                event: event.clone(),
                targets,
            });
        }
        queued
    }

    /// Listen to `child` and take ownership of its lifecycle: the child is
    /// disposed together with this controller.
    ///
    /// Before this controller is wrapped in a [`ControllerRef`] the listener
    /// registration is queued and completed by [`ControllerRef::new`].
    ///
    /// # Panics
    ///
    /// If `child` is already listened to.
    pub fn listen_to(&mut self, child: &ControllerRef) {
        assert!(
            !self.children.iter().any(|known| known.ptr_eq(child)),
            "controller {} ({}) already listens to controller {}",
            self.shared.id,
            self.shared.kind,
            child.id()
        );
        self.children.push(child.clone());
        match self.shared.handle.get().and_then(ControllerRef::upgrade) {
            Some(me) => child.add_listener(&me),
            None => self.pending_listen.push(child.clone()),
        }
    }

    /// Controllers whose lifecycle this controller owns.
    #[must_use]
    pub fn children(&self) -> &[ControllerRef] {
        &self.children
    }
}

impl fmt::Debug for ControllerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCore")
            .field("id", &self.shared.id)
            .field("kind", &self.shared.kind)
            .field("path", &self.shared.business_path)
            .field("disposed", &self.is_disposed())
            .field("state", self.state.current())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DeferredCore
// ─────────────────────────────────────────────────────────────────────────────

/// A controller identity whose window control is supplied after construction.
///
/// Framework code that instantiates controllers generically creates a
/// `DeferredCore` first and binds it once the hosting window is known.
/// [`DeferredCore::bind`] consumes the value, so a core is bound exactly once.
#[derive(Debug)]
pub struct DeferredCore {
    id: ControllerId,
    kind: &'static str,
}

impl DeferredCore {
    /// Reserve an id for a controller of `kind`.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            id: ControllerId::next(),
            kind,
        }
    }

    /// Reserved id.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Controller kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Attach to the window below `parent` and produce the live core.
    #[must_use]
    pub fn bind(self, parent: &WindowControl) -> ControllerCore {
        let window_control = WindowControl::for_controller(parent, self.id, self.kind);
        let back_office = window_control.back_office();
        let shared = Arc::new(Shared {
            id: self.id,
            kind: self.kind,
            business_path: window_control.business_path().clone(),
            guard: DisposeGuard::new(),
            panel: Panel::new(),
            initial_component: OnceLock::new(),
            locale: OnceLock::new(),
            disposed_message: OnceLock::new(),
            translator: back_office.translator(),
            activity_logging: back_office.activity_logging(),
            handle: OnceLock::new(),
            dispatching: Mutex::new(None),
            deferred_teardown: AtomicBool::new(false),
        });
        let live = register_live();
        tracing::trace!(controller = self.id.get(), kind = self.kind, live, "controller live");
        ControllerCore {
            shared,
            window_control,
            listeners: ListenerList::new(),
            state: StateTracker::new(),
            children: Vec::new(),
            pending_listen: Vec::new(),
            outbox: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ControllerRef
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct Node {
    shared: Arc<Shared>,
    cell: Mutex<Box<dyn Controller>>,
}

/// Shared, thread-safe handle to a controller.
#[derive(Clone)]
pub struct ControllerRef {
    node: Arc<Node>,
}

/// Exclusive access to the controller body, marked with the owning thread.
struct Entered<'a> {
    guard: MutexGuard<'a, Box<dyn Controller>>,
    dispatching: &'a Mutex<Option<ThreadId>>,
    restore_phase: Option<DispatchPhase>,
}

impl Entered<'_> {
    fn controller(&mut self) -> &mut dyn Controller {
        &mut **self.guard
    }

    fn take_outgoing(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.guard.core_mut().outbox)
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        let core = self.guard.core_mut();
        if let Some(phase) = self.restore_phase.take() {
            core.state.set_phase(phase);
        }
        if thread::panicking() {
            core.outbox.clear();
        }
        *self
            .dispatching
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl ControllerRef {
    /// Wrap a fully constructed controller.
    ///
    /// Completes queued [`ControllerCore::listen_to`] registrations and
    /// announces the handle to the window back-office.
    pub fn new<C: Controller>(controller: C) -> Self {
        let shared = Arc::clone(&controller.core().shared);
        let back_office = Arc::clone(controller.core().window_control.back_office());
        let handle = Self {
            node: Arc::new(Node {
                shared,
                cell: Mutex::new(Box::new(controller)),
            }),
        };
        let _ = handle.node.shared.handle.set(Arc::downgrade(&handle.node));

        let pending = handle.with(|controller| std::mem::take(&mut controller.core_mut().pending_listen));
        for child in &pending {
            child.add_listener(&handle);
        }
        back_office.controller_attached(&handle);
        handle
    }

    pub(crate) fn downgrade(&self) -> Weak<Node> {
        Arc::downgrade(&self.node)
    }

    pub(crate) fn upgrade(weak: &Weak<Node>) -> Option<Self> {
        weak.upgrade().map(|node| Self { node })
    }

    pub(crate) fn is_node(&self, weak: &Weak<Node>) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.node), weak.as_ptr())
    }

    /// Controller id.
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.node.shared.id
    }

    /// Controller kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.node.shared.kind
    }

    /// Business path of the controller.
    #[must_use]
    pub fn business_path(&self) -> &BusinessPath {
        &self.node.shared.business_path
    }

    /// Handle to the wrapper panel.
    #[must_use]
    pub fn panel(&self) -> Panel {
        self.node.shared.panel.clone()
    }

    /// Captured locale.
    #[must_use]
    pub fn locale(&self) -> Option<Locale> {
        self.node.shared.locale.get().cloned()
    }

    /// Current lifecycle.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.node.shared.guard.lifecycle()
    }

    /// Whether the controller has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.node.shared.guard.is_disposed()
    }

    /// Whether both handles refer to the same controller.
    #[must_use]
    pub fn ptr_eq(&self, other: &ControllerRef) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Run `f` with exclusive access to the controller.
    ///
    /// # Panics
    ///
    /// If the current thread is already inside this controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn Controller) -> R) -> R {
        let (result, outgoing) = {
            let mut entered = self.enter();
            let result = f(entered.controller());
            (result, entered.take_outgoing())
        };
        deliver(outgoing);
        self.run_deferred_teardown();
        result
    }

    /// Current state of the controller.
    #[must_use]
    pub fn current_state(&self) -> ControllerState {
        self.with(|controller| controller.core().state().current().clone())
    }

    /// Register `listener` on this controller.
    ///
    /// # Panics
    ///
    /// If `listener` is already registered.
    pub fn add_listener(&self, listener: &ControllerRef) {
        self.with(|controller| controller.core_mut().add_listener(listener));
    }

    /// Dispatch an event raised by one of the controller's components.
    ///
    /// A disposed controller renders its disposed message instead. A live one
    /// runs [`Controller::event`] and then reports completion, together with
    /// any new state transition, to its window control.
    pub fn dispatch(&self, request: &UserRequest, source: ComponentId, event: &Event) {
        self.run_live(request, "dispatch", DispatchPhase::Dispatching, |controller, ctx| {
            controller.event(ctx, source, event);
            let core = controller.core_mut();
            let transition = core.state.take_transition();
            core.window_control.dispatch_completed(transition);
        });
    }

    /// Dispatch an event fired by a controller this one listens to.
    ///
    /// Unlike [`ControllerRef::dispatch`], completion is not reported to the
    /// window control.
    pub fn dispatch_controller_event(
        &self,
        request: &UserRequest,
        source: ControllerId,
        event: &Event,
    ) {
        self.run_live(
            request,
            "controller_event",
            DispatchPhase::Dispatching,
            |controller, ctx| controller.controller_event(ctx, source, event),
        );
    }

    /// Replay `state` from browser history through [`Controller::adjust_state`].
    ///
    /// State changes made while replaying are not recorded as transitions.
    /// Returns `false` if the controller is disposed.
    pub fn replay_state(&self, request: &UserRequest, state: &ControllerState) -> bool {
        self.run_live(request, "replay", DispatchPhase::Replaying, |controller, ctx| {
            controller.adjust_state(ctx, state);
        })
    }

    /// Tear the controller down. Safe to call any number of times, from any
    /// thread; only the first call does any work.
    pub fn dispose(&self) {
        let shared = &self.node.shared;
        if !shared.guard.begin_dispose() {
            return;
        }
        if shared.dispatching_here() {
            shared.deferred_teardown.store(true, Ordering::SeqCst);
            tracing::debug!(
                controller = shared.id.get(),
                kind = shared.kind,
                "teardown deferred until dispatch returns"
            );
            return;
        }
        self.teardown();
    }

    fn run_live<F>(
        &self,
        request: &UserRequest,
        operation: &'static str,
        phase: DispatchPhase,
        body: F,
    ) -> bool
    where
        F: FnOnce(&mut dyn Controller, &DispatchContext<'_>),
    {
        let shared = &self.node.shared;
        shared.capture_locale(request);
        if shared.guard.is_disposed() {
            self.suppressed(operation, phase);
            return false;
        }

        let activity = shared.activity().with_request(request);
        let span = activity.span(operation);
        let _span = span.enter();
        let (ran, outgoing) = {
            let mut entered = self.enter();
            // A dispose may have won while we waited for the lock.
            if shared.guard.is_disposed() {
                (false, Vec::new())
            } else {
                let ctx = DispatchContext {
                    request,
                    activity: &activity,
                };
                let previous = entered.controller().core_mut().state.set_phase(phase);
                entered.restore_phase = Some(previous);
                body(entered.controller(), &ctx);
                (true, entered.take_outgoing())
            }
        };
        if !ran {
            self.suppressed(operation, phase);
        }
        deliver(outgoing);
        self.run_deferred_teardown();
        ran
    }

    fn suppressed(&self, operation: &'static str, phase: DispatchPhase) {
        let shared = &self.node.shared;
        tracing::debug!(
            controller = shared.id.get(),
            kind = shared.kind,
            op = operation,
            "controller disposed, handler skipped"
        );
        if phase == DispatchPhase::Dispatching {
            shared.show_disposed_message();
        }
    }

    fn enter(&self) -> Entered<'_> {
        let shared = &self.node.shared;
        assert!(
            !shared.dispatching_here(),
            "controller {} ({}) re-entered while it is dispatching on this thread",
            shared.id,
            shared.kind
        );
        let guard = self
            .node
            .cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *shared
            .dispatching
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(thread::current().id());
        Entered {
            guard,
            dispatching: &shared.dispatching,
            restore_phase: None,
        }
    }

    fn run_deferred_teardown(&self) {
        let shared = &self.node.shared;
        if shared.dispatching_here() {
            return;
        }
        if shared.deferred_teardown.swap(false, Ordering::SeqCst) {
            self.teardown();
        }
    }

    fn teardown(&self) {
        let shared = &self.node.shared;
        let activity = shared.activity();
        let span = activity.span("dispose");
        let _span = span.enter();

        let (children, back_office) = {
            let mut entered = self.enter();
            let controller = entered.controller();
            isolated_hook(shared, "pre_dispose", || controller.pre_dispose(&activity));
            isolated_hook(shared, "on_dispose", || controller.on_dispose(&activity));
            let core = controller.core_mut();
            core.listeners.clear();
            core.pending_listen.clear();
            core.outbox.clear();
            core.state.set_phase(DispatchPhase::Idle);
            let back_office: Arc<dyn WindowBackOffice> = Arc::clone(core.window_control.back_office());
            (std::mem::take(&mut core.children), back_office)
        };

        // Children are disposed after our lock is released so a child that is
        // busy firing into us on another thread can finish first.
        for child in children.iter().rev() {
            child.dispose();
        }

        shared.show_disposed_message();
        let live = release_live();
        back_office.controller_disposed(shared.id);
        tracing::debug!(
            controller = shared.id.get(),
            kind = shared.kind,
            live,
            "controller disposed"
        );
    }
}

/// Run one teardown hook, logging instead of propagating its panic.
fn isolated_hook(shared: &Shared, hook: &'static str, f: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        tracing::error!(
            controller = shared.id.get(),
            kind = shared.kind,
            hook,
            error = %panic_message(payload.as_ref()),
            "controller teardown failed"
        );
    }
}

impl fmt::Debug for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRef")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}
