//! Shared test controllers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use wctl_core::{ComponentId, ControllerId, ControllerState, Event, Text};
use wctl_runtime::{
    ActivityContext, Controller, ControllerCore, ControllerRef, DispatchContext, WindowControl,
};

pub type EventHandler = Box<dyn FnMut(&mut ControllerCore, &DispatchContext<'_>, &Event) + Send>;
pub type ChildHandler =
    Box<dyn FnMut(&mut ControllerCore, &DispatchContext<'_>, ControllerId, &Event) + Send>;

/// Counters observed by tests.
#[derive(Default)]
pub struct Stats {
    pub events: AtomicUsize,
    pub child_events: Mutex<Vec<(ControllerId, String)>>,
    pub replays: Mutex<Vec<ControllerState>>,
    pub pre_dispose: AtomicUsize,
    pub dispose: AtomicUsize,
}

impl Stats {
    pub fn events(&self) -> usize {
        self.events.load(Ordering::SeqCst)
    }

    pub fn pre_dispose(&self) -> usize {
        self.pre_dispose.load(Ordering::SeqCst)
    }

    pub fn dispose(&self) -> usize {
        self.dispose.load(Ordering::SeqCst)
    }

    pub fn child_events(&self) -> Vec<(ControllerId, String)> {
        self.child_events.lock().unwrap().clone()
    }
}

/// Configurable controller that records everything it sees.
pub struct Scripted {
    core: ControllerCore,
    stats: Arc<Stats>,
    on_event: Option<EventHandler>,
    on_child: Option<ChildHandler>,
    panic_on_pre_dispose: bool,
    panic_on_dispose: bool,
}

impl Scripted {
    pub fn new(parent: &WindowControl, stats: Arc<Stats>) -> Self {
        Self::from_core(ControllerCore::new(parent, "Scripted"), stats)
    }

    pub fn from_core(core: ControllerCore, stats: Arc<Stats>) -> Self {
        Self {
            core,
            stats,
            on_event: None,
            on_child: None,
            panic_on_pre_dispose: false,
            panic_on_dispose: false,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.core.set_initial_component(Arc::new(Text::new(text)));
        self
    }

    pub fn on_event(
        mut self,
        handler: impl FnMut(&mut ControllerCore, &DispatchContext<'_>, &Event) + Send + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(handler));
        self
    }

    pub fn on_child_event(
        mut self,
        handler: impl FnMut(&mut ControllerCore, &DispatchContext<'_>, ControllerId, &Event)
        + Send
        + 'static,
    ) -> Self {
        self.on_child = Some(Box::new(handler));
        self
    }

    pub fn panicking_pre_dispose(mut self) -> Self {
        self.panic_on_pre_dispose = true;
        self
    }

    pub fn panicking_dispose(mut self) -> Self {
        self.panic_on_dispose = true;
        self
    }

    pub fn spawn(self) -> ControllerRef {
        ControllerRef::new(self)
    }
}

impl Controller for Scripted {
    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn event(&mut self, ctx: &DispatchContext<'_>, _source: ComponentId, event: &Event) {
        self.stats.events.fetch_add(1, Ordering::SeqCst);
        if let Some(handler) = self.on_event.as_mut() {
            handler(&mut self.core, ctx, event);
        }
    }

    fn controller_event(&mut self, ctx: &DispatchContext<'_>, source: ControllerId, event: &Event) {
        self.stats
            .child_events
            .lock()
            .unwrap()
            .push((source, event.command().to_string()));
        if let Some(handler) = self.on_child.as_mut() {
            handler(&mut self.core, ctx, source, event);
        }
    }

    fn adjust_state(&mut self, _ctx: &DispatchContext<'_>, state: &ControllerState) {
        self.stats.replays.lock().unwrap().push(state.clone());
        self.core.set_state(state.clone());
    }

    fn pre_dispose(&mut self, _activity: &ActivityContext) {
        self.stats.pre_dispose.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_pre_dispose {
            panic!("pre boom");
        }
    }

    fn on_dispose(&mut self, _activity: &ActivityContext) {
        self.stats.dispose.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_dispose {
            panic!("boom");
        }
    }
}

/// Handler that moves to the state named by the event payload.
pub fn goto_payload(core: &mut ControllerCore, _ctx: &DispatchContext<'_>, event: &Event) {
    if let Some(state) = event.payload() {
        core.set_state(state);
    }
}

/// Handler that fires `done` to all listeners.
pub fn fire_done(core: &mut ControllerCore, ctx: &DispatchContext<'_>, _event: &Event) {
    core.fire_event(ctx.request(), &Event::new("done"));
}

pub fn click() -> Event {
    Event::new("click")
}

pub fn goto(state: &str) -> Event {
    Event::new("goto").with_payload(state)
}

pub fn any_component() -> ComponentId {
    ComponentId::from_raw(0)
}
