#![forbid(unsafe_code)]

//! Logging integration tests.
//!
//! These tests verify the events and spans emitted around dispatch and
//! teardown:
//!   cargo test -p wctl-runtime --test tracing_tests

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::{Scripted, Stats, any_component, click};
use wctl_core::UserRequest;
use wctl_runtime::{RuntimeConfig, Window};

use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event with its metadata.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

/// A tracing Layer that captures events and the names of entered spans.
#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn span_ops(&self) -> Vec<String> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, fields)| fields.get("op").cloned())
            .collect()
    }
}

/// Visitor that extracts event and span fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push((
            attrs.metadata().name().to_string(),
            visitor.0.into_iter().collect(),
        ));
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_capture<R>(f: impl FnOnce() -> R) -> (R, EventCapture) {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture)
}

fn window(activity_log: bool) -> Arc<Window> {
    Window::with_config(
        RuntimeConfig::new()
            .with_default_locale("en")
            .with_activity_log(activity_log),
    )
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn teardown_panic_is_logged_as_error() {
    let window = window(true);
    let scripted = Scripted::new(&window.root_control(), Arc::new(Stats::default()))
        .panicking_dispose()
        .spawn();

    let ((), capture) = with_capture(|| scripted.dispose());

    let events = capture.events();
    let failure = events
        .iter()
        .find(|e| e.message() == "controller teardown failed")
        .expect("teardown failure event");
    assert_eq!(failure.level, tracing::Level::ERROR);
    assert_eq!(failure.fields.get("error").map(String::as_str), Some("boom"));
    assert_eq!(failure.fields.get("hook").map(String::as_str), Some("on_dispose"));
    assert_eq!(
        failure.fields.get("controller"),
        Some(&scripted.id().get().to_string())
    );
    assert!(events.iter().any(|e| e.message() == "controller disposed"));
}

#[test]
fn clean_teardown_logs_no_error() {
    let window = window(true);
    let scripted = Scripted::new(&window.root_control(), Arc::new(Stats::default())).spawn();

    let ((), capture) = with_capture(|| scripted.dispose());

    assert!(
        capture
            .events()
            .iter()
            .all(|e| e.level != tracing::Level::ERROR)
    );
    assert!(capture.span_ops().contains(&"dispose".to_string()));
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn dispatch_runs_inside_controller_span() {
    let window = window(true);
    let scripted = Scripted::new(&window.root_control(), Arc::new(Stats::default())).spawn();

    let ((), capture) = with_capture(|| {
        scripted.dispatch(&UserRequest::new("/run"), any_component(), &click());
    });

    assert_eq!(capture.span_ops(), vec!["dispatch".to_string()]);
}

#[test]
fn stale_dispatch_is_logged_without_span() {
    let window = window(true);
    let scripted = Scripted::new(&window.root_control(), Arc::new(Stats::default())).spawn();
    scripted.dispose();

    let ((), capture) = with_capture(|| {
        scripted.dispatch(&UserRequest::new("/run"), any_component(), &click());
    });

    assert!(capture.span_ops().is_empty());
    assert!(
        capture
            .events()
            .iter()
            .any(|e| e.message() == "controller disposed, handler skipped")
    );
}

// ============================================================================
// Activity log
// ============================================================================

fn launching_controller(window: &Arc<Window>) -> wctl_runtime::ControllerRef {
    Scripted::new(&window.root_control(), Arc::new(Stats::default()))
        .on_event(|_, ctx, event| ctx.activity().log_action(event.command()))
        .spawn()
}

#[test]
fn activity_is_logged_on_its_own_target() {
    let window = window(true);
    let scripted = launching_controller(&window);
    let request = UserRequest::new("/run").with_identity("student");

    let ((), capture) = with_capture(|| scripted.dispatch(&request, any_component(), &click()));

    let activity: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.target == "wctl::activity")
        .collect();
    assert_eq!(activity.len(), 1);
    let fields = &activity[0].fields;
    assert_eq!(fields.get("action").map(String::as_str), Some("click"));
    assert_eq!(fields.get("identity").map(String::as_str), Some("student"));
    assert_eq!(activity[0].level, tracing::Level::INFO);
}

#[test]
fn disabled_activity_log_stays_silent() {
    let window = window(false);
    let scripted = launching_controller(&window);

    let ((), capture) = with_capture(|| {
        scripted.dispatch(&UserRequest::new("/run"), any_component(), &click());
    });

    assert!(
        capture
            .events()
            .iter()
            .all(|e| e.target != "wctl::activity")
    );
}
