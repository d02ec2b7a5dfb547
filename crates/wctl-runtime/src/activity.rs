#![forbid(unsafe_code)]

//! Per-controller activity context.
//!
//! The context is built by the runtime for every dispatch and teardown and
//! handed to the controller explicitly. It carries who is acting, on which
//! controller and in which locale, and opens the `tracing` span the call runs
//! under. Nothing is installed in thread-local state, so there is nothing to
//! restore afterwards.

use tracing::Span;
use wctl_core::{ControllerId, Locale, UserRequest};

use crate::window::BusinessPath;

/// Who is doing what, where.
#[derive(Debug, Clone)]
pub struct ActivityContext {
    controller: ControllerId,
    kind: &'static str,
    business_path: BusinessPath,
    request_id: Option<u64>,
    identity: Option<String>,
    locale: Option<Locale>,
    enabled: bool,
}

impl ActivityContext {
    /// Context for a controller outside any request.
    #[must_use]
    pub fn new(controller: ControllerId, kind: &'static str, business_path: BusinessPath) -> Self {
        Self {
            controller,
            kind,
            business_path,
            request_id: None,
            identity: None,
            locale: None,
            enabled: true,
        }
    }

    /// Attach the request being handled.
    #[must_use]
    pub fn with_request(mut self, request: &UserRequest) -> Self {
        self.request_id = Some(request.id());
        self.identity = request.identity().map(str::to_string);
        self
    }

    /// Attach the controller's captured locale.
    #[must_use]
    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    /// Enable or disable activity events.
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Controller the context belongs to.
    #[must_use]
    pub fn controller(&self) -> ControllerId {
        self.controller
    }

    /// Controller kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Business path of the controller.
    #[must_use]
    pub fn business_path(&self) -> &BusinessPath {
        &self.business_path
    }

    /// Acting identity, if the request carried one.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Request id, if inside a request.
    #[must_use]
    pub fn request_id(&self) -> Option<u64> {
        self.request_id
    }

    /// Locale captured by the controller.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Span scoped to this controller and operation.
    #[must_use]
    pub fn span(&self, operation: &'static str) -> Span {
        tracing::info_span!(
            "controller",
            op = operation,
            id = self.controller.get(),
            kind = self.kind,
            path = %self.business_path,
        )
    }

    /// Record a user-visible action on target `wctl::activity`.
    pub fn log_action(&self, action: &str) {
        if !self.enabled {
            return;
        }
        tracing::info!(
            target: "wctl::activity",
            controller = self.controller.get(),
            kind = self.kind,
            path = %self.business_path,
            identity = self.identity.as_deref().unwrap_or("anonymous"),
            request = ?self.request_id,
            action,
            "activity"
        );
    }
}
