#![forbid(unsafe_code)]

//! Identifiers, user requests and the events routed through controllers.
//!
//! Identifiers are allocated from process-wide counters and never reused, so
//! they remain valid keys for bookkeeping after the owning controller has been
//! disposed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A BCP 47-ish locale tag such as `"en"` or `"de-CH"`.
pub type Locale = String;

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a controller within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ControllerId(u64);

impl ControllerId {
    /// Allocate a fresh, never reused identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value (tests, deserialized business paths).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a renderable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a fresh, never reused identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named UI event, optionally carrying a string payload.
///
/// Events are compared by command and payload. Controllers usually match on
/// [`Event::command`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    command: String,
    payload: Option<String>,
}

impl Event {
    /// Create an event with the given command and no payload.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            payload: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// The event command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The event payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Whether this event carries the given command.
    #[must_use]
    pub fn is(&self, command: &str) -> bool {
        self.command == command
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({payload})", self.command),
            None => f.write_str(&self.command),
        }
    }
}

/// One incoming user interaction as seen by the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRequest {
    id: u64,
    uri: String,
    identity: Option<String>,
    locale: Option<Locale>,
}

impl UserRequest {
    /// Create a request for the given URI with a fresh request id.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            uri: uri.into(),
            identity: None,
            locale: None,
        }
    }

    /// Set the authenticated identity making the request.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Set the locale negotiated for this request.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Request id, unique within the process.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Requested URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Authenticated identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Negotiated locale, if any.
    #[must_use]
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = ControllerId::next();
        let b = ControllerId::next();
        assert!(b > a);
        let c = ComponentId::next();
        let d = ComponentId::next();
        assert_ne!(c, d);
    }

    #[test]
    fn event_display_includes_payload() {
        assert_eq!(Event::new("select").to_string(), "select");
        assert_eq!(
            Event::new("select").with_payload("row-3").to_string(),
            "select(row-3)"
        );
    }

    #[test]
    fn event_matches_command() {
        let event = Event::new("done").with_payload("ok");
        assert!(event.is("done"));
        assert!(!event.is("cancel"));
        assert_eq!(event.payload(), Some("ok"));
    }

    #[test]
    fn request_builder_sets_fields() {
        let req = UserRequest::new("/course/42")
            .with_identity("author")
            .with_locale("de-CH");
        assert_eq!(req.uri(), "/course/42");
        assert_eq!(req.identity(), Some("author"));
        assert_eq!(req.locale().map(String::as_str), Some("de-CH"));
        assert_ne!(req.id(), UserRequest::new("/").id());
    }
}
