#![forbid(unsafe_code)]

//! Renderable components.
//!
//! A [`Component`] renders itself into a string buffer. Controllers expose
//! their output through a [`Panel`]: a shared, swappable content slot that a
//! parent can embed in its own layout while the owning controller remains free
//! to replace what the slot shows (for example with a "view no longer active"
//! [`Message`] after disposal).

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::event::ComponentId;

/// Something that can be rendered into the window output.
///
/// Components are shared between the controller that owns them and the
/// panels that display them, hence `Send + Sync`.
pub trait Component: Send + Sync {
    /// Stable identity used to route events back to the owning controller.
    fn id(&self) -> ComponentId;

    /// Append the rendered form of this component to `out`.
    fn render(&self, out: &mut String);

    /// Render into a fresh string.
    fn render_to_string(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

/// Static text.
#[derive(Debug, Clone)]
pub struct Text {
    id: ComponentId,
    text: String,
}

impl Text {
    /// Create a text component.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ComponentId::next(),
            text: text.into(),
        }
    }

    /// The text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for Text {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.text);
    }
}

/// A localized message: the catalog key plus its already resolved text.
#[derive(Debug, Clone)]
pub struct Message {
    id: ComponentId,
    key: String,
    text: String,
}

impl Message {
    /// Create a message component from a key and its translation.
    #[must_use]
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: ComponentId::next(),
            key: key.into(),
            text: text.into(),
        }
    }

    /// Catalog key the text was resolved from.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resolved text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for Message {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.text);
    }
}

/// Shared content slot.
///
/// Cloning a panel yields another handle to the same slot; every handle sees
/// content swaps immediately. An empty panel renders nothing.
#[derive(Clone)]
pub struct Panel {
    id: ComponentId,
    content: Arc<RwLock<Option<Arc<dyn Component>>>>,
}

impl Panel {
    /// Create an empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ComponentId::next(),
            content: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the panel content, returning the previous content.
    pub fn set_content(&self, component: Arc<dyn Component>) -> Option<Arc<dyn Component>> {
        let mut guard = self.content.write().unwrap_or_else(PoisonError::into_inner);
        guard.replace(component)
    }

    /// Remove the panel content.
    pub fn clear(&self) -> Option<Arc<dyn Component>> {
        let mut guard = self.content.write().unwrap_or_else(PoisonError::into_inner);
        guard.take()
    }

    /// Current content, if any.
    #[must_use]
    pub fn content(&self) -> Option<Arc<dyn Component>> {
        let guard = self.content.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Whether the panel currently shows something.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content().is_some()
    }

    /// Whether two handles refer to the same slot.
    #[must_use]
    pub fn same_slot(&self, other: &Panel) -> bool {
        Arc::ptr_eq(&self.content, &other.content)
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Panel {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn render(&self, out: &mut String) {
        // Clone out of the lock so nested panels never hold two guards at once.
        if let Some(content) = self.content() {
            content.render(out);
        }
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("has_content", &self.has_content())
            .finish()
    }
}
