#![forbid(unsafe_code)]

//! wctl public facade crate.
//!
//! Re-exports the controller types from the internal crates and offers a
//! prelude for code that implements controllers.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use wctl_core::{
    Component, ComponentId, ControllerId, ControllerState, DispatchPhase, Event, Locale, Message,
    Panel, StateTracker, StateTransition, Text, UserRequest,
};

// --- Runtime re-exports ----------------------------------------------------

pub use wctl_runtime::{
    ActivityContext, BusinessPath, Catalog, CatalogError, ConfigError, Controller,
    ControllerCore, ControllerRef, CreatedController, DISPOSED_MESSAGE_KEY, DeferredCore,
    DispatchContext, HistoryEntry, Lifecycle, RuntimeConfig, Translator, Window,
    WindowBackOffice, WindowControl, WindowError, live_controller_count,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for wctl applications.
#[derive(Debug)]
pub enum Error {
    /// Window routing or navigation failed.
    Window(WindowError),
    /// A translation bundle could not be loaded.
    Catalog(CatalogError),
    /// Configuration could not be read.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Window(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<WindowError> for Error {
    fn from(err: WindowError) -> Self {
        Self::Window(err)
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for wctl APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActivityContext, Component, ComponentId, Controller, ControllerCore, ControllerId,
        ControllerRef, ControllerState, DispatchContext, Error, Event, Panel, Result,
        RuntimeConfig, Text, UserRequest, Window, WindowControl,
    };
}
