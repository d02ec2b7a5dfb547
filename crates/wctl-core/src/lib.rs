#![forbid(unsafe_code)]

//! Core: identifiers, requests, events, renderable components and controller
//! state records.
//!
//! Everything in this crate is plain data. The lifecycle machinery that moves
//! controllers between states lives in `wctl-runtime`.

pub mod component;
pub mod event;
pub mod state;

pub use component::{Component, Message, Panel, Text};
pub use event::{ComponentId, ControllerId, Event, Locale, UserRequest};
pub use state::{ControllerState, DispatchPhase, StateTracker, StateTransition};
