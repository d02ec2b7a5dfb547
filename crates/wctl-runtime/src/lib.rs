#![forbid(unsafe_code)]

//! wctl runtime
//!
//! This crate provides the lifecycle machinery every controller depends on:
//! dispatching user actions, propagating events to listening controllers,
//! recording bookmarkable states and tearing controllers down exactly once.
//!
//! # Key Components
//!
//! - [`Controller`] - Trait implemented by every concrete controller
//! - [`ControllerCore`] - Shared bookkeeping embedded by value in each controller
//! - [`ControllerRef`] - Thread-safe handle the window dispatches through
//! - [`DeferredCore`] - Late-bound construction for framework-instantiated controllers
//! - [`WindowControl`] - Per-controller facade over the window back-office
//! - [`Window`] - Stock back-office: creation log, history, routing, teardown
//! - [`Catalog`] - Translator used for the "view no longer active" fallback
//! - [`RuntimeConfig`] - Builder/env configuration for windows
//!
//! # How it fits in the system
//! `wctl-core` supplies the plain data (ids, requests, events, components,
//! state records). This crate moves controllers through their lifecycle and
//! talks to the window through [`WindowBackOffice`].

pub mod activity;
pub mod back_office;
pub mod config;
pub mod controller;
pub mod dispose;
pub mod listeners;
pub mod locale;
pub mod translator;
pub mod window;

pub use activity::ActivityContext;
pub use back_office::{HistoryEntry, Window, WindowError};
pub use config::{ConfigError, RuntimeConfig};
pub use controller::{Controller, ControllerCore, ControllerRef, DeferredCore, DispatchContext};
pub use dispose::{DisposeGuard, Lifecycle, live_controller_count};
pub use listeners::ListenerList;
pub use locale::{DEFAULT_LOCALE, Locale, detect_system_locale, fallback_chain, normalize_locale};
pub use translator::{Catalog, CatalogError, DISPOSED_MESSAGE_KEY, Translator};
pub use window::{BusinessPath, CreatedController, WindowBackOffice, WindowControl};
