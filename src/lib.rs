//! # Ceroba
//!
//! Core of the Ceroba voice assistant: a typed, in-process event bus and the
//! bootstrap sequence built on top of it.
//!
//! Subsystems talk to each other by posting events on a shared
//! [`EventBus`]. Handlers are registered per exact event type, run
//! synchronously in descending priority order, and may veto cancellable
//! events. [`CerobaCore`] drives startup and [`ConfigurationLoader`] loads
//! the JSON configuration when asked to.

pub mod config;
pub mod core;
pub mod events;
pub mod utilities;

pub use config::{CerobaConfig, ConfigError};
pub use crate::core::{CerobaCore, ConfigurationLoader, CoreError, InitOutcome};
pub use events::{
    CancellableEvent, ConfigurationError, DispatchError, Event, EventBus, EventListener,
    HandlerMethod, SubscribeOptions,
};

/// Library version.
pub const VERSION: &str = "1.0.0";
