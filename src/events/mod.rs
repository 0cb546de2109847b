//! Ceroba event system.
//!
//! A typed, synchronous publish/subscribe dispatcher used to decouple
//! subsystems: a producer posts an event, every handler registered for that
//! exact event type reacts in priority order, and cancellable events can be
//! vetoed by any handler.

// ---------------------------------------------------------------------------
// Core infrastructure modules
// ---------------------------------------------------------------------------

/// Event and cancellable-event capabilities.
pub mod base_event;

/// Handler declaration surface: options, handler methods, listener trait.
pub mod base_event_listener;

/// Handler registry and dispatcher.
pub mod event_bus;

/// Registration and dispatch errors.
pub mod error;

// ---------------------------------------------------------------------------
// Event type definitions
// ---------------------------------------------------------------------------

/// Built-in event types.
pub mod types;

// ---------------------------------------------------------------------------
// Convenience re-exports
// ---------------------------------------------------------------------------

pub use base_event::{CancellableEvent, CancellableEventData, Event, EventData};
pub use base_event_listener::{
    EventListener, HandlerKind, HandlerMethod, HandlerResult, ParamType, SubscribeOptions,
};
pub use error::{ConfigurationError, DispatchError};
pub use event_bus::EventBus;

pub use types::core_events::{ConfigurationLoadingEvent, CoreAboutToInitEvent};
