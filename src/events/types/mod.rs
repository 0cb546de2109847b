//! Built-in event types posted by the Ceroba core.

/// Bootstrap lifecycle events.
pub mod core_events;
