//! Event system errors.

use thiserror::Error;

/// A declared handler method has an invalid signature or receiver.
///
/// Raised by [`EventBus::register_instance`](crate::events::EventBus::register_instance)
/// and [`EventBus::register_static`](crate::events::EventBus::register_static).
/// The offending method is not registered; methods registered earlier in
/// the same call stay registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The method does not declare exactly one parameter.
    #[error("handler method {listener}::{method} must have exactly one parameter, found {count}")]
    ParameterCount {
        listener: &'static str,
        method: String,
        count: usize,
    },

    /// The method's single parameter is not an event type.
    #[error("handler method {listener}::{method} parameter `{param}` is not an event type")]
    NotAnEvent {
        listener: &'static str,
        method: String,
        param: &'static str,
    },

    /// An instance method is bound to a receiver of another type.
    #[error("handler method {listener}::{method} expects a receiver of type `{receiver}`")]
    ReceiverMismatch {
        listener: &'static str,
        method: String,
        receiver: &'static str,
    },
}

/// A handler failed while an event was being dispatched.
///
/// Handlers after the failing one were not invoked. Mutations already made to
/// the event (including its cancelled flag) are kept.
#[derive(Debug, Error)]
#[error("an error occurred while handling event {event} in handler `{handler}`")]
pub struct DispatchError {
    /// Type name of the event being dispatched.
    pub event_type: &'static str,
    /// `Debug` rendering of the event at the moment of failure.
    pub event: String,
    /// Name of the handler that failed.
    pub handler: String,
    /// The error returned (or panic raised) by the handler.
    #[source]
    pub source: anyhow::Error,
}
