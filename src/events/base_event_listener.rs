//! Handler declaration surface for event listeners.
//!
//! A listener type declares the handler methods it exposes through
//! [`EventListener::handler_methods`]. Each [`HandlerMethod`] records:
//! - whether it needs a receiver ([`HandlerKind::Instance`]) or not
//!   ([`HandlerKind::Static`]),
//! - its [`SubscribeOptions`] (priority and cancel visibility),
//! - its declared parameter list, which must be exactly one event type.
//!
//! The typed constructors ([`HandlerMethod::instance`],
//! [`HandlerMethod::static_fn`]) can only produce valid signatures.
//! [`HandlerMethod::raw`] exists for handlers whose signature is only known
//! at runtime (plugin hosts, script bridges); those are validated when the
//! listener is registered.

use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;

use super::base_event::Event;
use super::error::ConfigurationError;

/// Result returned by every event handler.
pub type HandlerResult = anyhow::Result<()>;

/// Type-erased handler entry point.
///
/// Receives the bound receiver (`None` for static handlers) and the event
/// being dispatched.
pub type ErasedInvoker = Arc<
    dyn Fn(Option<&(dyn Any + Send + Sync)>, &mut dyn Any) -> HandlerResult + Send + Sync,
>;

fn erase<F>(f: F) -> ErasedInvoker
where
    F: Fn(Option<&(dyn Any + Send + Sync)>, &mut dyn Any) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

// ---------------------------------------------------------------------------
// SubscribeOptions
// ---------------------------------------------------------------------------

/// Per-handler subscription options.
///
/// Higher `priority` runs earlier. A handler with `receive_canceled == false`
/// is skipped once the event it would receive has been cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub priority: i8,
    pub receive_canceled: bool,
}

impl SubscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn receive_canceled(mut self, receive_canceled: bool) -> Self {
        self.receive_canceled = receive_canceled;
        self
    }
}

// ---------------------------------------------------------------------------
// HandlerKind / ParamType
// ---------------------------------------------------------------------------

/// Whether a handler method is bound to a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Invoked with the registered listener instance as receiver.
    Instance,
    /// Invoked without a receiver.
    Static,
}

/// A declared handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamType {
    type_id: TypeId,
    type_name: &'static str,
    is_event: bool,
}

impl ParamType {
    /// A parameter of event type `E`.
    pub fn event<E: Event>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: type_name::<E>(),
            is_event: true,
        }
    }

    /// A parameter of a type that is not an event.
    pub fn value<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            is_event: false,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_event(&self) -> bool {
        self.is_event
    }
}

// ---------------------------------------------------------------------------
// HandlerMethod
// ---------------------------------------------------------------------------

/// A handler method declared by an [`EventListener`].
#[derive(Clone)]
pub struct HandlerMethod {
    name: Cow<'static, str>,
    kind: HandlerKind,
    options: SubscribeOptions,
    params: Vec<ParamType>,
    /// Receiver type of a typed instance handler.
    receiver: Option<(TypeId, &'static str)>,
    invoker: ErasedInvoker,
}

impl HandlerMethod {
    /// Declare a handler bound to a listener of type `L`, receiving `E`.
    pub fn instance<L, E, F>(
        name: impl Into<Cow<'static, str>>,
        options: SubscribeOptions,
        handler: F,
    ) -> Self
    where
        L: Any + Send + Sync,
        E: Event,
        F: Fn(&L, &mut E) -> HandlerResult + Send + Sync + 'static,
    {
        let invoker = erase(move |receiver, event| {
            let receiver = receiver
                .and_then(|r| r.downcast_ref::<L>())
                .ok_or_else(|| anyhow!("receiver is not a {}", type_name::<L>()))?;
            let event = event
                .downcast_mut::<E>()
                .ok_or_else(|| anyhow!("event is not a {}", type_name::<E>()))?;
            handler(receiver, event)
        });
        Self {
            name: name.into(),
            kind: HandlerKind::Instance,
            options,
            params: vec![ParamType::event::<E>()],
            receiver: Some((TypeId::of::<L>(), type_name::<L>())),
            invoker,
        }
    }

    /// Declare a handler without a receiver, receiving `E`.
    pub fn static_fn<E, F>(
        name: impl Into<Cow<'static, str>>,
        options: SubscribeOptions,
        handler: F,
    ) -> Self
    where
        E: Event,
        F: Fn(&mut E) -> HandlerResult + Send + Sync + 'static,
    {
        let invoker = erase(move |_, event| {
            let event = event
                .downcast_mut::<E>()
                .ok_or_else(|| anyhow!("event is not a {}", type_name::<E>()))?;
            handler(event)
        });
        Self {
            name: name.into(),
            kind: HandlerKind::Static,
            options,
            params: vec![ParamType::event::<E>()],
            receiver: None,
            invoker,
        }
    }

    /// Declare a handler whose signature is described at runtime.
    ///
    /// `params` is validated on registration. The invoker receives the
    /// receiver and the event as `dyn Any` and is responsible for
    /// downcasting both.
    pub fn raw<F>(
        name: impl Into<Cow<'static, str>>,
        kind: HandlerKind,
        options: SubscribeOptions,
        params: Vec<ParamType>,
        invoker: F,
    ) -> Self
    where
        F: Fn(Option<&(dyn Any + Send + Sync)>, &mut dyn Any) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            kind,
            options,
            params,
            receiver: None,
            invoker: erase(invoker),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn options(&self) -> SubscribeOptions {
        self.options
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Receiver type declared by [`HandlerMethod::instance`], `None` otherwise.
    pub fn receiver_type(&self) -> Option<TypeId> {
        self.receiver.map(|(type_id, _)| type_id)
    }

    pub(crate) fn invoker(&self) -> &ErasedInvoker {
        &self.invoker
    }

    /// Check the declared signature and return the event type it subscribes to.
    pub(crate) fn event_param(
        &self,
        listener: &'static str,
    ) -> Result<ParamType, ConfigurationError> {
        let [param] = self.params.as_slice() else {
            return Err(ConfigurationError::ParameterCount {
                listener,
                method: self.name.to_string(),
                count: self.params.len(),
            });
        };
        if !param.is_event {
            return Err(ConfigurationError::NotAnEvent {
                listener,
                method: self.name.to_string(),
                param: param.type_name,
            });
        }
        Ok(*param)
    }

    /// Check that a typed instance handler is bound to the listener type
    /// being registered.
    pub(crate) fn check_receiver(
        &self,
        listener_type: TypeId,
        listener: &'static str,
    ) -> Result<(), ConfigurationError> {
        match self.receiver {
            Some((type_id, receiver)) if type_id != listener_type => {
                Err(ConfigurationError::ReceiverMismatch {
                    listener,
                    method: self.name.to_string(),
                    receiver,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("params", &self.params)
            .field("receiver", &self.receiver.map(|(_, name)| name))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventListener
// ---------------------------------------------------------------------------

/// A type that exposes event handler methods.
///
/// Register instances with
/// [`EventBus::register_instance`](crate::events::EventBus::register_instance)
/// (picks up [`HandlerKind::Instance`] methods) and the type itself with
/// [`EventBus::register_static`](crate::events::EventBus::register_static)
/// (picks up [`HandlerKind::Static`] methods).
///
/// ```ignore
/// struct Audit;
///
/// impl EventListener for Audit {
///     fn handler_methods() -> Vec<HandlerMethod> {
///         vec![HandlerMethod::instance(
///             "on_shutdown",
///             SubscribeOptions::new().priority(10),
///             |_: &Audit, event: &mut ShutdownEvent| {
///                 event.set_cancelled(true);
///                 Ok(())
///             },
///         )]
///     }
/// }
/// ```
pub trait EventListener: Any + Send + Sync {
    /// Every handler method this listener declares, in declaration order.
    fn handler_methods() -> Vec<HandlerMethod>
    where
        Self: Sized;
}
