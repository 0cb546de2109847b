//! Typed, synchronous, in-process event bus.
//!
//! Handlers are stored per concrete event type (keyed by [`TypeId`]) in
//! descending priority order, ties kept in registration order. [`post`]
//! runs every eligible handler on the caller's thread and returns once all
//! of them have run or the first one has failed.
//!
//! Applications normally create one bus at startup and hand an
//! `Arc<EventBus>` to every subsystem that needs it. Independent buses (for
//! tests, or isolated subsystems) share nothing.
//!
//! [`post`]: EventBus::post

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use anyhow::anyhow;
use parking_lot::RwLock;

use super::base_event::Event;
use super::base_event_listener::{
    ErasedInvoker, EventListener, HandlerKind, HandlerMethod, HandlerResult, SubscribeOptions,
};
use super::error::{ConfigurationError, DispatchError};

// ---------------------------------------------------------------------------
// Internal handler entry
// ---------------------------------------------------------------------------

struct HandlerEntry {
    /// `Listener::method` for declared methods, the closure type otherwise.
    name: String,
    options: SubscribeOptions,
    /// Non-owning reference to the receiver of an instance handler.
    receiver: Option<Weak<dyn Any + Send + Sync>>,
    invoker: ErasedInvoker,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Event bus for registering handlers and posting events.
///
/// Registration and posting may happen from any thread. `post` works on a
/// snapshot of the handler list taken when it starts: a handler that
/// registers new listeners while an event is being dispatched does not
/// deadlock, and the new listeners are only invoked from the next `post`.
pub struct EventBus {
    listeners: RwLock<HashMap<TypeId, Vec<Arc<HandlerEntry>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        log::info!("Ceroba bus created");
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Subscribe a closure to events of type `E`.
    pub fn subscribe<E, F>(&self, options: SubscribeOptions, handler: F)
    where
        E: Event,
        F: Fn(&mut E) -> HandlerResult + Send + Sync + 'static,
    {
        let method = HandlerMethod::static_fn::<E, F>(type_name::<F>(), options, handler);
        self.add_listener(
            TypeId::of::<E>(),
            HandlerEntry {
                name: method.name().to_string(),
                options,
                receiver: None,
                invoker: method.invoker().clone(),
            },
        );
        log::debug!("Subscribed handler for event {}", type_name::<E>());
    }

    /// Register the [`HandlerKind::Instance`] methods of `target`.
    ///
    /// The bus keeps only a weak reference to `target`; once the caller drops
    /// every strong reference, its handlers are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for the first declared method (of any
    /// kind) whose signature is not exactly one event parameter, or whose
    /// receiver is not `L`. Methods registered before it stay registered.
    pub fn register_instance<L: EventListener>(
        &self,
        target: &Arc<L>,
    ) -> Result<(), ConfigurationError> {
        let strong: Arc<dyn Any + Send + Sync> = target.clone();
        let receiver = Arc::downgrade(&strong);
        self.add_methods::<L>(HandlerKind::Instance, Some(receiver))?;
        log::debug!("Registered instance listeners for object {}", type_name::<L>());
        Ok(())
    }

    /// Register the [`HandlerKind::Static`] methods of listener type `L`.
    ///
    /// # Errors
    ///
    /// Same as [`register_instance`](Self::register_instance).
    pub fn register_static<L: EventListener>(&self) -> Result<(), ConfigurationError> {
        self.add_methods::<L>(HandlerKind::Static, None)?;
        log::debug!("Registered static listeners for class {}", type_name::<L>());
        Ok(())
    }

    fn add_methods<L: EventListener>(
        &self,
        kind: HandlerKind,
        receiver: Option<Weak<dyn Any + Send + Sync>>,
    ) -> Result<(), ConfigurationError> {
        let listener = type_name::<L>();
        for method in L::handler_methods() {
            let param = method.event_param(listener)?;
            method.check_receiver(TypeId::of::<L>(), listener)?;
            if method.kind() != kind {
                continue;
            }
            self.add_listener(
                param.type_id(),
                HandlerEntry {
                    name: format!("{listener}::{}", method.name()),
                    options: method.options(),
                    receiver: receiver.clone(),
                    invoker: method.invoker().clone(),
                },
            );
        }
        Ok(())
    }

    fn add_listener(&self, event_type: TypeId, entry: HandlerEntry) {
        let mut map = self.listeners.write();
        let list = map.entry(event_type).or_default();
        list.push(Arc::new(entry));
        // `sort_by` is stable: equal priorities keep registration order.
        list.sort_by(|a, b| b.options.priority.cmp(&a.options.priority));
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Dispatch `event` to every handler registered for its exact type.
    ///
    /// Handlers run in descending priority order. Once the event is
    /// cancelled, handlers that did not opt into cancelled events are
    /// skipped. Posting an event nobody listens to is a no-op.
    ///
    /// # Errors
    ///
    /// The first handler that returns an error or panics aborts dispatch;
    /// the remaining handlers are not invoked. Changes handlers already made
    /// to `event` are kept.
    pub fn post<E: Event>(&self, event: &mut E) -> Result<(), DispatchError> {
        let handlers = {
            let map = self.listeners.read();
            match map.get(&TypeId::of::<E>()) {
                Some(list) => list.clone(),
                None => return Ok(()),
            }
        };

        for handler in &handlers {
            if event.cancellation_state() == Some(true) && !handler.options.receive_canceled {
                continue;
            }

            let receiver = match &handler.receiver {
                Some(weak) => match weak.upgrade() {
                    Some(receiver) => Some(receiver),
                    None => {
                        log::trace!("Skipping handler {}: receiver dropped", handler.name);
                        continue;
                    }
                },
                None => None,
            };

            let erased: &mut dyn Any = &mut *event;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                (handler.invoker)(receiver.as_deref(), erased)
            }))
            .unwrap_or_else(|payload| {
                Err(anyhow!("handler panicked: {}", panic_message(&*payload)))
            });

            if let Err(source) = outcome {
                return Err(DispatchError {
                    event_type: event.event_name(),
                    event: format!("{event:?}"),
                    handler: handler.name.clone(),
                    source,
                });
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Number of handlers registered for event type `E`.
    pub fn handler_count<E: Event>(&self) -> usize {
        self.listeners
            .read()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Whether any handler is registered for event type `E`.
    pub fn has_handlers<E: Event>(&self) -> bool {
        self.handler_count::<E>() > 0
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.listeners.read();
        f.debug_struct("EventBus")
            .field("event_types", &map.len())
            .field("handlers", &map.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
