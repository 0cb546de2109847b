//! Base event capabilities for the Ceroba event system.
//!
//! Two capabilities exist:
//! - [`Event`]: a typed occurrence carrying an optional payload.
//! - [`CancellableEvent`]: an [`Event`] with a mutable `cancelled` flag that
//!   handlers and the producer can inspect or set.
//!
//! Concrete events are plain structs. The usual way to define one is to
//! embed one of the generic building blocks ([`EventData`],
//! [`CancellableEventData`]) as a `base` field and use [`impl_event!`] /
//! [`impl_cancellable_event!`]. Events implementing the traits by hand must
//! follow the contract documented on [`CancellableEvent`].

use std::any::Any;
use std::fmt;

// ---------------------------------------------------------------------------
// Event trait
// ---------------------------------------------------------------------------

/// Trait implemented by every event that can be posted on an
/// [`EventBus`](crate::events::EventBus).
///
/// The dispatch key is the concrete Rust type of the event: handlers
/// subscribed to `A` never receive `B`, even if `B` wraps `A`.
pub trait Event: Any + Send + fmt::Debug {
    /// Payload type carried by the event. Use `()` for events without one.
    type Data;

    /// The payload carried by this event.
    fn event_data(&self) -> &Self::Data;

    /// Human-readable name of the event type, used in logs and errors.
    fn event_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Cancellation state as seen by the dispatcher.
    ///
    /// `None` for events that are not cancellable, `Some(flag)` otherwise.
    /// Types implementing [`CancellableEvent`] must return
    /// `Some(self.is_cancelled())`; the macros below do this for you.
    fn cancellation_state(&self) -> Option<bool> {
        None
    }
}

/// An [`Event`] that handlers may veto.
///
/// Cancellation is advisory: the bus only uses it to skip handlers that did
/// not opt into receiving cancelled events. The producer decides what a
/// cancelled event means by inspecting [`is_cancelled`](Self::is_cancelled)
/// after [`post`](crate::events::EventBus::post) returns.
///
/// # Implementing by hand
///
/// The bus reads the flag through [`Event::cancellation_state`], never
/// through this trait. A hand-written implementation **must** override
/// `cancellation_state` to return `Some(flag)`; otherwise the event is never
/// seen as cancelled. [`is_cancelled`](Self::is_cancelled) is derived from
/// `cancellation_state` so that both views always agree. Prefer
/// [`impl_cancellable_event!`] or [`CancellableEventData`], which do this
/// for you.
///
/// ```ignore
/// #[derive(Debug)]
/// struct Shutdown {
///     cancelled: bool,
/// }
///
/// impl Event for Shutdown {
///     type Data = ();
///
///     fn event_data(&self) -> &() {
///         &()
///     }
///
///     fn cancellation_state(&self) -> Option<bool> {
///         Some(self.cancelled)
///     }
/// }
///
/// impl CancellableEvent for Shutdown {
///     fn set_cancelled(&mut self, cancelled: bool) {
///         self.cancelled = cancelled;
///     }
/// }
/// ```
pub trait CancellableEvent: Event {
    /// Set or clear the cancelled flag.
    fn set_cancelled(&mut self, cancelled: bool);

    /// Whether the event is currently cancelled, as the bus sees it.
    fn is_cancelled(&self) -> bool {
        self.cancellation_state() == Some(true)
    }
}

// ---------------------------------------------------------------------------
// EventData – payload carrier for plain events
// ---------------------------------------------------------------------------

/// Generic payload carrier implementing [`Event`].
///
/// Usable directly (`EventData<String>` is a distinct event type from
/// `EventData<u32>`) or embedded as the `base` field of a named event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData<T> {
    /// The event payload.
    pub event_data: T,
}

impl<T> EventData<T> {
    pub fn new(event_data: T) -> Self {
        Self { event_data }
    }
}

impl<T: Send + fmt::Debug + 'static> Event for EventData<T> {
    type Data = T;

    fn event_data(&self) -> &T {
        &self.event_data
    }
}

// ---------------------------------------------------------------------------
// CancellableEventData – payload carrier with a cancelled flag
// ---------------------------------------------------------------------------

/// Generic payload carrier implementing [`CancellableEvent`].
///
/// Freshly constructed values are never cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancellableEventData<T> {
    /// The event payload.
    pub event_data: T,
    /// Cancelled flag, mutated by handlers during dispatch.
    pub cancelled: bool,
}

impl<T> CancellableEventData<T> {
    pub fn new(event_data: T) -> Self {
        Self {
            event_data,
            cancelled: false,
        }
    }
}

impl<T: Send + fmt::Debug + 'static> Event for CancellableEventData<T> {
    type Data = T;

    fn event_data(&self) -> &T {
        &self.event_data
    }

    fn cancellation_state(&self) -> Option<bool> {
        Some(self.cancelled)
    }
}

impl<T: Send + fmt::Debug + 'static> CancellableEvent for CancellableEventData<T> {
    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

// ---------------------------------------------------------------------------
// Helper macros – delegate the event traits to an embedded `base` field
// ---------------------------------------------------------------------------

/// Implement [`Event`] for a struct that contains a `base: EventData<T>` field.
///
/// Usage:
/// ```ignore
/// impl_event!(MyEvent, MyPayload);
/// ```
#[macro_export]
macro_rules! impl_event {
    ($ty:ty, $data:ty) => {
        impl $crate::events::base_event::Event for $ty {
            type Data = $data;

            fn event_data(&self) -> &$data {
                &self.base.event_data
            }
        }
    };
}

/// Implement [`Event`] and [`CancellableEvent`] for a struct that contains a
/// `base: CancellableEventData<T>` field.
///
/// Usage:
/// ```ignore
/// impl_cancellable_event!(MyEvent, ());
/// ```
#[macro_export]
macro_rules! impl_cancellable_event {
    ($ty:ty, $data:ty) => {
        impl $crate::events::base_event::Event for $ty {
            type Data = $data;

            fn event_data(&self) -> &$data {
                &self.base.event_data
            }

            fn cancellation_state(&self) -> Option<bool> {
                Some(self.base.cancelled)
            }
        }

        impl $crate::events::base_event::CancellableEvent for $ty {
            fn set_cancelled(&mut self, cancelled: bool) {
                self.base.cancelled = cancelled;
            }
        }
    };
}
