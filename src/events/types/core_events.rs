//! Events posted by [`CerobaCore`](crate::core::CerobaCore) during bootstrap.

use std::path::{Path, PathBuf};

use crate::events::base_event::{CancellableEventData, EventData};
use crate::{impl_cancellable_event, impl_event};

// ---------------------------------------------------------------------------
// CoreAboutToInitEvent
// ---------------------------------------------------------------------------

/// Posted before the core initializes anything.
///
/// Cancelling it aborts initialization.
#[derive(Debug, Clone, Default)]
pub struct CoreAboutToInitEvent {
    base: CancellableEventData<()>,
}

impl CoreAboutToInitEvent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl_cancellable_event!(CoreAboutToInitEvent, ());

// ---------------------------------------------------------------------------
// ConfigurationLoadingEvent
// ---------------------------------------------------------------------------

/// Posted once the core is initialized and configuration should be loaded.
///
/// Carries the path of the configuration document.
#[derive(Debug, Clone)]
pub struct ConfigurationLoadingEvent {
    base: EventData<PathBuf>,
}

impl ConfigurationLoadingEvent {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            base: EventData::new(config_path.into()),
        }
    }

    /// Path of the configuration document to load.
    pub fn config_path(&self) -> &Path {
        &self.base.event_data
    }
}

impl_event!(ConfigurationLoadingEvent, PathBuf);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::base_event::{CancellableEvent, Event};

    #[test]
    fn test_about_to_init_is_cancellable() {
        let mut event = CoreAboutToInitEvent::new();
        assert!(!event.is_cancelled());
        event.set_cancelled(true);
        assert_eq!(event.cancellation_state(), Some(true));
    }

    #[test]
    fn test_configuration_loading_carries_path() {
        let event = ConfigurationLoadingEvent::new("conf/ceroba.json");
        assert_eq!(event.config_path(), Path::new("conf/ceroba.json"));
        assert_eq!(event.event_data(), &PathBuf::from("conf/ceroba.json"));
        assert_eq!(event.cancellation_state(), None);
    }
}
