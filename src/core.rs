//! Application bootstrap.
//!
//! [`CerobaCore`] owns the process-wide [`EventBus`] handed to it by the
//! application and drives the startup sequence:
//!
//! 1. post [`CoreAboutToInitEvent`]; stop if any handler cancelled it,
//! 2. post [`ConfigurationLoadingEvent`] so the configuration subsystem
//!    (usually [`ConfigurationLoader`]) can load its document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::config::CerobaConfig;
use crate::events::{
    CancellableEvent, ConfigurationLoadingEvent, CoreAboutToInitEvent, DispatchError, EventBus,
    EventListener, HandlerMethod, HandlerResult, SubscribeOptions,
};

/// Errors raised during bootstrap.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A handler failed while a bootstrap event was dispatched.
    #[error("bootstrap aborted: {0}")]
    Dispatch(#[from] DispatchError),
}

/// How [`CerobaCore::initialize`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Every bootstrap step ran.
    Initialized,
    /// A handler cancelled [`CoreAboutToInitEvent`].
    Cancelled,
}

/// The Ceroba core.
pub struct CerobaCore {
    bus: Arc<EventBus>,
    config_path: PathBuf,
}

impl CerobaCore {
    pub fn new(bus: Arc<EventBus>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            bus,
            config_path: config_path.into(),
        }
    }

    /// The bus subsystems should register on and post to.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Run the startup sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Dispatch`] if a handler of a bootstrap event fails.
    pub fn initialize(&self) -> Result<InitOutcome, CoreError> {
        log::info!("Ceroba Core initializing...");
        let mut about_to_init = CoreAboutToInitEvent::new();
        self.bus.post(&mut about_to_init)?;

        if about_to_init.is_cancelled() {
            log::error!("Ceroba initialization cancelled");
            return Ok(InitOutcome::Cancelled);
        }

        log::info!("Loading configuration...");
        self.bus
            .post(&mut ConfigurationLoadingEvent::new(self.config_path.clone()))?;

        Ok(InitOutcome::Initialized)
    }
}

// ---------------------------------------------------------------------------
// ConfigurationLoader
// ---------------------------------------------------------------------------

/// Loads [`CerobaConfig`] when [`ConfigurationLoadingEvent`] is posted.
#[derive(Debug, Default)]
pub struct ConfigurationLoader {
    config: RwLock<Option<CerobaConfig>>,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently loaded configuration, if any.
    pub fn config(&self) -> Option<CerobaConfig> {
        self.config.read().clone()
    }

    fn on_configuration_loading(&self, event: &mut ConfigurationLoadingEvent) -> HandlerResult {
        let config = CerobaConfig::load(event.config_path())?;
        *self.config.write() = Some(config);
        Ok(())
    }
}

impl EventListener for ConfigurationLoader {
    fn handler_methods() -> Vec<HandlerMethod> {
        vec![HandlerMethod::instance(
            "on_configuration_loading",
            SubscribeOptions::new(),
            Self::on_configuration_loading,
        )]
    }
}
