//! Ceroba bootstrap binary.
//!
//! Creates the application event bus, registers the configuration loader
//! and runs the core startup sequence.
//!
//! # Usage
//!
//! ```bash
//! ceroba [CONFIG_PATH]   # default: ceroba.json
//! RUST_LOG=debug ceroba
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ceroba::core::{CerobaCore, ConfigurationLoader, InitOutcome};
use ceroba::events::EventBus;
use ceroba::utilities::logger::init_logging;

const DEFAULT_CONFIG_FILE: &str = "ceroba.json";

fn main() -> anyhow::Result<()> {
    init_logging();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let core = CerobaCore::new(Arc::new(EventBus::new()), config_path);
    let loader = Arc::new(ConfigurationLoader::new());
    core.bus()
        .register_instance(&loader)
        .context("failed to register the configuration loader")?;

    match core.initialize().context("Ceroba failed to start")? {
        InitOutcome::Initialized => {
            let config = loader
                .config()
                .context("no configuration was loaded during initialization")?;
            println!("Configuration: {}", core.config_path().display());
            println!("  useInternalVoskModel = {}", config.use_internal_vosk_model());
            println!("  voskModelPath        = {}", config.vosk_model_path());
            Ok(())
        }
        InitOutcome::Cancelled => anyhow::bail!("Ceroba initialization was cancelled"),
    }
}
