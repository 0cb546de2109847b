//! Logging setup.
//!
//! Library code logs through the `log` facade; applications call
//! [`init_logging`] once at startup to route it to `env_logger`.

use env_logger::{Builder, Env};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Install `env_logger` with [`DEFAULT_FILTER`].
///
/// Returns `false` if a logger was already installed.
pub fn init_logging() -> bool {
    init_logging_with(DEFAULT_FILTER)
}

/// Install `env_logger`, falling back to `default_filter` when `RUST_LOG`
/// is not set.
///
/// Returns `false` if a logger was already installed.
pub fn init_logging_with(default_filter: &str) -> bool {
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
