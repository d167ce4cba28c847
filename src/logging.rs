//! Tracing setup
//!
//! Filter comes from `MONEY_MANAGER_LOG`, then `RUST_LOG`, then a default
//! that keeps the CLI quiet. Log lines go to stderr so command output on
//! stdout stays clean.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "MONEY_MANAGER_LOG";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber once per process
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default = if verbose {
            "money_manager=debug"
        } else {
            "money_manager=warn"
        };

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default));

        // Another subscriber may already be installed by an embedding app
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();

        tracing::debug!("tracing initialized");
    });
}
