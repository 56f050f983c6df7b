//! Tracing setup.

use tracing_subscriber::EnvFilter;

use crate::config::AutoloadConfig;

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    init_tracing_with_filter("info");
}

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `default_filter`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Install a fmt subscriber using the config's `log_filter` as default.
pub fn init_tracing_from_config(config: &AutoloadConfig) {
    init_tracing_with_filter(&config.log_filter);
}
