// src/logging.rs

use std::env;

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber. `RUST_LOG` directives apply on top of the
/// base level taken from `LOG_LEVEL` (default `info`).
pub fn init() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {}", info);
    }));
}
