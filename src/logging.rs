//! Tracing subscriber setup for the command-line tool.

use std::io;

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::common::error::{QRError, QRResult};
use crate::config::LoggingOptions;

/// Installs the global subscriber. Later calls are ignored.
pub fn init(options: &LoggingOptions) -> QRResult<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let level = std::env::var("QRLOGO_LOG_LEVEL").unwrap_or_else(|_| options.level.clone());
    let env_filter = EnvFilter::try_new(level.as_str())
        .map_err(|e| QRError::Config(format!("Invalid log level '{level}': {e}")))?;

    Registry::default()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_timer(UtcTime::rfc_3339())
                .with_writer(io::stderr)
                .with_ansi(options.color)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| QRError::Config(format!("Failed to install tracing subscriber: {e}")))
}
