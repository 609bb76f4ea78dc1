//! # Logging
//!
//! `tracing` subscriber setup: formatted stdout plus an optional daily
//! rolling log file.
//!
//! `RUST_LOG` directives are honored; the configured level is added as the
//! default directive.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{ControllerError, Result};

/// Builds the filter for `level` on top of `RUST_LOG`.
///
/// # Errors
///
/// Returns error if `level` is not a valid directive
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    let directive: Directive = level
        .parse()
        .map_err(|e| ControllerError::Logging(format!("invalid level '{}': {}", level, e)))?;

    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits a log file path into its directory and file name.
fn split_log_path(file: &str) -> Result<(&Path, &str)> {
    let path = Path::new(file);
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ControllerError::Logging(format!("invalid log file '{}'", file)))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

/// Installs the global subscriber.
///
/// # Returns
///
/// The file writer guard when file logging is enabled; it must be held for
/// the lifetime of the program or buffered lines are lost.
///
/// # Errors
///
/// Returns error if the level or file path is invalid, or a global
/// subscriber is already installed
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(&config.level)?;

    let (file_layer, guard) = if config.file.is_empty() {
        (None, None)
    } else {
        let (dir, name) = split_log_path(&config.file)?;
        let appender = tracing_appender::rolling::daily(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| ControllerError::Logging(e.to_string()))?;

    Ok(guard)
}
