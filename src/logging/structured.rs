//! Subscriber setup
//!
//! Human-readable lines go to stderr so stdout stays free for the progress
//! and summary output of the CLI. With `logging.local_enabled` a second,
//! JSON-formatted layer writes `xdr-sweep[.<period>].log` files under
//! `logging.local_path`, rotated per `logging.local_rotation`. Both layers
//! share one filter: `RUST_LOG` when set, otherwise `xdr_sweep=<level>`.

use crate::config::LoggingConfig;
use crate::domain::{Result, SweepError};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "xdr-sweep";
const LOG_FILE_SUFFIX: &str = "log";

/// Keeps the background file writer alive; dropping it flushes pending lines
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// Call once, before any command runs, and hold the returned guard until the
/// process exits.
///
/// ```no_run
/// use xdr_sweep::config::LoggingConfig;
/// use xdr_sweep::logging::init_logging;
///
/// let _guard = init_logging("debug", &LoggingConfig::default())?;
/// # Ok::<(), xdr_sweep::domain::SweepError>(())
/// ```
///
/// # Errors
///
/// Unknown level names, and a log directory that cannot be created or
/// written.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_filter(parse_log_level(log_level_str)?);

    let mut layers = vec![tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter.clone())
        .boxed()];

    let file_guard = if config.local_enabled {
        let (writer, guard) = file_writer(config)?;
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_thread_ids(true)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        );
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        level = %log_level_str,
        file_logging = config.local_enabled,
        path = %config.local_path,
        rotation = %config.local_rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xdr_sweep={level}")))
}

/// Non-blocking writer over the rolling log file
fn file_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = Path::new(&config.local_path);

    std::fs::create_dir_all(dir).map_err(|e| {
        SweepError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(parse_rotation(&config.local_rotation))
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|e| {
            SweepError::Configuration(format!(
                "Cannot write log files in {}: {e}",
                dir.display()
            ))
        })?;

    Ok(tracing_appender::non_blocking(appender))
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(SweepError::Configuration(format!(
            "Invalid log level '{level_str}' (trace, debug, info, warn, error)"
        ))),
    }
}
