//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Human-readable console output
//! - JSON-formatted local log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use xdr_sweep::logging::init_logging;
//! use xdr_sweep::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(page = 1, "Fetching alert page");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a completed page fetch
///
/// # Example
///
/// ```no_run
/// use xdr_sweep::log_page_completed;
///
/// log_page_completed!(3, 100, true);
/// ```
#[macro_export]
macro_rules! log_page_completed {
    ($page:expr, $count:expr, $full:expr) => {
        tracing::debug!(
            page = $page,
            alerts = $count,
            full = $full,
            "Page fetched"
        );
    };
}

/// Log a flush of buffered alerts to the output file
///
/// # Example
///
/// ```no_run
/// use xdr_sweep::log_flush;
///
/// log_flush!("out.json", 1000, 3000);
/// ```
#[macro_export]
macro_rules! log_flush {
    ($path:expr, $count:expr, $total:expr) => {
        tracing::info!(
            path = %$path,
            flushed = $count,
            total_flushed = $total,
            "Flushed alerts to output file"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use xdr_sweep::log_retry_attempt;
///
/// log_retry_attempt!("a-1", 2, 3, 2000u64, "HTTP 503: unavailable");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($alert_id:expr, $attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            alert_id = %$alert_id,
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying close request"
        );
    };
}
