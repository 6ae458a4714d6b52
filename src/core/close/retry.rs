//! Close request retry policy
//!
//! Transport failures and 5xx responses are retried after
//! `attempt * backoff_unit`. Every other failure is final on the spot.

use crate::adapters::xdr::{AlertApi, CloseRequest};
use crate::config::CloseConfig;
use crate::log_retry_attempt;
use std::time::Duration;

/// Attempt limit and backoff unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosePolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl ClosePolicy {
    pub fn from_config(config: &CloseConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_unit: config.backoff_unit(),
        }
    }

    /// Wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }

    /// [`delay_after`](Self::delay_after) in whole milliseconds, saturating
    pub fn delay_ms_after(&self, attempt: u32) -> u64 {
        u64::try_from(self.delay_after(attempt).as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for ClosePolicy {
    fn default() -> Self {
        Self::from_config(&CloseConfig::default())
    }
}

/// Outcome of closing one alert, before it is tagged with alert metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryResult {
    pub attempts: u32,
    pub error: Option<String>,
}

impl RetryResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Close one alert, retrying per `policy`
pub async fn close_with_retry(
    api: &dyn AlertApi,
    request: &CloseRequest,
    policy: &ClosePolicy,
) -> RetryResult {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match api.close_alert(request).await {
            Ok(()) => {
                return RetryResult {
                    attempts: attempt,
                    error: None,
                }
            }
            Err(e) => e,
        };

        let retryable = error.is_transport() || error.is_server_error();

        if !retryable {
            return RetryResult {
                attempts: attempt,
                error: Some(error.to_string()),
            };
        }

        if attempt >= max_attempts {
            let message = if error.is_transport() {
                format!("HTTP error after {max_attempts} attempts: {error}")
            } else {
                error.to_string()
            };
            return RetryResult {
                attempts: attempt,
                error: Some(message),
            };
        }

        let delay = policy.delay_after(attempt);
        log_retry_attempt!(
            request.id,
            attempt + 1,
            max_attempts,
            policy.delay_ms_after(attempt),
            error
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
