//! Bounded close pipeline
//!
//! One task per alert, at most `max_concurrency` holding a permit. Workers
//! report through an mpsc channel. A waiter task joins every worker, turns a
//! panicked worker into a failed outcome, and then drops the last sender so
//! the aggregator loop ends once every outcome is in.

use super::retry::{close_with_retry, ClosePolicy};
use crate::adapters::xdr::{AlertApi, CloseRequest};
use crate::config::CloseConfig;
use crate::domain::Alert;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Result of closing one alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    pub alert_id: String,
    pub alert_name: String,
    pub success: bool,
    pub attempts: u32,
    pub error: Option<String>,
}

impl CloseOutcome {
    fn failed(alert_id: String, alert_name: String, attempts: u32, error: String) -> Self {
        Self {
            alert_id,
            alert_name,
            success: false,
            attempts,
            error: Some(error),
        }
    }
}

/// Aggregated close results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    /// Failed outcomes, in completion order
    pub failures: Vec<CloseOutcome>,
}

impl CloseSummary {
    fn record(&mut self, outcome: CloseOutcome) {
        self.total += 1;
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(outcome);
        }
    }

    /// No alert failed to close
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            succeeded = self.succeeded,
            failed = self.failed,
            total = self.total,
            "Close phase completed"
        );
    }
}

/// Closes alerts with bounded concurrency and per-alert retry
pub struct ClosePipeline {
    api: Arc<dyn AlertApi>,
    enabled: bool,
    reason: String,
    concurrency: usize,
    policy: ClosePolicy,
    verbose: bool,
}

impl ClosePipeline {
    /// Create a pipeline from the `[close]` section
    pub fn new(api: Arc<dyn AlertApi>, config: &CloseConfig) -> Self {
        Self {
            api,
            enabled: config.enabled,
            reason: config.reason.clone(),
            concurrency: config.max_concurrency.max(1),
            policy: ClosePolicy::from_config(config),
            verbose: false,
        }
    }

    /// Log every successful close at info level instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Close every alert
    ///
    /// Individual failures never abort the pipeline; they are counted and
    /// returned in [`CloseSummary::failures`].
    pub async fn close_all(&self, alerts: &[Alert]) -> CloseSummary {
        if !self.enabled {
            tracing::info!("Closing is disabled, skipping close phase");
            return CloseSummary::default();
        }

        if alerts.is_empty() {
            tracing::info!("No alerts to close");
            return CloseSummary::default();
        }

        tracing::info!(
            count = alerts.len(),
            concurrency = self.concurrency,
            reason = %self.reason,
            "Closing alerts"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<CloseOutcome>(self.concurrency);

        let mut handles = Vec::with_capacity(alerts.len());
        let mut identities = Vec::with_capacity(alerts.len());

        for alert in alerts {
            let request = CloseRequest::for_alert(alert, self.reason.clone());
            let alert_name = alert.name.clone();
            identities.push((request.id.clone(), alert_name.clone()));

            let api = Arc::clone(&self.api);
            let semaphore = Arc::clone(&semaphore);
            let policy = self.policy;
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        let result = close_with_retry(api.as_ref(), &request, &policy).await;
                        CloseOutcome {
                            alert_id: request.id,
                            alert_name,
                            success: result.is_success(),
                            attempts: result.attempts,
                            error: result.error,
                        }
                    }
                    Err(_) => CloseOutcome::failed(
                        request.id,
                        alert_name,
                        0,
                        "Close semaphore closed".to_string(),
                    ),
                };
                let _ = tx.send(outcome).await;
            }));
        }

        // The waiter owns the original sender
        tokio::spawn(async move {
            let results = futures::future::join_all(handles).await;
            for (result, (alert_id, alert_name)) in results.into_iter().zip(identities) {
                if let Err(e) = result {
                    let outcome = CloseOutcome::failed(
                        alert_id,
                        alert_name,
                        0,
                        format!("Close worker failed: {e}"),
                    );
                    let _ = tx.send(outcome).await;
                }
            }
        });

        let mut summary = CloseSummary::default();
        while let Some(outcome) = rx.recv().await {
            if outcome.success {
                if self.verbose {
                    tracing::info!(
                        alert_id = %outcome.alert_id,
                        alert_name = %outcome.alert_name,
                        attempts = outcome.attempts,
                        "Closed alert"
                    );
                } else {
                    tracing::debug!(
                        alert_id = %outcome.alert_id,
                        alert_name = %outcome.alert_name,
                        attempts = outcome.attempts,
                        "Closed alert"
                    );
                }
            } else {
                tracing::warn!(
                    alert_id = %outcome.alert_id,
                    alert_name = %outcome.alert_name,
                    attempts = outcome.attempts,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "Failed to close alert"
                );
            }
            summary.record(outcome);
        }

        summary.log_summary();
        summary
    }
}
