//! Sweep coordinator - main orchestrator for one run
//!
//! This module wires the pagination driver, the streaming writer, the filter
//! and the close pipeline together.

use crate::adapters::xdr::{AlertApi, HttpAlertApi};
use crate::config::SweepConfig;
use crate::core::close::ClosePipeline;
use crate::core::fetch::{FetchSettings, PaginationDriver};
use crate::core::filter::filter_alerts;
use crate::core::flush::FlushManager;
use crate::core::output::save_alerts;
use crate::core::sweep::summary::{RunError, RunErrorKind, RunSummary};
use crate::domain::{Alert, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};

/// Sweep coordinator
pub struct SweepCoordinator {
    config: SweepConfig,
    api: Arc<dyn AlertApi>,
    shutdown: watch::Receiver<bool>,
}

impl SweepCoordinator {
    /// Create a coordinator talking to the configured XDR API
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SweepConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let api = Arc::new(HttpAlertApi::new(&config.api, &config.query)?);
        Ok(Self::with_api(config, api, shutdown))
    }

    /// Create a coordinator over any [`AlertApi`] implementation
    pub fn with_api(
        config: SweepConfig,
        api: Arc<dyn AlertApi>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            api,
            shutdown,
        }
    }

    /// Execute the sweep
    ///
    /// 1. Fetch every page, streaming alerts to `fetch.output_file`
    /// 2. Finalize the output file
    /// 3. Filter (if enabled) and save matches to `filter.output_file`
    /// 4. Close the matches (if enabled and the run was not interrupted)
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that make the output unusable:
    /// writing either output file. Page and close failures are recorded in
    /// the summary.
    pub async fn execute(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new(&self.config.fetch.output_file);

        tracing::info!(
            base_url = %self.api.base_url(),
            tenants = self.config.query.tenant_ids.len(),
            output_file = %self.config.fetch.output_file,
            "Starting sweep"
        );

        let flush = Arc::new(FlushManager::new(
            &self.config.fetch.output_file,
            self.config.fetch.flush_every,
        ));
        let accumulator: Arc<Mutex<Vec<Alert>>> = Arc::new(Mutex::new(Vec::new()));

        let driver = PaginationDriver::new(
            Arc::clone(&self.api),
            Arc::clone(&flush),
            Arc::clone(&accumulator),
            FetchSettings::from_config(&self.config.query, &self.config.fetch),
        )
        .with_shutdown(self.shutdown.clone());

        let report = driver.run().await?;

        summary.pages_fetched = report.pages_fetched;
        summary.pages_failed = report.pages_failed;
        summary.interrupted = report.interrupted;
        for page_error in report.errors {
            summary.add_error(
                RunError::new(RunErrorKind::Fetch, page_error.error.to_string())
                    .with_context(format!("page={}", page_error.page)),
            );
        }

        summary.alerts_written = flush.finalize().await?;

        let alerts = std::mem::take(&mut *accumulator.lock().await);

        if self.config.filter.enabled {
            self.filter_and_close(alerts, &mut summary).await?;
        } else if self.config.close.enabled {
            tracing::warn!("Closing is enabled but filtering is not; no alerts will be closed");
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    async fn filter_and_close(&self, alerts: Vec<Alert>, summary: &mut RunSummary) -> Result<()> {
        let filtered = filter_alerts(alerts, &self.config.filter);
        summary.alerts_filtered = Some(filtered.len());

        if filtered.is_empty() {
            tracing::info!("No alerts matched the filters");
            return Ok(());
        }

        let filtered_path = PathBuf::from(&self.config.filter.output_file);
        save_alerts(&filtered_path, &filtered).await?;
        summary.filtered_file = Some(filtered_path);

        if !self.config.close.enabled {
            return Ok(());
        }

        if summary.interrupted {
            tracing::warn!(
                matched = filtered.len(),
                "Run was interrupted, skipping close phase"
            );
            return Ok(());
        }

        let pipeline = ClosePipeline::new(Arc::clone(&self.api), &self.config.close)
            .with_verbose(self.config.application.verbose);
        let close_summary = pipeline.close_all(&filtered).await;

        for failure in &close_summary.failures {
            summary.add_error(
                RunError::new(
                    RunErrorKind::Close,
                    failure
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown error".to_string()),
                )
                .with_context(format!("alert_id={}", failure.alert_id)),
            );
        }
        summary.close = Some(close_summary);

        Ok(())
    }
}
