//! Pagination driver
//!
//! Seeds pages `base .. base + cap - 1` and runs at most `cap` fetches at a
//! time. Every full page enqueues `page + cap`, so each seed starts a branch
//! `p, p + cap, p + 2cap, ...` that ends at its first partial, empty or
//! failed page. The aggregator loop owns an explicit outstanding counter and
//! stops once it reaches zero.
//!
//! A partial page in the middle of the data set ends its branch, and pages
//! behind it on that branch are never requested.

use super::page::{fetch, PageClass, PageOutcome};
use crate::adapters::xdr::AlertApi;
use crate::config::{FetchConfig, QueryConfig};
use crate::core::flush::FlushManager;
use crate::domain::{Alert, ApiError, Result, SweepError};
use crate::log_page_completed;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex, Semaphore};

/// Numbers the driver needs from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// First page to request
    pub base_page: u32,
    /// Concurrent requests, also the stride between pages of a branch
    pub concurrency: usize,
    /// Alert count that marks a page as full
    pub page_size: usize,
}

impl FetchSettings {
    pub fn from_config(query: &QueryConfig, fetch: &FetchConfig) -> Self {
        Self {
            base_page: query.page_number,
            concurrency: fetch.max_concurrent_pages,
            page_size: fetch.page_size,
        }
    }
}

enum LoopEvent {
    Outcome(Option<PageOutcome>),
    Shutdown,
    SignalClosed,
    Spurious,
}

/// A page that could not be fetched
#[derive(Debug, Clone, PartialEq)]
pub struct PageError {
    pub page: u32,
    pub error: ApiError,
}

/// What the fetch phase did
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Pages whose alerts were stored
    pub pages_fetched: usize,
    pub pages_failed: usize,
    /// Alerts flushed and accumulated
    pub alerts_fetched: usize,
    /// Alerts that never reached the output because a flush failed
    pub alerts_discarded: usize,
    pub errors: Vec<PageError>,
    /// Shutdown was requested before the page space was exhausted
    pub interrupted: bool,
}

/// Bounded, self-feeding page walker
pub struct PaginationDriver {
    api: Arc<dyn AlertApi>,
    flush: Arc<FlushManager>,
    accumulator: Arc<Mutex<Vec<Alert>>>,
    settings: FetchSettings,
    shutdown: Option<watch::Receiver<bool>>,
}

impl PaginationDriver {
    /// Create a driver
    ///
    /// Every fetched alert is forwarded to `flush` and appended to
    /// `accumulator`.
    pub fn new(
        api: Arc<dyn AlertApi>,
        flush: Arc<FlushManager>,
        accumulator: Arc<Mutex<Vec<Alert>>>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            api,
            flush,
            accumulator,
            settings,
            shutdown: None,
        }
    }

    /// Stop spawning successors once `shutdown` flips to `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Walk the page space
    ///
    /// Page failures are recorded in the report and end only their branch.
    ///
    /// # Errors
    ///
    /// Returns the flush error if writing the output file fails. No
    /// successors are spawned after that, and fetches already in flight are
    /// drained before returning.
    pub async fn run(self) -> Result<FetchReport> {
        let cap = self.settings.concurrency.max(1);
        let stride = u32::try_from(cap)
            .map_err(|_| SweepError::Validation(format!("Concurrency {cap} is too large")))?;

        let semaphore = Arc::new(Semaphore::new(cap));
        let (tx, mut rx) = mpsc::channel::<PageOutcome>(cap);

        let mut shutdown = self.shutdown.clone();
        let mut report = FetchReport::default();
        let mut fatal: Option<SweepError> = None;
        let mut outstanding = 0usize;

        if shutdown.as_ref().is_some_and(|rx| *rx.borrow()) {
            tracing::warn!("Shutdown requested before fetching started");
            report.interrupted = true;
            return Ok(report);
        }

        tracing::info!(
            base_page = self.settings.base_page,
            concurrency = cap,
            page_size = self.settings.page_size,
            base_url = %self.api.base_url(),
            "Starting paginated fetch"
        );

        for offset in 0..stride {
            let Some(page) = self.settings.base_page.checked_add(offset) else {
                break;
            };
            self.spawn_fetch(page, &semaphore, &tx);
            outstanding += 1;
        }

        while outstanding > 0 {
            let event = match shutdown.as_mut() {
                Some(signal) if !report.interrupted => {
                    tokio::select! {
                        outcome = rx.recv() => LoopEvent::Outcome(outcome),
                        changed = signal.changed() => match changed {
                            Ok(()) if *signal.borrow() => LoopEvent::Shutdown,
                            Ok(()) => LoopEvent::Spurious,
                            Err(_) => LoopEvent::SignalClosed,
                        },
                    }
                }
                _ => LoopEvent::Outcome(rx.recv().await),
            };

            let outcome = match event {
                LoopEvent::Outcome(outcome) => outcome,
                LoopEvent::Shutdown => {
                    tracing::warn!(
                        in_flight = outstanding,
                        "Shutdown requested, draining in-flight pages"
                    );
                    report.interrupted = true;
                    continue;
                }
                LoopEvent::SignalClosed => {
                    // Sender gone; nobody can request shutdown any more
                    shutdown = None;
                    continue;
                }
                LoopEvent::Spurious => continue,
            };

            // Every spawned task sends exactly once and we still hold `tx`
            let Some(outcome) = outcome else {
                break;
            };
            outstanding -= 1;

            let class = outcome.classify(self.settings.page_size);
            let page = outcome.page;

            match outcome.result {
                Ok(alerts) => {
                    log_page_completed!(page, alerts.len(), class == PageClass::Full);
                    self.persist(page, alerts, &mut report, &mut fatal).await;

                    if class == PageClass::Full && fatal.is_none() && !report.interrupted {
                        match page.checked_add(stride) {
                            Some(next) => {
                                self.spawn_fetch(next, &semaphore, &tx);
                                outstanding += 1;
                            }
                            None => tracing::warn!(page = page, "Page number overflow"),
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(page = page, error = %error, "Failed to fetch page");
                    report.pages_failed += 1;
                    report.errors.push(PageError { page, error });
                }
            }
        }

        if let Some(e) = fatal {
            tracing::error!(
                pages_fetched = report.pages_fetched,
                alerts_kept = report.alerts_fetched,
                alerts_discarded = report.alerts_discarded,
                "Paginated fetch aborted"
            );
            return Err(e);
        }

        tracing::info!(
            pages_fetched = report.pages_fetched,
            pages_failed = report.pages_failed,
            alerts = report.alerts_fetched,
            interrupted = report.interrupted,
            "Paginated fetch finished"
        );

        Ok(report)
    }

    /// Hand a page to the flush manager and the accumulator
    ///
    /// Only pages whose alerts were stored count as fetched. After the first
    /// flush error every page is discarded.
    async fn persist(
        &self,
        page: u32,
        alerts: Vec<Alert>,
        report: &mut FetchReport,
        fatal: &mut Option<SweepError>,
    ) {
        let count = alerts.len();

        if fatal.is_some() {
            report.alerts_discarded += count;
            return;
        }

        if !alerts.is_empty() {
            if let Err(e) = self.flush.add_alerts(&alerts).await {
                tracing::error!(
                    page = page,
                    error = %e,
                    "Failed to persist alerts, aborting fetch"
                );
                report.alerts_discarded += count;
                *fatal = Some(e);
                return;
            }
            self.accumulator.lock().await.extend(alerts);
        }

        report.pages_fetched += 1;
        report.alerts_fetched += count;
    }

    fn spawn_fetch(&self, page: u32, semaphore: &Arc<Semaphore>, tx: &mpsc::Sender<PageOutcome>) {
        let api = Arc::clone(&self.api);
        let semaphore = Arc::clone(semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => AssertUnwindSafe(fetch(api.as_ref(), page))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| PageOutcome {
                        page,
                        result: Err(ApiError::Request(format!("Page {page} worker panicked"))),
                    }),
                Err(_) => PageOutcome {
                    page,
                    result: Err(ApiError::Request("Fetch semaphore closed".to_string())),
                },
            };

            // The aggregator only stops listening once nothing is outstanding
            let _ = tx.send(outcome).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::xdr::CloseRequest;
    use crate::config::{FetchConfig, QueryConfig};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct NoApi;

    #[async_trait]
    impl AlertApi for NoApi {
        async fn fetch_page(&self, _page: u32) -> std::result::Result<Vec<Alert>, ApiError> {
            Ok(Vec::new())
        }

        async fn close_alert(&self, _request: &CloseRequest) -> std::result::Result<(), ApiError> {
            Ok(())
        }

        fn base_url(&self) -> &str {
            "http://unused.invalid"
        }
    }

    fn alerts(count: usize) -> Vec<Alert> {
        (0..count)
            .map(|i| Alert::new(format!("a-{i}"), "t-1", "alert"))
            .collect()
    }

    fn driver(output: std::path::PathBuf) -> PaginationDriver {
        PaginationDriver::new(
            Arc::new(NoApi),
            Arc::new(FlushManager::new(output, 1)),
            Arc::new(Mutex::new(Vec::new())),
            FetchSettings {
                base_page: 1,
                concurrency: 2,
                page_size: 100,
            },
        )
    }

    #[tokio::test]
    async fn test_persist_counts_stored_pages() {
        let dir = TempDir::new().unwrap();
        let driver = driver(dir.path().join("alerts.json"));
        let mut report = FetchReport::default();
        let mut fatal = None;

        driver.persist(1, alerts(2), &mut report, &mut fatal).await;
        driver.persist(2, Vec::new(), &mut report, &mut fatal).await;

        assert!(fatal.is_none());
        assert_eq!(report.pages_fetched, 2);
        assert_eq!(report.alerts_fetched, 2);
        assert_eq!(report.alerts_discarded, 0);
        assert_eq!(driver.accumulator.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_persist_after_flush_failure_discards() {
        let dir = TempDir::new().unwrap();
        let driver = driver(dir.path().join("missing").join("alerts.json"));
        let mut report = FetchReport::default();
        let mut fatal = None;

        driver.persist(1, alerts(2), &mut report, &mut fatal).await;
        assert!(matches!(fatal, Some(SweepError::Persistence(_))));

        // A page still in flight when the output broke
        driver.persist(3, alerts(3), &mut report, &mut fatal).await;

        assert_eq!(report.pages_fetched, 0);
        assert_eq!(report.alerts_fetched, 0);
        assert_eq!(report.alerts_discarded, 5);
        assert!(driver.accumulator.lock().await.is_empty());
    }

    #[test]
    fn test_settings_from_config() {
        let query = QueryConfig {
            page_number: 7,
            ..Default::default()
        };
        let fetch = FetchConfig {
            max_concurrent_pages: 3,
            ..Default::default()
        };

        let settings = FetchSettings::from_config(&query, &fetch);
        assert_eq!(
            settings,
            FetchSettings {
                base_page: 7,
                concurrency: 3,
                page_size: 100
            }
        );
    }
}
