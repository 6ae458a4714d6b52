//! Integration tests for the self-feeding pagination driver
//!
//! These tests verify that:
//! - Branches advance by the concurrency stride and stop at short pages
//! - No more than `max_concurrent_pages` requests are in flight
//! - Failed pages end only their own branch
//! - Shutdown stops new pages and drains in-flight ones
//! - Output write failures abort the fetch

mod common;

use common::{status, StubApi};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{watch, Mutex};
use xdr_sweep::core::fetch::{FetchSettings, PaginationDriver};
use xdr_sweep::core::flush::FlushManager;
use xdr_sweep::core::output::load_alerts;
use xdr_sweep::domain::Alert;

struct Harness {
    api: Arc<StubApi>,
    flush: Arc<FlushManager>,
    accumulator: Arc<Mutex<Vec<Alert>>>,
    _dir: TempDir,
}

fn harness(api: StubApi) -> Harness {
    let dir = TempDir::new().unwrap();
    let flush = Arc::new(FlushManager::new(dir.path().join("alerts.json"), 50));
    Harness {
        api: Arc::new(api),
        flush,
        accumulator: Arc::new(Mutex::new(Vec::new())),
        _dir: dir,
    }
}

fn settings(concurrency: usize) -> FetchSettings {
    FetchSettings {
        base_page: 1,
        concurrency,
        page_size: 100,
    }
}

impl Harness {
    fn driver(&self, concurrency: usize) -> PaginationDriver {
        PaginationDriver::new(
            self.api.clone(),
            Arc::clone(&self.flush),
            Arc::clone(&self.accumulator),
            settings(concurrency),
        )
    }
}

#[tokio::test]
async fn test_fetch_stops_after_short_and_empty_pages() {
    let h = harness(StubApi::new().page(1, 100).page(2, 100).page(3, 50).page(4, 0));

    let report = h.driver(2).run().await.unwrap();
    let total = h.flush.finalize().await.unwrap();

    assert_eq!(report.alerts_fetched, 250);
    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.pages_failed, 0);
    assert!(!report.interrupted);
    assert_eq!(total, 250);
    assert_eq!(h.api.page_calls(), vec![1, 2, 3, 4]);
    assert_eq!(h.accumulator.lock().await.len(), 250);

    let written = load_alerts(h.flush.output_path()).await.unwrap();
    assert_eq!(written.len(), 250);
}

#[tokio::test]
async fn test_fetch_walks_every_branch_to_the_end() {
    // Nine full pages across three branches, each branch ends on an empty page
    let mut api = StubApi::new();
    for page in 1..=9 {
        api = api.page(page, 100);
    }
    let h = harness(api);

    let report = h.driver(3).run().await.unwrap();

    assert_eq!(report.alerts_fetched, 900);
    assert_eq!(h.api.page_calls(), (1..=12).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_partial_page_ends_only_its_branch() {
    // Page 2 is short, so page 4 on the same branch is never requested even
    // though the other branch keeps going.
    let h = harness(StubApi::new().page(1, 100).page(2, 10).page(3, 100).page(4, 100));

    let report = h.driver(2).run().await.unwrap();

    assert_eq!(h.api.page_calls(), vec![1, 2, 3, 5]);
    assert_eq!(report.alerts_fetched, 210);
}

#[tokio::test]
async fn test_in_flight_requests_are_bounded() {
    let mut api = StubApi::new().with_delay(Duration::from_millis(5));
    for page in 1..=40 {
        api = api.page(page, 100);
    }
    let h = harness(api);

    let report = h.driver(4).run().await.unwrap();

    assert_eq!(report.alerts_fetched, 4000);
    assert!(h.api.max_in_flight() <= 4);
    assert!(h.api.max_in_flight() >= 1);
}

#[tokio::test]
async fn test_failed_page_is_recorded_and_ends_branch() {
    let h = harness(
        StubApi::new()
            .page(1, 100)
            .failing_page(2, status(500))
            .page(3, 100),
    );

    let report = h.driver(1).run().await.unwrap();

    assert_eq!(h.api.page_calls(), vec![1, 2]);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].page, 2);
    assert_eq!(report.errors[0].error.status(), Some(500));
    assert_eq!(report.alerts_fetched, 100);
}

#[tokio::test]
async fn test_shutdown_stops_new_pages() {
    let h = harness(
        StubApi::new()
            .endless_from(1)
            .with_delay(Duration::from_millis(10)),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = h.driver(2).with_shutdown(shutdown_rx);
    let run = tokio::spawn(driver.run());

    tokio::time::sleep(Duration::from_millis(60)).await;
    shutdown_tx.send(true).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("driver did not stop after shutdown")
        .unwrap()
        .unwrap();

    assert!(report.interrupted);
    assert!(report.pages_fetched >= 1);
    assert_eq!(report.alerts_fetched, report.pages_fetched * 100);

    // Everything fetched before the signal made it to the output
    let total = h.flush.finalize().await.unwrap();
    assert_eq!(total, report.alerts_fetched);
}

#[tokio::test]
async fn test_shutdown_before_start_fetches_nothing() {
    let h = harness(StubApi::new().page(1, 100));
    let (_shutdown_tx, shutdown_rx) = watch::channel(true);

    let report = h.driver(2).with_shutdown(shutdown_rx).run().await.unwrap();

    assert!(report.interrupted);
    assert!(h.api.page_calls().is_empty());
}

#[tokio::test]
async fn test_output_failure_aborts_fetch() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-dir").join("alerts.json");

    let api = Arc::new(StubApi::new().endless_from(1));
    let flush = Arc::new(FlushManager::new(missing, 1));
    let driver = PaginationDriver::new(
        api.clone(),
        flush,
        Arc::new(Mutex::new(Vec::new())),
        settings(2),
    );

    let result = tokio::time::timeout(Duration::from_secs(5), driver.run())
        .await
        .expect("driver did not stop after write failure");

    assert!(result.is_err());
    // Only the seed pages were requested
    assert_eq!(api.page_calls(), vec![1, 2]);
}
