//! Scripted [`AlertApi`] used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use xdr_sweep::adapters::xdr::{AlertApi, CloseRequest};
use xdr_sweep::domain::{Alert, ApiError};

/// What a scripted page returns
#[derive(Debug, Clone)]
pub enum PageScript {
    Alerts(usize),
    Fail(ApiError),
}

/// In-memory XDR API with call recording
#[derive(Default)]
pub struct StubApi {
    pages: HashMap<u32, PageScript>,
    full_from: Option<u32>,
    close_scripts: Mutex<HashMap<String, VecDeque<Result<(), ApiError>>>>,
    delay: Duration,
    page_calls: Mutex<Vec<u32>>,
    close_calls: Mutex<Vec<(String, Instant)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page `page` returns `count` alerts
    pub fn page(mut self, page: u32, count: usize) -> Self {
        self.pages.insert(page, PageScript::Alerts(count));
        self
    }

    /// Page `page` fails with `error`
    pub fn failing_page(mut self, page: u32, error: ApiError) -> Self {
        self.pages.insert(page, PageScript::Fail(error));
        self
    }

    /// Unscripted pages from `page` on return 100 alerts
    pub fn endless_from(mut self, page: u32) -> Self {
        self.full_from = Some(page);
        self
    }

    /// Close responses for one alert, consumed in order; then success
    pub fn close_script(self, alert_id: &str, responses: Vec<Result<(), ApiError>>) -> Self {
        self.close_scripts
            .lock()
            .unwrap()
            .insert(alert_id.to_string(), responses.into());
        self
    }

    /// Time every call spends "on the wire"
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn page_calls(&self) -> Vec<u32> {
        let mut calls = self.page_calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }

    pub fn close_calls(&self, alert_id: &str) -> Vec<Instant> {
        self.close_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == alert_id)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn total_close_calls(&self) -> usize {
        self.close_calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// `count` alerts named after their page
pub fn page_alerts(page: u32, count: usize) -> Vec<Alert> {
    (0..count)
        .map(|i| {
            let mut alert = Alert::new(format!("p{page}-a{i}"), "tenant-1", format!("Alert {i}"));
            alert.id = i64::from(page) * 1000 + i as i64;
            alert
        })
        .collect()
}

#[async_trait]
impl AlertApi for StubApi {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Alert>, ApiError> {
        self.page_calls.lock().unwrap().push(page);
        self.enter().await;

        let script = match self.pages.get(&page) {
            Some(script) => script.clone(),
            None if self.full_from.is_some_and(|from| page >= from) => PageScript::Alerts(100),
            None => PageScript::Alerts(0),
        };

        self.leave();
        match script {
            PageScript::Alerts(count) => Ok(page_alerts(page, count)),
            PageScript::Fail(error) => Err(error),
        }
    }

    async fn close_alert(&self, request: &CloseRequest) -> Result<(), ApiError> {
        self.close_calls
            .lock()
            .unwrap()
            .push((request.id.clone(), Instant::now()));
        self.enter().await;

        let response = self
            .close_scripts
            .lock()
            .unwrap()
            .get_mut(&request.id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(()));

        self.leave();
        response
    }

    fn base_url(&self) -> &str {
        "http://stub.invalid/xdr/api/v1"
    }
}

pub fn status(code: u16) -> ApiError {
    ApiError::Status {
        status: code,
        body: format!("status {code}"),
    }
}

pub fn transport() -> ApiError {
    ApiError::Transport("connection reset by peer".to_string())
}
