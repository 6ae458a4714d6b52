//! Alert API trait definition
//!
//! `AlertApi` is the seam between the pipeline and the network. The HTTP
//! implementation lives in [`super::client`]; tests provide scripted stubs.

use super::models::CloseRequest;
use crate::domain::{Alert, ApiError};
use async_trait::async_trait;

/// Operations the sweep needs from the XDR API
///
/// Implementations must be cheap to share across tasks (`Arc<dyn AlertApi>`)
/// and must not retry internally; retry policy belongs to the caller.
#[async_trait]
pub trait AlertApi: Send + Sync {
    /// Fetch one page of alerts
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for any status other than 200,
    /// [`ApiError::Transport`] or [`ApiError::Timeout`] when the request
    /// never completed, and [`ApiError::Decode`] for an unreadable body.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Alert>, ApiError>;

    /// Close a single alert
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for any non-2xx status, or a transport
    /// error when the request never completed.
    async fn close_alert(&self, request: &CloseRequest) -> Result<(), ApiError>;

    /// Base URL, for log context
    fn base_url(&self) -> &str;
}
