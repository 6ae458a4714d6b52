//! HTTP implementation of [`AlertApi`]
//!
//! One reqwest client is shared by every fetch and close task. The client
//! timeout doubles as the per-request deadline.

use super::api::AlertApi;
use super::models::CloseRequest;
use super::query::{build_close_url, build_page_url};
use crate::config::{ApiConfig, QueryConfig, SecretString};
use crate::domain::{Alert, AlertsFile, ApiError, Result, SweepError};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// reqwest-backed XDR API client
pub struct HttpAlertApi {
    client: Client,
    base_url: String,
    token: SecretString,
    query: QueryConfig,
}

impl HttpAlertApi {
    /// Create a client from the `[api]` and `[query]` sections
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xdr_sweep::adapters::xdr::HttpAlertApi;
    /// use xdr_sweep::config::load_config;
    ///
    /// # fn example() -> xdr_sweep::domain::Result<()> {
    /// let config = load_config("xdr-sweep.toml")?;
    /// let api = HttpAlertApi::new(&config.api, &config.query)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api: &ApiConfig, query: &QueryConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(api.timeout())
            .connect_timeout(Duration::from_secs(api.timeout_seconds.min(30)));

        if !api.tls_verify {
            tracing::warn!(
                base_url = %api.base_url,
                "TLS certificate verification is disabled for the XDR API"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            SweepError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: api.base_url.clone(),
            token: api.token.clone(),
            query: query.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, self.token.expose_secret().bearer_header())
            .header(CONTENT_TYPE, "application/json")
    }
}

fn map_send_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(err.to_string())
    } else if err.is_builder() {
        ApiError::Request(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status { status, body }
}

#[async_trait]
impl AlertApi for HttpAlertApi {
    async fn fetch_page(&self, page: u32) -> std::result::Result<Vec<Alert>, ApiError> {
        let url = build_page_url(&self.base_url, &self.query, page)?;

        tracing::debug!(page = page, url = %url, "Fetching alert page");

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }

        let body = response.bytes().await.map_err(map_send_error)?;
        let decoded: AlertsFile =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(decoded.alerts)
    }

    async fn close_alert(&self, request: &CloseRequest) -> std::result::Result<(), ApiError> {
        let url = build_close_url(&self.base_url, &request.tenant_id)?;

        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
