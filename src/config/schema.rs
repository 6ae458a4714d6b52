//! Configuration schema types
//!
//! This module defines the configuration structure for xdr-sweep.

use crate::config::SecretString;
use crate::core::filter::FieldFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main xdr-sweep configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// XDR API connection
    pub api: ApiConfig,

    /// Query filters sent with every page request
    pub query: QueryConfig,

    /// Pagination and streaming output
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Field filters applied after fetching
    #[serde(default)]
    pub filter: FilterConfig,

    /// Closing of filtered alerts
    #[serde(default)]
    pub close: CloseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SweepConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate(&self.environment)?;
        self.query.validate()?;
        self.fetch.validate()?;
        self.filter.validate()?;
        self.close.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print a line for every successfully closed alert
    #[serde(default)]
    pub verbose: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            verbose: false,
        }
    }
}

/// XDR API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the alerts endpoint, e.g. `https://host/xdr/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token
    /// Stored securely in memory and automatically zeroized on drop
    pub token: SecretString,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the tool to
    /// man-in-the-middle attacks. Rejected when `environment = "production"`.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl ApiConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        if self.token.expose_secret().is_blank() {
            return Err("api.token cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true' or use environment = \"development\" for lab servers."
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Per-request deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Query parameters sent with every page request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// First page to fetch (1-based)
    #[serde(default = "default_page_number")]
    pub page_number: u32,

    /// Tenant IDs (sent as repeated `tenantID`)
    pub tenant_ids: Vec<String>,

    /// Restrict to specific alert IDs (sent as repeated `id`)
    #[serde(default)]
    pub ids: Vec<String>,

    /// Start of time range (RFC 3339)
    #[serde(default)]
    pub from_date: Option<String>,

    /// End of time range (RFC 3339)
    #[serde(default)]
    pub to_date: Option<String>,

    /// Alert statuses (sent as repeated `status`)
    #[serde(default)]
    pub statuses: Vec<String>,

    /// Include original events in the response
    #[serde(default)]
    pub with_events: Option<bool>,

    /// Include affected assets in the response
    #[serde(default)]
    pub with_affected: Option<bool>,

    /// Include history records in the response
    #[serde(default)]
    pub with_history: Option<bool>,

    /// Additional raw query parameters appended verbatim
    #[serde(default)]
    pub extra_params: BTreeMap<String, String>,
}

impl QueryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_number == 0 {
            return Err("query.page_number must be >= 1".to_string());
        }

        if self.tenant_ids.iter().all(|t| t.trim().is_empty()) {
            return Err("query.tenant_ids cannot be empty".to_string());
        }

        for (key, value) in [("from_date", &self.from_date), ("to_date", &self.to_date)] {
            if let Some(date) = value {
                chrono::DateTime::parse_from_rfc3339(date).map_err(|e| {
                    format!("query.{key} '{date}' is not a valid RFC 3339 timestamp: {e}")
                })?;
            }
        }

        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            tenant_ids: vec![],
            ids: vec![],
            from_date: None,
            to_date: None,
            statuses: vec![],
            with_events: None,
            with_affected: None,
            with_history: None,
            extra_params: BTreeMap::new(),
        }
    }
}

/// Pagination and streaming output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Concurrent page requests; also the stride between pages of one branch
    #[serde(default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,

    /// Alerts per page the server returns when more data follows
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Flush the output file every N alerts
    #[serde(default = "default_flush_every")]
    pub flush_every: usize,

    /// Streaming output file
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

impl FetchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_pages == 0 || self.max_concurrent_pages > 500 {
            return Err(format!(
                "fetch.max_concurrent_pages must be between 1 and 500, got {}",
                self.max_concurrent_pages
            ));
        }

        if self.page_size == 0 {
            return Err("fetch.page_size must be > 0".to_string());
        }

        if self.flush_every == 0 {
            return Err("fetch.flush_every must be > 0".to_string());
        }

        if self.output_file.is_empty() {
            return Err("fetch.output_file cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: default_max_concurrent_pages(),
            page_size: default_page_size(),
            flush_every: default_flush_every(),
            output_file: default_output_file(),
        }
    }
}

/// Field filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Apply the rules below after fetching
    #[serde(default)]
    pub enabled: bool,

    /// File receiving the matching alerts
    #[serde(default = "default_filtered_output_file")]
    pub output_file: String,

    /// All rules must match (AND)
    #[serde(default)]
    pub rules: Vec<FieldFilter>,
}

impl FilterConfig {
    fn validate(&self) -> Result<(), String> {
        for rule in &self.rules {
            rule.target()?;
        }

        if self.enabled && self.output_file.is_empty() {
            return Err("filter.output_file cannot be empty when filtering is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_file: default_filtered_output_file(),
            rules: vec![],
        }
    }
}

/// Closing of filtered alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseConfig {
    /// Close every alert that matched the filters
    #[serde(default)]
    pub enabled: bool,

    /// Resolution reason sent to the API
    #[serde(default = "default_close_reason")]
    pub reason: String,

    /// Concurrent close requests
    #[serde(default = "default_close_concurrency")]
    pub max_concurrency: usize,

    /// Attempts per alert, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before retry N is N times this value
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

impl CloseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.reason.trim().is_empty() {
            return Err("close.reason cannot be empty".to_string());
        }

        if self.max_concurrency == 0 || self.max_concurrency > 100 {
            return Err(format!(
                "close.max_concurrency must be between 1 and 100, got {}",
                self.max_concurrency
            ));
        }

        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(format!(
                "close.max_attempts must be between 1 and 10, got {}",
                self.max_attempts
            ));
        }

        Ok(())
    }

    /// Delay unit for linear backoff
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            reason: default_close_reason(),
            max_concurrency: default_close_concurrency(),
            max_attempts: default_max_attempts(),
            backoff_unit_ms: default_backoff_unit_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".into());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://mydomain.com/xdr/api/v1".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_page_number() -> u32 {
    1
}

fn default_max_concurrent_pages() -> usize {
    50
}

fn default_page_size() -> usize {
    100
}

fn default_flush_every() -> usize {
    1000
}

fn default_output_file() -> String {
    "out.json".to_string()
}

fn default_filtered_output_file() -> String {
    "filtered.json".to_string()
}

fn default_close_reason() -> String {
    "falsePositive".to_string()
}

fn default_close_concurrency() -> usize {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_unit_ms() -> u64 {
    1000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
