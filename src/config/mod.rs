//! Configuration management for xdr-sweep.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `XDR_SWEEP_*`
//! environment overrides, defaults for every optional setting and
//! validation on load.
//!
//! ```rust,no_run
//! use xdr_sweep::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xdr-sweep.toml")?;
//! println!("XDR API: {}", config.api.base_url);
//! println!("Concurrent pages: {}", config.fetch.max_concurrent_pages);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and verbosity
//! - [`ApiConfig`] - endpoint, token, timeout and TLS settings
//! - [`QueryConfig`] - tenants, statuses, time range and include flags
//! - [`FetchConfig`] - concurrency, page size and streaming output
//! - [`FilterConfig`] - `Section|Field` match rules
//! - [`CloseConfig`] - close reason, concurrency and retry policy
//! - [`LoggingConfig`] - optional local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://xdr.example.com/xdr/api/v1"
//! token = "${XDR_SWEEP_TOKEN}"
//!
//! [query]
//! tenant_ids = ["2b1c6a4e-0000-0000-0000-000000000001"]
//! statuses = ["new"]
//!
//! [fetch]
//! max_concurrent_pages = 50
//! flush_every = 1000
//! output_file = "out.json"
//!
//! [filter]
//! enabled = true
//! rules = [{ field = "Rule|Name", value = "port scan" }]
//!
//! [close]
//! enabled = false
//! reason = "falsePositive"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, CloseConfig, Environment, FetchConfig, FilterConfig,
    LoggingConfig, QueryConfig, SweepConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
