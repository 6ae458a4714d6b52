//! Core business logic for xdr-sweep.
//!
//! # Modules
//!
//! - [`fetch`] - concurrent self-feeding pagination
//! - [`flush`] - streaming JSON output with batched flushes
//! - [`filter`] - `Section|Field` alert filters
//! - [`output`] - one-shot alert file output
//! - [`close`] - bounded close pipeline with retry
//! - [`sweep`] - orchestration and run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use xdr_sweep::config::load_config;
//! use xdr_sweep::core::sweep::SweepCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xdr-sweep.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = SweepCoordinator::new(config, shutdown_rx)?;
//! let summary = coordinator.execute().await?;
//!
//! println!("Alerts written: {}", summary.alerts_written);
//! println!("Failed pages: {}", summary.pages_failed);
//! # Ok(())
//! # }
//! ```

pub mod close;
pub mod fetch;
pub mod filter;
pub mod flush;
pub mod output;
pub mod sweep;
