//! # xdr-sweep
//!
//! Bulk retrieval and triage of security alerts from an XDR API.
//!
//! ## Overview
//!
//! - **Fetch** every page of alerts concurrently, with a bounded worker pool
//!   that feeds itself: each full page schedules the next page of its branch
//! - **Stream** alerts into a JSON file in batches as they arrive
//! - **Filter** the fetched alerts with `Section|Field` substring rules
//! - **Close** the matching alerts with bounded concurrency and retry
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pagination, streaming output, filtering, closing, orchestration
//! - [`adapters`] - XDR API client
//! - [`domain`] - Alert model, errors and result alias
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xdr_sweep::config::load_config;
//! use xdr_sweep::core::sweep::SweepCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("xdr-sweep.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let summary = SweepCoordinator::new(config, shutdown_rx)?.execute().await?;
//!
//!     println!("Fetched {} alerts", summary.alerts_written);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
