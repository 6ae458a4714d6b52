//! External system integrations for xdr-sweep.
//!
//! - [`xdr`] - XDR alert API (page listing and alert closing)
//!
//! The pipeline talks to the API only through the [`xdr::AlertApi`] trait,
//! so the pagination driver and the close pipeline can be exercised against
//! in-process stubs.
//!
//! ```rust,no_run
//! use xdr_sweep::adapters::xdr::{AlertApi, HttpAlertApi};
//! use xdr_sweep::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xdr-sweep.toml")?;
//! let api = HttpAlertApi::new(&config.api, &config.query)?;
//! let first_page = api.fetch_page(1).await?;
//! println!("{} alerts on page 1", first_page.len());
//! # Ok(())
//! # }
//! ```

pub mod xdr;
