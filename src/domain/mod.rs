//! Domain models and types for xdr-sweep.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Alert model** ([`Alert`] and its nested records)
//! - **Error types** ([`SweepError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SweepError>`]:
//!
//! ```rust,no_run
//! use xdr_sweep::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = xdr_sweep::config::load_config("xdr-sweep.toml")?;
//!     println!("{}", config.api.base_url);
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use alert::{Alert, AlertsFile, Assignee, BaseEvent, Observable, OriginalEvent, Rule};
pub use errors::{ApiError, SweepError};
pub use result::Result;
