//! Closing filtered alerts
//!
//! - [`retry`] - per-alert retry policy with linear backoff
//! - [`pipeline`] - bounded fan-out over every alert and outcome aggregation

pub mod pipeline;
pub mod retry;

pub use pipeline::{CloseOutcome, ClosePipeline, CloseSummary};
pub use retry::{close_with_retry, ClosePolicy};
