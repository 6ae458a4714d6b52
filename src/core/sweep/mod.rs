//! Run orchestration
//!
//! Fetch with streaming flush, finalize, filter, save the matches and close
//! them, then report.

pub mod coordinator;
pub mod summary;

pub use coordinator::SweepCoordinator;
pub use summary::{RunError, RunErrorKind, RunSummary};
