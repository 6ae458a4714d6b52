//! Concurrent self-feeding pagination
//!
//! - [`page`] - one page request and its classification
//! - [`driver`] - the bounded worker pool that walks the page space

pub mod driver;
pub mod page;

pub use driver::{FetchReport, FetchSettings, PageError, PaginationDriver};
pub use page::{PageClass, PageOutcome};
