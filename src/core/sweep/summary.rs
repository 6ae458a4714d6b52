//! Run summary and reporting

use crate::core::close::CloseSummary;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of one sweep
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Pages that returned a decodable body
    pub pages_fetched: usize,

    /// Pages dropped after an API error
    pub pages_failed: usize,

    /// Alerts written to the streaming output file
    pub alerts_written: usize,

    /// Alerts that passed the filters (`None` when filtering is disabled)
    pub alerts_filtered: Option<usize>,

    /// Streaming output file
    pub output_file: PathBuf,

    /// Filtered output file, when one was written
    pub filtered_file: Option<PathBuf>,

    /// Close phase results, when the phase ran
    pub close: Option<CloseSummary>,

    /// Non-fatal errors
    pub errors: Vec<RunError>,

    /// Shutdown was requested during the fetch phase
    pub interrupted: bool,

    /// Wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            ..Default::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: RunError) {
        self.errors.push(error);
    }

    /// Every page was fetched and every close succeeded
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            pages_fetched = self.pages_fetched,
            pages_failed = self.pages_failed,
            alerts_written = self.alerts_written,
            alerts_filtered = ?self.alerts_filtered,
            closed = self.close.as_ref().map(|c| c.succeeded),
            close_failed = self.close.as_ref().map(|c| c.failed),
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            "Sweep completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Sweep completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    kind = ?error.kind,
                    context = error.context.as_deref().unwrap_or(""),
                    message = %error.message,
                    "Sweep error"
                );
            }
        }
    }
}

/// Where a non-fatal error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    /// A page request failed
    Fetch,
    /// An alert could not be closed
    Close,
}

/// Non-fatal error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub kind: RunErrorKind,
    pub message: String,
    /// e.g. `page=12` or `alert_id=...`
    pub context: Option<String>,
}

impl RunError {
    pub fn new(kind: RunErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_creation() {
        let summary = RunSummary::new("out.json");

        assert_eq!(summary.output_file, PathBuf::from("out.json"));
        assert_eq!(summary.pages_fetched, 0);
        assert!(summary.alerts_filtered.is_none());
        assert!(summary.close.is_none());
        assert!(summary.is_successful());
    }

    #[test]
    fn test_errors_make_run_unsuccessful() {
        let mut summary = RunSummary::new("out.json");
        summary.add_error(
            RunError::new(RunErrorKind::Fetch, "HTTP 500: boom".to_string())
                .with_context("page=3".to_string()),
        );

        assert!(!summary.is_successful());
        assert_eq!(summary.errors[0].context.as_deref(), Some("page=3"));
    }

    #[test]
    fn test_interrupted_run_is_unsuccessful() {
        let mut summary = RunSummary::new("out.json").with_duration(Duration::from_secs(4));
        summary.interrupted = true;

        assert!(!summary.is_successful());
        assert_eq!(summary.duration, Duration::from_secs(4));
    }
}
