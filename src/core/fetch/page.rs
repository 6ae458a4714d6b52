//! Single page fetch and outcome classification

use crate::adapters::xdr::AlertApi;
use crate::domain::{Alert, ApiError};

/// How a page result steers pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    /// Exactly `page_size` alerts; the branch continues
    Full,
    /// Fewer alerts than `page_size`; the branch ends
    Partial,
    /// No alerts; the branch ends
    Empty,
    /// The request failed; the branch ends
    Failed,
}

/// Result of fetching one page
#[derive(Debug)]
pub struct PageOutcome {
    pub page: u32,
    pub result: Result<Vec<Alert>, ApiError>,
}

impl PageOutcome {
    /// Classify against the server's page size
    pub fn classify(&self, page_size: usize) -> PageClass {
        match &self.result {
            Err(_) => PageClass::Failed,
            Ok(alerts) if alerts.is_empty() => PageClass::Empty,
            Ok(alerts) if alerts.len() == page_size => PageClass::Full,
            Ok(_) => PageClass::Partial,
        }
    }
}

/// Fetch one page; never retries
pub async fn fetch(api: &dyn AlertApi, page: u32) -> PageOutcome {
    PageOutcome {
        page,
        result: api.fetch_page(page).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(count: usize) -> PageOutcome {
        PageOutcome {
            page: 1,
            result: Ok((0..count)
                .map(|i| Alert::new(format!("a-{i}"), "t", "n"))
                .collect()),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(outcome(100).classify(100), PageClass::Full);
        assert_eq!(outcome(99).classify(100), PageClass::Partial);
        assert_eq!(outcome(0).classify(100), PageClass::Empty);
        assert_eq!(outcome(5).classify(5), PageClass::Full);

        let failed = PageOutcome {
            page: 4,
            result: Err(ApiError::Timeout("60s".to_string())),
        };
        assert_eq!(failed.classify(100), PageClass::Failed);
    }

    #[test]
    fn test_oversized_page_is_not_full() {
        // Only an exact match continues the branch
        assert_eq!(outcome(101).classify(100), PageClass::Partial);
    }
}
