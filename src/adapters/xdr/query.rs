//! Request URL construction
//!
//! Query parameter order: `page`, `id`, `tenantID`, `from`, `to`, `status`,
//! the three include flags, then `extra_params` in key order.

use crate::config::QueryConfig;
use crate::domain::ApiError;
use url::Url;

/// Build the listing URL for one page
///
/// # Errors
///
/// Returns [`ApiError::Request`] if `base_url` is not an absolute URL.
pub fn build_page_url(base_url: &str, query: &QueryConfig, page: u32) -> Result<Url, ApiError> {
    let mut url = parse_base(base_url)?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", &page.to_string());

        for id in &query.ids {
            pairs.append_pair("id", id);
        }
        for tenant in &query.tenant_ids {
            pairs.append_pair("tenantID", tenant);
        }
        if let Some(from) = &query.from_date {
            pairs.append_pair("from", from);
        }
        if let Some(to) = &query.to_date {
            pairs.append_pair("to", to);
        }
        for status in &query.statuses {
            pairs.append_pair("status", status);
        }

        let flags = [
            ("withEvents", query.with_events),
            ("withAffected", query.with_affected),
            ("withHistory", query.with_history),
        ];
        for (name, flag) in flags {
            if let Some(value) = flag {
                pairs.append_pair(name, if value { "true" } else { "false" });
            }
        }

        for (key, value) in &query.extra_params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Build `{base_url}/alerts/close?tenantID={tenant}`
///
/// # Errors
///
/// Returns [`ApiError::Request`] if `base_url` is not an absolute URL.
pub fn build_close_url(base_url: &str, tenant_id: &str) -> Result<Url, ApiError> {
    let endpoint = format!("{}/alerts/close", base_url.trim_end_matches('/'));
    let mut url = parse_base(&endpoint)?;
    url.query_pairs_mut().append_pair("tenantID", tenant_id);
    Ok(url)
}

fn parse_base(base_url: &str) -> Result<Url, ApiError> {
    Url::parse(base_url)
        .map_err(|e| ApiError::Request(format!("Invalid base URL '{base_url}': {e}")))
}
