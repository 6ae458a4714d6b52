//! XDR API request models

use crate::domain::Alert;
use serde::{Deserialize, Serialize};

/// Body of `POST {base_url}/alerts/close`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloseRequest {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "TenantID")]
    pub tenant_id: String,

    #[serde(rename = "Reason")]
    pub reason: String,
}

impl CloseRequest {
    /// Build the close request for an alert
    ///
    /// The alert's `InternalID` is what the close endpoint expects as `ID`.
    pub fn for_alert(alert: &Alert, reason: impl Into<String>) -> Self {
        Self {
            id: alert.internal_id.clone(),
            tenant_id: alert.tenant_id.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_request_from_alert() {
        let alert = Alert::new("int-42", "tenant-7", "Suspicious login");
        let request = CloseRequest::for_alert(&alert, "falsePositive");

        assert_eq!(request.id, "int-42");
        assert_eq!(request.tenant_id, "tenant-7");
        assert_eq!(request.reason, "falsePositive");
    }

    #[test]
    fn test_close_request_wire_format() {
        let request = CloseRequest {
            id: "int-1".to_string(),
            tenant_id: "t-1".to_string(),
            reason: "falsePositive".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ID": "int-1", "TenantID": "t-1", "Reason": "falsePositive"})
        );
    }
}
