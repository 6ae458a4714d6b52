//! Alert data model
//!
//! Alerts are decoded from one page response and never mutated afterwards.
//! JSON keys keep the exact casing the XDR API uses so that re-encoding an
//! alert produces the same document shape the server sent. Sections the
//! tool never inspects (assets, history, MITRE mappings, ...) are carried
//! as raw [`serde_json::Value`]s, and unknown top-level keys are kept in
//! [`Alert::additional`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Envelope used both by the page endpoint and by the output files
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlertsFile {
    #[serde(rename = "Alerts", default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
}

impl AlertsFile {
    /// Wrap a list of alerts
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }
}

/// A single security alert
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Alert {
    #[serde(rename = "Assets")]
    pub assets: Value,

    #[serde(rename = "Assignee", deserialize_with = "null_as_default")]
    pub assignee: Assignee,

    #[serde(rename = "CreatedAt", deserialize_with = "null_as_default")]
    pub created_at: String,

    #[serde(rename = "DetectionTechnologies")]
    pub detection_technologies: Value,

    #[serde(rename = "ExternalRef", deserialize_with = "null_as_default")]
    pub external_ref: String,

    #[serde(rename = "Extra")]
    pub extra: Value,

    #[serde(rename = "FirstEventTime", deserialize_with = "null_as_default")]
    pub first_event_time: String,

    #[serde(rename = "HistoryRecords")]
    pub history_records: Value,

    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: i64,

    #[serde(rename = "IncidentID", deserialize_with = "null_as_default")]
    pub incident_id: String,

    #[serde(rename = "IncidentLinkType", deserialize_with = "null_as_default")]
    pub incident_link_type: String,

    /// Stable identifier used when closing the alert
    #[serde(rename = "InternalID", deserialize_with = "null_as_default")]
    pub internal_id: String,

    #[serde(rename = "IsCII", deserialize_with = "null_as_default")]
    pub is_cii: bool,

    #[serde(rename = "LastEventTime", deserialize_with = "null_as_default")]
    pub last_event_time: String,

    #[serde(rename = "MITRETactics")]
    pub mitre_tactics: Value,

    #[serde(rename = "MITRETechniques")]
    pub mitre_techniques: Value,

    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "Observables", deserialize_with = "null_as_default")]
    pub observables: Vec<Observable>,

    #[serde(rename = "OriginalEvents", deserialize_with = "null_as_default")]
    pub original_events: Vec<OriginalEvent>,

    #[serde(rename = "Rules", deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,

    #[serde(rename = "Severity", deserialize_with = "null_as_default")]
    pub severity: String,

    #[serde(rename = "SourceCreatedAt", deserialize_with = "null_as_default")]
    pub source_created_at: String,

    #[serde(rename = "SourceID", deserialize_with = "null_as_default")]
    pub source_id: String,

    #[serde(rename = "Status", deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(rename = "StatusChangedAt", deserialize_with = "null_as_default")]
    pub status_changed_at: String,

    #[serde(rename = "StatusResolution", deserialize_with = "null_as_default")]
    pub status_resolution: String,

    #[serde(rename = "TenantID", deserialize_with = "null_as_default")]
    pub tenant_id: String,

    #[serde(rename = "UpdatedAt", deserialize_with = "null_as_default")]
    pub updated_at: String,

    /// Keys the model does not know about, preserved verbatim
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Alert {
    /// Minimal alert carrying only identity fields
    pub fn new(
        internal_id: impl Into<String>,
        tenant_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            internal_id: internal_id.into(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Assignee {
    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Observable {
    #[serde(rename = "Details", deserialize_with = "null_as_default")]
    pub details: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(rename = "Value", deserialize_with = "null_as_default")]
    pub value: String,
}

/// Correlated event that produced the alert
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OriginalEvent {
    /// Normalized event fields, free-form
    #[serde(rename = "N", deserialize_with = "null_as_default")]
    pub normalized: Map<String, Value>,
    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: i64,
    #[serde(rename = "EndTime", deserialize_with = "null_as_default")]
    pub end_time: i64,
    #[serde(rename = "Message", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "Priority", deserialize_with = "null_as_default")]
    pub priority: i64,
    #[serde(rename = "Severity", deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(rename = "TenantID", deserialize_with = "null_as_default")]
    pub tenant_id: String,
    #[serde(rename = "GroupedBy", deserialize_with = "null_as_default")]
    pub grouped_by: Vec<String>,
    #[serde(rename = "ServiceID", deserialize_with = "null_as_default")]
    pub service_id: String,
    #[serde(rename = "StartTime", deserialize_with = "null_as_default")]
    pub start_time: i64,
    #[serde(rename = "Timestamp", deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(rename = "BaseEvents", deserialize_with = "null_as_default")]
    pub base_events: Vec<BaseEvent>,
}

/// Raw sensor event underneath an original event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BaseEvent {
    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: i64,
    #[serde(rename = "EndTime", deserialize_with = "null_as_default")]
    pub end_time: i64,
    #[serde(rename = "Message", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "Priority", deserialize_with = "null_as_default")]
    pub priority: i64,
    #[serde(rename = "Severity", deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(rename = "TenantID", deserialize_with = "null_as_default")]
    pub tenant_id: String,
    #[serde(rename = "ServiceID", deserialize_with = "null_as_default")]
    pub service_id: String,
    #[serde(rename = "Timestamp", deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(rename = "ExternalID", deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(rename = "SourcePort", deserialize_with = "null_as_default")]
    pub source_port: i64,
    #[serde(rename = "ServiceName", deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(rename = "DeviceAction", deserialize_with = "null_as_default")]
    pub device_action: String,
    #[serde(rename = "DeviceVendor", deserialize_with = "null_as_default")]
    pub device_vendor: String,
    #[serde(rename = "DeviceAddress", deserialize_with = "null_as_default")]
    pub device_address: String,
    #[serde(rename = "DeviceProduct", deserialize_with = "null_as_default")]
    pub device_product: String,
    #[serde(rename = "SourceAddress", deserialize_with = "null_as_default")]
    pub source_address: String,
    #[serde(rename = "DeviceHostName", deserialize_with = "null_as_default")]
    pub device_host_name: String,
    #[serde(rename = "DeviceTimeZone", deserialize_with = "null_as_default")]
    pub device_time_zone: String,
    #[serde(rename = "DestinationPort", deserialize_with = "null_as_default")]
    pub destination_port: i64,
    #[serde(rename = "DeviceExternalID", deserialize_with = "null_as_default")]
    pub device_external_id: String,
    #[serde(rename = "DeviceReceiptTime", deserialize_with = "null_as_default")]
    pub device_receipt_time: i64,
    #[serde(rename = "TransportProtocol", deserialize_with = "null_as_default")]
    pub transport_protocol: String,
    #[serde(rename = "DestinationAddress", deserialize_with = "null_as_default")]
    pub destination_address: String,
    #[serde(rename = "DeviceEventClassID", deserialize_with = "null_as_default")]
    pub device_event_class_id: String,
    #[serde(rename = "ApplicationProtocol", deserialize_with = "null_as_default")]
    pub application_protocol: String,
    #[serde(rename = "DeviceEventCategory", deserialize_with = "null_as_default")]
    pub device_event_category: String,
}

/// Correlation rule that fired
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rule {
    #[serde(rename = "Confidence", deserialize_with = "null_as_default")]
    pub confidence: String,
    #[serde(rename = "Custom", deserialize_with = "null_as_default")]
    pub custom: bool,
    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "InternalID", deserialize_with = "null_as_default")]
    pub internal_id: String,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Severity", deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: String,
}

// The API sends `null` for empty lists and maps, and for unset scalars
// and records; all of them decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
