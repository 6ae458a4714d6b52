//! Field filters over fetched alerts
//!
//! A rule names a field as `Section|Field` and a value to look for. An alert
//! passes when every rule matches (AND). Matching is a case-insensitive
//! substring test. For list sections (`Observable`, `Rule`, `BaseEvent`) one
//! matching element is enough.
//!
//! | section     | fields                                                        |
//! |-------------|---------------------------------------------------------------|
//! | `Observable`| value, type, details                                          |
//! | `Rule`      | name, id, type, severity, confidence                          |
//! | `BaseEvent` | destinationaddress, sourceaddress, deviceaddress,             |
//! |             | devicehostname, deviceaction, devicevendor, deviceproduct,    |
//! |             | transportprotocol, applicationprotocol, message, name,        |
//! |             | destinationport, sourceport                                   |
//! | `Alert`     | name, severity, status, internalid, incidentid, externalref   |
//!
//! Field names are case-insensitive. An unknown field never matches.

use crate::config::FilterConfig;
use crate::domain::{Alert, BaseEvent, Observable, Rule};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Record type a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Observable,
    Rule,
    BaseEvent,
    Alert,
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Observable" => Ok(Section::Observable),
            "Rule" => Ok(Section::Rule),
            "BaseEvent" => Ok(Section::BaseEvent),
            "Alert" => Ok(Section::Alert),
            other => Err(format!(
                "Unknown filter section '{other}'. Must be one of: Observable, Rule, BaseEvent, Alert"
            )),
        }
    }
}

/// Parsed `Section|Field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTarget {
    pub section: Section,
    /// Lower-cased field name
    pub field: String,
}

/// One filter rule as written in the configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldFilter {
    /// `Section|Field`, e.g. `Rule|Name`
    pub field: String,
    /// Substring to look for
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parse the `Section|Field` reference
    ///
    /// # Errors
    ///
    /// Returns an error when the separator is missing or the section is
    /// unknown.
    pub fn target(&self) -> Result<FilterTarget, String> {
        let (section, field) = self.field.split_once('|').ok_or_else(|| {
            format!(
                "Invalid filter field '{}' (use 'Section|Field')",
                self.field
            )
        })?;

        let field = field.split('|').next().unwrap_or_default().trim();
        if field.is_empty() {
            return Err(format!("Filter field '{}' names no field", self.field));
        }

        Ok(FilterTarget {
            section: section.trim().parse()?,
            field: field.to_lowercase(),
        })
    }

    /// Whether `alert` satisfies this rule
    pub fn matches(&self, alert: &Alert) -> bool {
        let Ok(target) = self.target() else {
            return false;
        };
        let needle = self.value.to_lowercase();
        let field = target.field.as_str();

        match target.section {
            Section::Observable => alert
                .observables
                .iter()
                .any(|o| contains(observable_field(o, field), &needle)),
            Section::Rule => alert
                .rules
                .iter()
                .any(|r| contains(rule_field(r, field), &needle)),
            Section::BaseEvent => alert
                .original_events
                .iter()
                .flat_map(|e| e.base_events.iter())
                .any(|b| contains(base_event_field(b, field), &needle)),
            Section::Alert => contains(alert_field(alert, field), &needle),
        }
    }
}

/// Keep the alerts that satisfy every rule
///
/// Returns the input unchanged when filtering is disabled or no rules are
/// configured.
pub fn filter_alerts(alerts: Vec<Alert>, config: &FilterConfig) -> Vec<Alert> {
    if !config.enabled || config.rules.is_empty() {
        return alerts;
    }

    let total = alerts.len();
    let filtered: Vec<Alert> = alerts
        .into_iter()
        .filter(|alert| config.rules.iter().all(|rule| rule.matches(alert)))
        .collect();

    tracing::info!(
        matched = filtered.len(),
        total = total,
        rules = config.rules.len(),
        "Applied alert filters"
    );

    filtered
}

fn contains(haystack: Option<Cow<'_, str>>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}

fn observable_field<'a>(observable: &'a Observable, field: &str) -> Option<Cow<'a, str>> {
    let value: &str = match field {
        "value" => &observable.value,
        "type" => &observable.kind,
        "details" => &observable.details,
        _ => return None,
    };
    Some(Cow::Borrowed(value))
}

fn rule_field<'a>(rule: &'a Rule, field: &str) -> Option<Cow<'a, str>> {
    let value: &str = match field {
        "name" => &rule.name,
        "id" => &rule.id,
        "type" => &rule.kind,
        "severity" => &rule.severity,
        "confidence" => &rule.confidence,
        _ => return None,
    };
    Some(Cow::Borrowed(value))
}

fn base_event_field<'a>(event: &'a BaseEvent, field: &str) -> Option<Cow<'a, str>> {
    let value: &str = match field {
        "destinationaddress" => &event.destination_address,
        "sourceaddress" => &event.source_address,
        "deviceaddress" => &event.device_address,
        "devicehostname" => &event.device_host_name,
        "deviceaction" => &event.device_action,
        "devicevendor" => &event.device_vendor,
        "deviceproduct" => &event.device_product,
        "transportprotocol" => &event.transport_protocol,
        "applicationprotocol" => &event.application_protocol,
        "message" => &event.message,
        "name" => &event.name,
        "destinationport" => return Some(Cow::Owned(event.destination_port.to_string())),
        "sourceport" => return Some(Cow::Owned(event.source_port.to_string())),
        _ => return None,
    };
    Some(Cow::Borrowed(value))
}

fn alert_field<'a>(alert: &'a Alert, field: &str) -> Option<Cow<'a, str>> {
    let value: &str = match field {
        "name" => &alert.name,
        "severity" => &alert.severity,
        "status" => &alert.status,
        "internalid" => &alert.internal_id,
        "incidentid" => &alert.incident_id,
        "externalref" => &alert.external_ref,
        _ => return None,
    };
    Some(Cow::Borrowed(value))
}
