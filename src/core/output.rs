//! One-shot output of a complete alert list

use crate::domain::{Alert, AlertsFile, Result, SweepError};
use serde::Serialize;
use std::path::Path;

/// Write `{"Alerts": [...]}` as two-space indented JSON, replacing the file
///
/// # Errors
///
/// Returns a persistence error if the file cannot be written.
pub async fn save_alerts(path: impl AsRef<Path>, alerts: &[Alert]) -> Result<()> {
    #[derive(Serialize)]
    struct AlertsRef<'a> {
        #[serde(rename = "Alerts")]
        alerts: &'a [Alert],
    }

    let path = path.as_ref();
    let body = serde_json::to_vec_pretty(&AlertsRef { alerts })?;

    tokio::fs::write(path, body).await.map_err(|e| {
        SweepError::Persistence(format!("Failed to write {}: {e}", path.display()))
    })?;

    tracing::info!(
        path = %path.display(),
        count = alerts.len(),
        "Saved alerts"
    );

    Ok(())
}

/// Read a file written by [`save_alerts`] or the streaming writer
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not an alerts document.
pub async fn load_alerts(path: impl AsRef<Path>) -> Result<Vec<Alert>> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path).await.map_err(|e| {
        SweepError::Persistence(format!("Failed to read {}: {e}", path.display()))
    })?;
    let file: AlertsFile = serde_json::from_slice(&raw)?;
    Ok(file.alerts)
}
