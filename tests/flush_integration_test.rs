//! Integration tests for the streaming output file
//!
//! The on-disk document must not depend on where flush boundaries fall.

use test_case::test_case;
use tempfile::TempDir;
use xdr_sweep::core::flush::FlushManager;
use xdr_sweep::core::output::{load_alerts, save_alerts};
use xdr_sweep::domain::{Alert, Observable};

fn sample_alerts(count: usize) -> Vec<Alert> {
    (0..count)
        .map(|i| {
            let mut alert = Alert::new(format!("int-{i}"), "tenant-1", format!("Alert {i}"));
            alert.severity = "Medium".to_string();
            alert.observables = vec![Observable {
                kind: "ip".to_string(),
                value: format!("10.0.0.{i}"),
                details: String::new(),
            }];
            alert
        })
        .collect()
}

async fn stream(path: &std::path::Path, alerts: &[Alert], threshold: usize, chunk: usize) {
    let manager = FlushManager::new(path, threshold);
    for batch in alerts.chunks(chunk) {
        manager.add_alerts(batch).await.unwrap();
    }
    assert_eq!(manager.finalize().await.unwrap(), alerts.len());
}

#[test_case(1 ; "flush every alert")]
#[test_case(7 ; "uneven batches")]
#[test_case(23 ; "exact total")]
#[test_case(500 ; "single flush at finalize")]
#[tokio::test]
async fn test_output_is_independent_of_threshold(threshold: usize) {
    let dir = TempDir::new().unwrap();
    let alerts = sample_alerts(23);

    let reference = dir.path().join("reference.json");
    stream(&reference, &alerts, 1, 1).await;

    let streamed = dir.path().join("streamed.json");
    stream(&streamed, &alerts, threshold, 5).await;

    let expected = std::fs::read_to_string(&reference).unwrap();
    let actual = std::fs::read_to_string(&streamed).unwrap();
    assert_eq!(actual, expected);

    assert_eq!(load_alerts(&streamed).await.unwrap(), alerts);
}

#[tokio::test]
async fn test_streamed_output_matches_one_shot_save() {
    let dir = TempDir::new().unwrap();
    let alerts = sample_alerts(4);

    let streamed = dir.path().join("streamed.json");
    stream(&streamed, &alerts, 3, 2).await;

    let saved = dir.path().join("saved.json");
    save_alerts(&saved, &alerts).await.unwrap();

    let streamed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(streamed).unwrap()).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
    assert_eq!(streamed, saved);
}

#[tokio::test]
async fn test_output_overwrites_previous_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("alerts.json");
    std::fs::write(&path, "stale content from an earlier run").unwrap();

    stream(&path, &sample_alerts(2), 1, 1).await;

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("{\n  \"Alerts\": [\n"));
    assert!(!content.contains("stale"));
}

#[tokio::test]
async fn test_empty_run_writes_empty_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("alerts.json");

    let manager = FlushManager::new(&path, 10);
    assert_eq!(manager.finalize().await.unwrap(), 0);

    assert!(load_alerts(&path).await.unwrap().is_empty());
}
