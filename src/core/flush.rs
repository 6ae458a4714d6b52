//! Streaming JSON output
//!
//! [`FlushManager`] buffers alerts and appends them to the output file in
//! batches so that memory stays bounded by the flush threshold rather than by
//! the size of the run. The file is a partial `{"Alerts": [...]}` document
//! between flushes and becomes valid JSON once [`FlushManager::finalize`]
//! writes the closing brackets.
//!
//! Layout, byte for byte:
//!
//! ```text
//! {
//!   "Alerts": [
//!     {
//!       "InternalID": "...",
//!       ...
//!     },
//!     {
//!       ...
//!     }
//!   ]
//! }
//! ```
//!
//! The layout does not depend on where the flush boundaries fall.

use crate::domain::{Alert, Result, SweepError};
use crate::log_flush;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const HEADER: &str = "{\n  \"Alerts\": [\n";
const FOOTER: &str = "\n  ]\n}\n";
const ITEM_INDENT: &str = "    ";

struct FlushState {
    pending: Vec<Alert>,
    total_flushed: usize,
    header_written: bool,
    finalized: bool,
}

/// Incremental writer for the streaming output file
///
/// All state sits behind one async mutex, so concurrent `add_alerts` calls
/// from fetch workers serialize and the file sees one writer at a time.
pub struct FlushManager {
    output_path: PathBuf,
    batch_threshold: usize,
    state: Mutex<FlushState>,
}

impl FlushManager {
    /// Create a manager; nothing touches the disk until the first flush
    pub fn new(output_path: impl Into<PathBuf>, batch_threshold: usize) -> Self {
        Self {
            output_path: output_path.into(),
            batch_threshold: batch_threshold.max(1),
            state: Mutex::new(FlushState {
                pending: Vec::new(),
                total_flushed: 0,
                header_written: false,
                finalized: false,
            }),
        }
    }

    /// Path of the output file
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Buffer alerts, flushing when the threshold is reached
    ///
    /// # Errors
    ///
    /// Returns an error if the manager was already finalized or the flush
    /// fails. A failed flush leaves every buffered alert in place.
    pub async fn add_alerts(&self, alerts: &[Alert]) -> Result<()> {
        let mut state = self.state.lock().await;

        if state.finalized {
            return Err(SweepError::Persistence(format!(
                "Cannot add alerts to {}: output already finalized",
                self.output_path.display()
            )));
        }

        state.pending.extend_from_slice(alerts);

        if state.pending.len() >= self.batch_threshold {
            self.flush_locked(&mut state, false).await?;
        }

        Ok(())
    }

    /// Flush the remainder and close the JSON document
    ///
    /// Returns the number of alerts written in total. A run that never added
    /// anything still produces `{"Alerts": []}` on disk.
    ///
    /// # Errors
    ///
    /// Returns an error on a second call, or if the write fails.
    pub async fn finalize(&self) -> Result<usize> {
        let mut state = self.state.lock().await;

        if state.finalized {
            return Err(SweepError::Persistence(format!(
                "Output {} already finalized",
                self.output_path.display()
            )));
        }

        self.flush_locked(&mut state, true).await?;
        state.finalized = true;

        tracing::info!(
            path = %self.output_path.display(),
            total = state.total_flushed,
            "Finalized output file"
        );

        Ok(state.total_flushed)
    }

    /// Alerts flushed plus alerts still buffered
    pub async fn current_total(&self) -> usize {
        let state = self.state.lock().await;
        state.total_flushed + state.pending.len()
    }

    async fn flush_locked(&self, state: &mut FlushState, close_document: bool) -> Result<()> {
        if state.pending.is_empty() && state.header_written && !close_document {
            return Ok(());
        }

        let mut chunk = String::new();
        if !state.header_written {
            chunk.push_str(HEADER);
        }

        for (i, alert) in state.pending.iter().enumerate() {
            if state.total_flushed + i > 0 {
                chunk.push_str(",\n");
            }
            let pretty = serde_json::to_string_pretty(alert).map_err(|e| {
                SweepError::Serialization(format!(
                    "Failed to encode alert {}: {e}",
                    alert.internal_id
                ))
            })?;
            chunk.push_str(ITEM_INDENT);
            chunk.push_str(&pretty.replace('\n', "\n    "));
        }

        if close_document {
            chunk.push_str(FOOTER);
        }

        self.write_chunk(&chunk, !state.header_written).await?;

        let count = state.pending.len();
        state.total_flushed += count;
        state.pending.clear();
        state.header_written = true;

        if count > 0 {
            log_flush!(self.output_path.display(), count, state.total_flushed);
        }

        Ok(())
    }

    async fn write_chunk(&self, chunk: &str, truncate: bool) -> Result<()> {
        let mut options = OpenOptions::new();
        if truncate {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true);
        }

        let mut file = options.open(&self.output_path).await.map_err(|e| {
            SweepError::Persistence(format!(
                "Failed to open {}: {e}",
                self.output_path.display()
            ))
        })?;

        file.write_all(chunk.as_bytes()).await.map_err(|e| {
            SweepError::Persistence(format!(
                "Failed to write {}: {e}",
                self.output_path.display()
            ))
        })?;

        file.flush().await.map_err(|e| {
            SweepError::Persistence(format!(
                "Failed to flush {}: {e}",
                self.output_path.display()
            ))
        })?;

        Ok(())
    }
}
