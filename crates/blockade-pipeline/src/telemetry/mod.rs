//! Telemetry events, one JSON object per line.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pipeline stage an event belongs to.
pub const STAGE_EMBED: &str = "embed";
pub const STAGE_COLOR: &str = "color";

/// Telemetry event emitted once per stage per partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// RFC 3339 timestamp
    pub timestamp: String,

    /// Stage name ("embed" or "color")
    pub stage: String,

    /// Partition name
    pub partition: String,

    /// Stage-specific metrics
    pub metrics: HashMap<String, f64>,

    /// "success" or "failed: <reason>"
    pub outcome: String,
}

impl TelemetryEvent {
    pub fn new(stage: &str, partition: &str, metrics: HashMap<String, f64>, outcome: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            stage: stage.to_string(),
            partition: partition.to_string(),
            metrics,
            outcome: outcome.into(),
        }
    }

    pub fn success(stage: &str, partition: &str, metrics: HashMap<String, f64>) -> Self {
        Self::new(stage, partition, metrics, "success")
    }

    pub fn failure(stage: &str, partition: &str, metrics: HashMap<String, f64>, reason: &dyn std::fmt::Display) -> Self {
        Self::new(stage, partition, metrics, format!("failed: {}", reason))
    }

    /// Serializes to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Buffered JSONL sink, appending to an existing file.
pub struct TelemetryWriter {
    path: String,
    writer: BufWriter<File>,
}

impl TelemetryWriter {
    /// Opens `path` for appending, creating parent directories if needed.
    pub fn create(path: &str) -> std::io::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        log::info!("Telemetry writer created: {}", path);
        Ok(Self {
            path: path.to_string(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Writes one event and flushes it.
    pub fn write(&mut self, event: &TelemetryEvent) -> std::io::Result<()> {
        let json = event
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()
    }
}
