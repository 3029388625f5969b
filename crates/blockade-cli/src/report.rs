//! JSON report consumed by downstream plotting.

use anyhow::{Context, Result};
use blockade_pipeline::PartitionReport;
use serde::Serialize;
use std::io::Write;

/// Top-level report document.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub version: &'a str,
    pub partitions: &'a [PartitionReport],
}

/// Writes the report to `path`, or to stdout when `path` is `None`.
pub fn write_report(report: &RunReport<'_>, path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write report '{}'", path))?;
            log::info!("Report written to {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }
    }
    Ok(())
}

/// One human-readable line per partition.
pub fn summary_line(report: &PartitionReport) -> String {
    format!(
        "{}: {} vertices, {} edges -> {} colors [{} oracle, {} calls, {} skipped] in {:.1} ms",
        report.partition,
        report.num_vertices,
        report.num_edges,
        report.num_colors,
        report.oracle,
        report.stats.oracle_calls,
        report.stats.timeouts_skipped,
        report.elapsed_ms
    )
}
