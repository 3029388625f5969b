//! Graph input: DIMACS `.col` files or partitioned hazard-graph JSON.

use anyhow::{bail, Context, Result};
use blockade_core::{dimacs, hazard, Partition};
use std::path::Path;

/// Loads the partitions described by `path`, dispatching on its extension.
///
/// A DIMACS file becomes a single partition named after the file stem.
pub fn load_partitions(path: &str) -> Result<Vec<Partition>> {
    let file = Path::new(path);
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("col") => {
            log::info!("Loading graph from DIMACS file: {}", path);
            let graph = dimacs::parse_dimacs_file(path)
                .with_context(|| format!("Failed to parse DIMACS file '{}'", path))?;
            let name = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("graph")
                .to_string();
            Ok(vec![Partition { name, graph }])
        }
        Some("json") => {
            log::info!("Loading hazard graph from: {}", path);
            hazard::load_hazard_file(path)
                .with_context(|| format!("Failed to load hazard graph '{}'", path))
        }
        _ => bail!(
            "Unsupported input '{}': expected a .col or .json file",
            path
        ),
    }
}
