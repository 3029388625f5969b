//! DIMACS graph file format parser.
//!
//! A DIMACS `.col` file carries a single partition's adjacency graph:
//! - Lines starting with 'c' are comments (ignored)
//! - Line starting with 'p edge N M' declares N vertices and M edges
//! - Lines starting with 'e U V' declare an edge between vertices U and V (1-indexed)
//!
//! ## Example
//! ```text
//! c Three hazard zones, pairwise within the blockade radius
//! p edge 3 3
//! e 1 2
//! e 2 3
//! e 1 3
//! ```
//!
//! Vertex labels are the 1-based DIMACS ids, so reports keep referring to
//! nodes by the identifiers found in the file.

use crate::{BlockadeError, Graph, Result};
use std::path::Path;

fn parse_error(line_num: usize, message: impl std::fmt::Display) -> BlockadeError {
    BlockadeError::validation(format!("line {}: {}", line_num + 1, message))
}

fn parse_count(token: &str, what: &str, line_num: usize) -> Result<usize> {
    token.parse::<usize>().map_err(|_| {
        parse_error(
            line_num,
            format!("Invalid {} '{}': must be a non-negative integer", what, token),
        )
    })
}

/// Parses DIMACS text into a [`Graph`].
///
/// Self-loops are skipped with a warning and duplicate edges collapse; a
/// mismatch between the declared and actual edge count is logged, not fatal.
pub fn parse_dimacs_str(content: &str) -> Result<Graph> {
    let mut graph: Option<Graph> = None;
    let mut num_edges_declared = 0;

    for (line_num, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "p" => {
                if graph.is_some() {
                    return Err(parse_error(line_num, "Duplicate problem line"));
                }
                if parts.len() < 4 {
                    return Err(parse_error(
                        line_num,
                        format!("Invalid problem line format: expected 'p edge N M', got '{}'", line),
                    ));
                }
                if parts[1] != "edge" {
                    return Err(parse_error(
                        line_num,
                        format!("Unsupported problem type '{}': only 'edge' is supported", parts[1]),
                    ));
                }

                let num_vertices = parse_count(parts[2], "vertex count", line_num)?;
                num_edges_declared = parse_count(parts[3], "edge count", line_num)?;

                let labels = (1..=num_vertices).map(|id| id.to_string()).collect();
                graph = Some(Graph::new(num_vertices).with_labels(labels));
            }
            "e" => {
                let graph = graph.as_mut().ok_or_else(|| {
                    parse_error(
                        line_num,
                        "Edge definition before problem line (expected 'p edge N M' first)",
                    )
                })?;

                if parts.len() < 3 {
                    return Err(parse_error(
                        line_num,
                        format!("Invalid edge line format: expected 'e U V', got '{}'", line),
                    ));
                }

                let mut endpoints = [0usize; 2];
                for (slot, token) in endpoints.iter_mut().zip(&parts[1..3]) {
                    let id = token.parse::<usize>().map_err(|_| {
                        parse_error(
                            line_num,
                            format!("Invalid vertex ID '{}': must be a positive integer", token),
                        )
                    })?;
                    if id == 0 || id > graph.num_vertices {
                        return Err(parse_error(
                            line_num,
                            format!("Vertex ID {} out of range [1, {}]", id, graph.num_vertices),
                        ));
                    }
                    *slot = id - 1;
                }

                let [u, v] = endpoints;
                if u == v {
                    log::warn!("Skipping self-loop on vertex {} at line {}", u + 1, line_num + 1);
                    continue;
                }
                graph.add_edge(u, v);
            }
            other => {
                log::debug!(
                    "Ignoring unknown DIMACS line type '{}' at line {}",
                    other,
                    line_num + 1
                );
            }
        }
    }

    let graph = graph.ok_or_else(|| {
        BlockadeError::validation("No problem line found in DIMACS input (expected 'p edge N M')")
    })?;

    if graph.num_edges != num_edges_declared {
        log::warn!(
            "DIMACS input declared {} edges but actual edge count is {} (after deduplication)",
            num_edges_declared,
            graph.num_edges
        );
    }

    Ok(graph)
}

/// Parses a DIMACS .col file into a [`Graph`].
///
/// ## Errors
/// - `BlockadeError::IoError`: file not found or unreadable
/// - `BlockadeError::ValidationError`: malformed problem or edge line
pub fn parse_dimacs_file<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let graph = parse_dimacs_str(&content)?;
    log::info!(
        "Loaded DIMACS graph '{}': {} vertices, {} edges",
        path.display(),
        graph.num_vertices,
        graph.num_edges
    );
    Ok(graph)
}
