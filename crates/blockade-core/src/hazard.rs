//! Partitioned hazard-graph hand-off.
//!
//! The upstream graph builder thresholds zone distances against a radius and
//! splits zones by category. This module reads its output: a JSON document
//! with one adjacency graph per partition.
//!
//! ```json
//! {
//!   "radius": 1.5,
//!   "partitions": [
//!     { "name": "residential", "nodes": ["a", "b", "c"], "edges": [["a", "b"]] }
//!   ]
//! }
//! ```
//!
//! Node ids may be strings or non-negative integers.

use crate::{BlockadeError, Graph, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Node identifier as written by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Name(String),
    Index(u64),
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKey::Name(name) => f.write_str(name),
            NodeKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Raw partition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionSpec {
    pub name: String,
    pub nodes: Vec<NodeKey>,
    #[serde(default)]
    pub edges: Vec<(NodeKey, NodeKey)>,
}

/// Raw hazard-graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardGraphFile {
    /// Radius used to threshold distances into adjacency
    #[serde(default)]
    pub radius: Option<f64>,
    pub partitions: Vec<PartitionSpec>,
}

/// One categorical partition with its validated adjacency graph.
#[derive(Debug, Clone)]
pub struct Partition {
    pub name: String,
    pub graph: Graph,
}

impl PartitionSpec {
    /// Resolves node keys to arena indices and builds the partition graph.
    pub fn into_partition(self, radius: Option<f64>) -> Result<Partition> {
        let mut index: HashMap<&NodeKey, usize> = HashMap::with_capacity(self.nodes.len());
        for (i, key) in self.nodes.iter().enumerate() {
            if index.insert(key, i).is_some() {
                return Err(BlockadeError::validation(format!(
                    "partition '{}': duplicate node id '{}'",
                    self.name, key
                )));
            }
        }

        let mut graph = Graph::new(self.nodes.len());
        for (a, b) in &self.edges {
            let lookup = |key: &NodeKey| {
                index.get(key).copied().ok_or_else(|| {
                    BlockadeError::validation(format!(
                        "partition '{}': edge references unknown node '{}'",
                        self.name, key
                    ))
                })
            };
            let (u, v) = (lookup(a)?, lookup(b)?);
            if u == v {
                log::warn!(
                    "partition '{}': skipping self-loop on node '{}'",
                    self.name,
                    a
                );
                continue;
            }
            if !graph.add_edge(u, v) {
                log::debug!(
                    "partition '{}': duplicate edge ('{}', '{}') ignored",
                    self.name,
                    a,
                    b
                );
            }
        }

        let labels = self.nodes.iter().map(ToString::to_string).collect();
        let mut graph = graph.with_labels(labels);
        graph.radius = radius;

        Ok(Partition {
            name: self.name,
            graph,
        })
    }
}

impl HazardGraphFile {
    /// Validates the document and builds one graph per partition.
    pub fn into_partitions(self) -> Result<Vec<Partition>> {
        if let Some(r) = self.radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(BlockadeError::validation(format!(
                    "radius must be a positive finite number (got {})",
                    r
                )));
            }
        }

        let mut seen = HashSet::new();
        for spec in &self.partitions {
            if !seen.insert(spec.name.as_str()) {
                return Err(BlockadeError::validation(format!(
                    "duplicate partition name '{}'",
                    spec.name
                )));
            }
        }

        let radius = self.radius;
        self.partitions
            .into_iter()
            .map(|spec| spec.into_partition(radius))
            .collect()
    }
}

/// Parses a hazard-graph JSON document.
pub fn parse_hazard_json(content: &str) -> Result<Vec<Partition>> {
    let file: HazardGraphFile = serde_json::from_str(content)?;
    file.into_partitions()
}

/// Loads a hazard-graph JSON file.
pub fn load_hazard_file<P: AsRef<Path>>(path: P) -> Result<Vec<Partition>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let partitions = parse_hazard_json(&content)?;
    log::info!(
        "Loaded {} partition(s) from '{}'",
        partitions.len(),
        path.display()
    );
    Ok(partitions)
}
