//! Core data types for unit-disk embedding and coloring.
//!
//! ## Identity
//! Vertices are arena indices ([`VertexId`]) into a [`Graph`]. External node
//! identifiers live in `Graph::labels` and never participate in the
//! algorithms; positions live in the embedding and never stand in for
//! identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Arena index of a vertex inside its [`Graph`].
pub type VertexId = usize;

/// Undirected, unweighted graph with a symmetric, irreflexive adjacency.
///
/// Neighbor lists are kept sorted and free of duplicates, so adjacency
/// queries are binary searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Number of vertices in the graph
    pub num_vertices: usize,

    /// Number of undirected edges
    pub num_edges: usize,

    /// Adjacency list representation: vertex -> sorted neighbors
    pub adjacency: Vec<Vec<VertexId>>,

    /// External node identifiers, indexed by vertex (empty when unlabeled)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Radius used upstream to threshold distances into adjacency, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Graph {
    /// Creates a new edgeless graph with the specified number of vertices.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            num_edges: 0,
            adjacency: vec![Vec::new(); num_vertices],
            labels: Vec::new(),
            radius: None,
        }
    }

    /// Builds a graph from an edge list.
    ///
    /// Self-loops and out-of-range endpoints are ignored, duplicates collapse.
    pub fn from_edges(num_vertices: usize, edges: &[(VertexId, VertexId)]) -> Self {
        let mut graph = Self::new(num_vertices);
        for &(u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Attaches external node identifiers.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Records the radius that defined adjacency upstream.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Adds an undirected edge between two vertices.
    ///
    /// Returns `false` (and leaves the graph unchanged) for self-loops,
    /// out-of-range vertices, and edges that already exist.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> bool {
        if u == v || u >= self.num_vertices || v >= self.num_vertices {
            return false;
        }
        match self.adjacency[u].binary_search(&v) {
            Ok(_) => false,
            Err(pos_u) => {
                self.adjacency[u].insert(pos_u, v);
                if let Err(pos_v) = self.adjacency[v].binary_search(&u) {
                    self.adjacency[v].insert(pos_v, u);
                }
                self.num_edges += 1;
                true
            }
        }
    }

    /// Returns true if `u` and `v` share an edge.
    pub fn are_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.adjacency
            .get(u)
            .map(|neighbors| neighbors.binary_search(&v).is_ok())
            .unwrap_or(false)
    }

    /// Iterates vertices in enumeration order.
    pub fn vertices(&self) -> std::ops::Range<VertexId> {
        0..self.num_vertices
    }

    /// Iterates each undirected edge once as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    /// External identifier of a vertex, falling back to its index.
    pub fn label(&self, vertex: VertexId) -> String {
        self.labels
            .get(vertex)
            .cloned()
            .unwrap_or_else(|| vertex.to_string())
    }

    /// Graph density: |E| / (|V| * (|V| - 1) / 2)
    pub fn density(&self) -> f64 {
        if self.num_vertices <= 1 {
            return 0.0;
        }
        (2.0 * self.num_edges as f64) / (self.num_vertices * (self.num_vertices - 1)) as f64
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    /// Checks the structural invariants of the adjacency relation.
    ///
    /// Graphs deserialized from untrusted input should pass through here
    /// before reaching the embedder or the coloring engine.
    pub fn validate(&self) -> crate::Result<()> {
        use crate::BlockadeError;

        if self.adjacency.len() != self.num_vertices {
            return Err(BlockadeError::validation(format!(
                "adjacency has {} rows but graph declares {} vertices",
                self.adjacency.len(),
                self.num_vertices
            )));
        }
        if !self.labels.is_empty() && self.labels.len() != self.num_vertices {
            return Err(BlockadeError::validation(format!(
                "{} labels for {} vertices",
                self.labels.len(),
                self.num_vertices
            )));
        }

        let mut degree_sum = 0;
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            if neighbors.windows(2).any(|w| w[0] >= w[1]) {
                return Err(BlockadeError::validation(format!(
                    "neighbors of vertex {} are not strictly sorted",
                    u
                )));
            }
            for &v in neighbors {
                if v == u {
                    return Err(BlockadeError::validation(format!("self-loop on vertex {}", u)));
                }
                if v >= self.num_vertices {
                    return Err(BlockadeError::validation(format!(
                        "vertex {} lists out-of-range neighbor {}",
                        u, v
                    )));
                }
                if self.adjacency[v].binary_search(&u).is_err() {
                    return Err(BlockadeError::validation(format!(
                        "edge ({}, {}) is not symmetric",
                        u, v
                    )));
                }
            }
            degree_sum += neighbors.len();
        }

        if degree_sum / 2 != self.num_edges {
            return Err(BlockadeError::validation(format!(
                "graph declares {} edges but adjacency holds {}",
                self.num_edges,
                degree_sum / 2
            )));
        }
        Ok(())
    }

    /// Forms the subgraph induced by `vertices`.
    pub fn induced<'g>(&'g self, vertices: impl IntoIterator<Item = VertexId>) -> Subgraph<'g> {
        Subgraph::new(self, vertices)
    }
}

/// Subgraph induced by a vertex subset of a parent [`Graph`].
///
/// Vertices keep their parent ids. `local_adjacency` re-indexes the induced
/// edges by position in `vertices`, which is what the oracles search over.
#[derive(Debug, Clone)]
pub struct Subgraph<'g> {
    graph: &'g Graph,
    vertices: Vec<VertexId>,
    local_adjacency: Vec<Vec<usize>>,
}

impl<'g> Subgraph<'g> {
    /// Induces the subgraph on `vertices`; out-of-range ids are dropped.
    pub fn new(graph: &'g Graph, vertices: impl IntoIterator<Item = VertexId>) -> Self {
        let mut vertices: Vec<VertexId> = vertices
            .into_iter()
            .filter(|&v| v < graph.num_vertices)
            .collect();
        vertices.sort_unstable();
        vertices.dedup();

        let local_adjacency = vertices
            .iter()
            .map(|&v| {
                graph.adjacency[v]
                    .iter()
                    .filter_map(|w| vertices.binary_search(w).ok())
                    .collect()
            })
            .collect();

        Self {
            graph,
            vertices,
            local_adjacency,
        }
    }

    /// The parent graph.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Member vertices (parent ids), ascending.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of member vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if `vertex` (parent id) belongs to the subgraph.
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.binary_search(&vertex).is_ok()
    }

    /// Neighbors of the member at local index `local`, as local indices.
    pub fn local_neighbors(&self, local: usize) -> &[usize] {
        &self.local_adjacency[local]
    }

    /// Parent id of the member at local index `local`.
    pub fn vertex_at(&self, local: usize) -> VertexId {
        self.vertices[local]
    }

    /// Number of induced edges.
    pub fn num_edges(&self) -> usize {
        self.local_adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Returns true if two member vertices (parent ids) are adjacent.
    pub fn are_adjacent(&self, u: VertexId, v: VertexId) -> bool {
        self.contains(u) && self.contains(v) && self.graph.are_adjacent(u, v)
    }
}

/// A candidate independent set, stored as ascending parent vertex ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndependentSet(Vec<VertexId>);

impl IndependentSet {
    /// Creates a set from arbitrary vertex ids (sorted and deduplicated).
    pub fn new(mut vertices: Vec<VertexId>) -> Self {
        vertices.sort_unstable();
        vertices.dedup();
        Self(vertices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[VertexId] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VertexId> {
        self.0.iter()
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.0.binary_search(&vertex).is_ok()
    }

    /// Returns the first adjacent pair inside the set, if any.
    pub fn find_conflict(&self, graph: &Graph) -> Option<(VertexId, VertexId)> {
        for (i, &u) in self.0.iter().enumerate() {
            for &v in &self.0[i + 1..] {
                if graph.are_adjacent(u, v) {
                    return Some((u, v));
                }
            }
        }
        None
    }

    /// Returns true if no two members are adjacent in `graph`.
    pub fn is_independent_in(&self, graph: &Graph) -> bool {
        self.find_conflict(graph).is_none()
    }
}

impl From<BTreeSet<VertexId>> for IndependentSet {
    fn from(set: BTreeSet<VertexId>) -> Self {
        Self(set.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a IndependentSet {
    type Item = &'a VertexId;
    type IntoIter = std::slice::Iter<'a, VertexId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Color assignment, vertex index -> color.
///
/// Colors are positive; `0` marks an unassigned vertex while the assignment
/// is still partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    /// Color per vertex (0 = unassigned)
    pub colors: Vec<usize>,
}

impl Coloring {
    /// Creates an empty (fully unassigned) coloring.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            colors: vec![0; num_vertices],
        }
    }

    /// Creates a coloring from a color vector.
    pub fn from_colors(colors: Vec<usize>) -> Self {
        Self { colors }
    }

    /// Number of vertices covered by this assignment (assigned or not).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Sets the color of a vertex.
    pub fn assign(&mut self, vertex: VertexId, color: usize) {
        self.colors[vertex] = color;
    }

    /// Sets every member of `set` to `color`.
    pub fn assign_set(&mut self, set: &IndependentSet, color: usize) {
        for &v in set {
            self.colors[v] = color;
        }
    }

    /// Color of a vertex, or `None` when unassigned.
    pub fn color(&self, vertex: VertexId) -> Option<usize> {
        match self.colors.get(vertex) {
            Some(&c) if c > 0 => Some(c),
            _ => None,
        }
    }

    /// Number of vertices with a color.
    pub fn assigned_count(&self) -> usize {
        self.colors.iter().filter(|&&c| c > 0).count()
    }

    /// Returns true when every vertex has a color.
    pub fn is_complete(&self) -> bool {
        self.colors.iter().all(|&c| c > 0)
    }

    /// Highest color index in use (0 for an empty assignment).
    pub fn num_colors(&self) -> usize {
        self.colors.iter().copied().max().unwrap_or(0)
    }

    /// Number of distinct colors in use.
    pub fn distinct_colors(&self) -> usize {
        self.colors
            .iter()
            .filter(|&&c| c > 0)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Counts edges whose endpoints share a color.
    ///
    /// Unassigned vertices never conflict.
    pub fn validate(&self, graph: &Graph) -> usize {
        graph
            .edges()
            .filter(|&(u, v)| self.colors[u] > 0 && self.colors[u] == self.colors[v])
            .count()
    }

    /// Returns true if the assignment is total and conflict-free on `graph`.
    pub fn is_proper(&self, graph: &Graph) -> bool {
        self.colors.len() == graph.num_vertices && self.is_complete() && self.validate(graph) == 0
    }

    /// Vertices grouped by color, index `c - 1` holding color `c`.
    pub fn classes(&self) -> Vec<Vec<VertexId>> {
        let mut classes = vec![Vec::new(); self.num_colors()];
        for (v, &c) in self.colors.iter().enumerate() {
            if c > 0 {
                classes[c - 1].push(v);
            }
        }
        classes
    }
}

/// Point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
