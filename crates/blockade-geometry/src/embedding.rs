//! Embedded point sets and their unit-disk checks.

use blockade_core::{Graph, Point, VertexId};
use serde::{Deserialize, Serialize};

/// A vertex together with its frozen position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub vertex: VertexId,
    pub position: Point,
}

/// Axis-aligned bounds of an embedding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub area: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        let area = (max_x - min_x) * (max_y - min_y);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            area,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// First broken constraint found by [`Embedding::verify`].
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingViolation {
    /// Node count or order differs from the graph's enumeration
    Misaligned { index: usize, vertex: Option<VertexId> },
    /// Adjacent pair at distance >= radius
    AdjacentTooFar { u: VertexId, v: VertexId, distance: f64 },
    /// Non-adjacent pair at distance <= radius
    NonAdjacentTooClose { u: VertexId, v: VertexId, distance: f64 },
    /// Two vertices share a position
    Coincident { u: VertexId, v: VertexId },
    /// A coordinate is negative
    NegativeCoordinate { vertex: VertexId },
}

impl std::fmt::Display for EmbeddingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingViolation::Misaligned { index, vertex } => {
                write!(f, "slot {} holds vertex {:?}", index, vertex)
            }
            EmbeddingViolation::AdjacentTooFar { u, v, distance } => {
                write!(f, "adjacent ({}, {}) at distance {:.6}", u, v, distance)
            }
            EmbeddingViolation::NonAdjacentTooClose { u, v, distance } => {
                write!(f, "non-adjacent ({}, {}) at distance {:.6}", u, v, distance)
            }
            EmbeddingViolation::Coincident { u, v } => write!(f, "({}, {}) coincide", u, v),
            EmbeddingViolation::NegativeCoordinate { vertex } => {
                write!(f, "vertex {} has a negative coordinate", vertex)
            }
        }
    }
}

/// Realization of a graph as points in the plane.
///
/// `nodes[i].vertex == i`: the position sequence follows the graph's vertex
/// enumeration, and each entry carries its vertex id so downstream stages
/// never rely on order alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Blockade radius the embedding was built for
    pub radius: f64,
    pub nodes: Vec<PlacedNode>,
}

impl Embedding {
    /// Builds an embedding from positions listed in vertex order.
    pub fn from_positions(radius: f64, positions: Vec<Point>) -> Self {
        let nodes = positions
            .into_iter()
            .enumerate()
            .map(|(vertex, position)| PlacedNode { vertex, position })
            .collect();
        Self { radius, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of a vertex.
    pub fn position(&self, vertex: VertexId) -> Option<Point> {
        self.nodes
            .get(vertex)
            .filter(|node| node.vertex == vertex)
            .map(|node| node.position)
    }

    /// Positions in vertex order.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.nodes.iter().map(|node| node.position)
    }

    /// Bounds of all positions, `None` for an empty embedding.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.nodes.first()?.position;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in self.positions() {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some(BoundingBox::new(min_x, max_x, min_y, max_y))
    }

    /// Checks the unit-disk realization against `graph`.
    ///
    /// Returns the first violation in (u, v) lexicographic order.
    pub fn verify(&self, graph: &Graph) -> Result<(), EmbeddingViolation> {
        if self.nodes.len() != graph.num_vertices {
            return Err(EmbeddingViolation::Misaligned {
                index: self.nodes.len().min(graph.num_vertices),
                vertex: None,
            });
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.vertex != index {
                return Err(EmbeddingViolation::Misaligned {
                    index,
                    vertex: Some(node.vertex),
                });
            }
            if node.position.x < 0.0 || node.position.y < 0.0 {
                return Err(EmbeddingViolation::NegativeCoordinate { vertex: index });
            }
        }

        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                let (u, v) = (a.vertex, b.vertex);
                let distance = a.position.distance(&b.position);
                if distance == 0.0 {
                    return Err(EmbeddingViolation::Coincident { u, v });
                }
                if graph.are_adjacent(u, v) {
                    if distance >= self.radius {
                        return Err(EmbeddingViolation::AdjacentTooFar { u, v, distance });
                    }
                } else if distance <= self.radius {
                    return Err(EmbeddingViolation::NonAdjacentTooClose { u, v, distance });
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the unit-disk graph of the point set at the embedding radius.
    pub fn induced_graph(&self) -> Graph {
        let mut graph = Graph::new(self.nodes.len()).with_radius(self.radius);
        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                if a.position.distance(&b.position) < self.radius {
                    graph.add_edge(a.vertex, b.vertex);
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Embedding {
        Embedding::from_positions(
            1.0,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.5, 0.0),
                Point::new(0.25, 0.4),
            ],
        )
    }

    #[test]
    fn test_verify_accepts_valid_triangle() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(unit_triangle().verify(&graph), Ok(()));
        assert_eq!(unit_triangle().induced_graph().adjacency, graph.adjacency);
    }

    #[test]
    fn test_verify_reports_missing_edge() {
        // Points are all within radius, but the graph has no 0-2 edge.
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)]);
        match unit_triangle().verify(&graph) {
            Err(EmbeddingViolation::NonAdjacentTooClose { u: 0, v: 2, .. }) => {}
            other => panic!("Expected NonAdjacentTooClose(0, 2), got {:?}", other),
        }
    }

    #[test]
    fn test_verify_reports_negative_and_coincident() {
        let graph = Graph::from_edges(2, &[(0, 1)]);

        let negative = Embedding::from_positions(1.0, vec![Point::new(-0.1, 0.0), Point::ORIGIN]);
        assert_eq!(
            negative.verify(&graph),
            Err(EmbeddingViolation::NegativeCoordinate { vertex: 0 })
        );

        let stacked = Embedding::from_positions(1.0, vec![Point::ORIGIN, Point::ORIGIN]);
        assert_eq!(
            stacked.verify(&graph),
            Err(EmbeddingViolation::Coincident { u: 0, v: 1 })
        );
    }

    #[test]
    fn test_verify_reports_misordered_nodes() {
        let graph = Graph::new(2);
        let mut embedding =
            Embedding::from_positions(1.0, vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
        embedding.nodes.swap(0, 1);
        assert!(matches!(
            embedding.verify(&graph),
            Err(EmbeddingViolation::Misaligned { index: 0, .. })
        ));
        assert_eq!(embedding.position(0), None);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = unit_triangle().bounding_box().unwrap();
        assert_eq!(bbox.min_x, 0.0);
        assert_eq!(bbox.max_x, 0.5);
        assert!((bbox.area - 0.2).abs() < 1e-12);
        assert!(Embedding::from_positions(1.0, Vec::new()).bounding_box().is_none());
    }
}
