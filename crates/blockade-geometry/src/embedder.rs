//! Unit-disk embedding by bounded randomized placement.
//!
//! Vertex 0 sits at the origin. Every later vertex, in enumeration order,
//! gets up to `max_iterations` uniform draws from `[-bound, bound]²`; the
//! first draw that respects the radius constraint against every placed
//! vertex is kept. There is no backtracking, so a poor early placement can
//! make a realizable graph fail. Once all vertices are placed the point set
//! is translated into the non-negative quadrant.

use crate::embedding::Embedding;
use blockade_core::{BlockadeError, Graph, Point, Result, VertexId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Relative margin kept between accepted distances and the radius, so the
/// final translation cannot round a pair across the threshold.
const RADIUS_MARGIN: f64 = 1e-9;

/// Embedder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Blockade radius R
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Placement bound B: draws come from [-B, B] x [-B, B]
    #[serde(default = "default_bound")]
    pub bound: f64,

    /// Draw budget M per vertex
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Seed for the placement RNG
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_radius() -> f64 {
    1.0
}
fn default_bound() -> f64 {
    4.0
}
fn default_max_iterations() -> usize {
    10_000
}
fn default_seed() -> u64 {
    42
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            bound: default_bound(),
            max_iterations: default_max_iterations(),
            seed: default_seed(),
        }
    }
}

impl EmbedderConfig {
    /// Validates configuration consistency.
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(BlockadeError::config(format!(
                "geometry radius must be positive and finite (got {})",
                self.radius
            )));
        }
        if !(self.bound.is_finite() && self.bound > 0.0) {
            return Err(BlockadeError::config(format!(
                "geometry bound must be positive and finite (got {})",
                self.bound
            )));
        }
        if self.max_iterations == 0 {
            return Err(BlockadeError::config("geometry max_iterations must be > 0"));
        }
        Ok(())
    }
}

/// Fails with `InconsistentConfiguration` when the graph records an
/// adjacency radius different from `radius`.
pub fn check_radius(graph: &Graph, radius: f64) -> Result<()> {
    match graph.radius {
        Some(adjacency_radius)
            if (adjacency_radius - radius).abs() > RADIUS_MARGIN * radius.abs().max(1.0) =>
        {
            Err(BlockadeError::inconsistent_radius(adjacency_radius, radius))
        }
        _ => Ok(()),
    }
}

/// Randomized unit-disk embedder.
#[derive(Debug, Clone)]
pub struct Embedder {
    config: EmbedderConfig,
}

impl Embedder {
    pub fn new(config: EmbedderConfig) -> Self {
        Self { config }
    }

    /// Embeds `graph` so adjacency coincides with distance below the radius.
    ///
    /// # Errors
    /// - `ConfigError` for a non-positive radius, bound, or draw budget
    /// - `InconsistentConfiguration` if the graph was built with another radius
    /// - `PlacementInfeasible` naming the first vertex that could not be placed
    pub fn embed(&self, graph: &Graph) -> Result<Embedding> {
        self.config.validate()?;
        check_radius(graph, self.config.radius)?;

        let EmbedderConfig {
            radius,
            bound,
            max_iterations,
            seed,
        } = self.config;

        log::info!(
            "Embedding {} vertices (radius={}, bound={}, max_iterations={}, seed={})",
            graph.num_vertices,
            radius,
            bound,
            max_iterations,
            seed
        );

        if graph.is_empty() {
            return Ok(Embedding::from_positions(radius, Vec::new()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut positions: Vec<Point> = Vec::with_capacity(graph.num_vertices);
        positions.push(Point::ORIGIN);

        for vertex in 1..graph.num_vertices {
            let draw = (1..=max_iterations).find_map(|attempt| {
                let candidate = Point::new(rng.gen_range(-bound..=bound), rng.gen_range(-bound..=bound));
                admissible(graph, vertex, &candidate, &positions, radius).then_some((attempt, candidate))
            });

            match draw {
                Some((attempt, position)) => {
                    log::debug!(
                        "Placed vertex {} at ({:.4}, {:.4}) after {} draw(s)",
                        vertex,
                        position.x,
                        position.y,
                        attempt
                    );
                    positions.push(position);
                }
                None => {
                    log::warn!(
                        "Vertex {} could not be placed within {} draws ({} already placed)",
                        vertex,
                        max_iterations,
                        positions.len()
                    );
                    return Err(BlockadeError::placement_infeasible(vertex, max_iterations));
                }
            }
        }

        shift_non_negative(&mut positions);

        let embedding = Embedding::from_positions(radius, positions);
        if let Some(bbox) = embedding.bounding_box() {
            log::info!(
                "Embedding complete: {} vertices in [{:.3}, {:.3}] x [{:.3}, {:.3}]",
                embedding.len(),
                bbox.min_x,
                bbox.max_x,
                bbox.min_y,
                bbox.max_y
            );
        }
        Ok(embedding)
    }
}

/// Embeds `graph` with radius `radius`, bound `bound`, and `max_iterations`
/// draws per vertex.
pub fn embed(
    graph: &Graph,
    radius: f64,
    bound: f64,
    max_iterations: usize,
    seed: u64,
) -> Result<Embedding> {
    Embedder::new(EmbedderConfig {
        radius,
        bound,
        max_iterations,
        seed,
    })
    .embed(graph)
}

/// Tests a candidate position for `vertex` against every placed vertex.
///
/// `placed[u]` is the frozen position of vertex `u`; all of them precede
/// `vertex` in enumeration order.
fn admissible(
    graph: &Graph,
    vertex: VertexId,
    candidate: &Point,
    placed: &[Point],
    radius: f64,
) -> bool {
    let margin = radius * RADIUS_MARGIN;
    placed.iter().enumerate().all(|(other, position)| {
        let distance = candidate.distance(position);
        if distance <= margin {
            // occupied
            return false;
        }
        if graph.are_adjacent(vertex, other) {
            distance < radius - margin
        } else {
            distance > radius + margin
        }
    })
}

/// Translates positions so the minimum x and y are non-negative.
fn shift_non_negative(positions: &mut [Point]) {
    let min_x = positions.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let dx = if min_x < 0.0 { -min_x } else { 0.0 };
    let dy = if min_y < 0.0 { -min_y } else { 0.0 };

    for p in positions.iter_mut() {
        p.x += dx;
        p.y += dy;
    }
}
