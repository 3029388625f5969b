//! # blockade-geometry
//!
//! Realizes an adjacency graph as a unit-disk point set: adjacent vertices
//! end up closer than the blockade radius, non-adjacent ones farther apart.
//!
//! - [`Embedder`]: seeded first-fit placement with a per-vertex draw budget
//! - [`Embedding`]: the frozen, non-negative point set with its checks

pub mod embedder;
pub mod embedding;

pub use embedder::{check_radius, embed, Embedder, EmbedderConfig};
pub use embedding::{BoundingBox, Embedding, EmbeddingViolation, PlacedNode};
