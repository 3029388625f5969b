//! # blockade-core
//!
//! Core types, traits, and errors for the blockade coloring workspace.
//!
//! - **Types**: [`Graph`], [`Subgraph`], [`IndependentSet`], [`Coloring`], [`Point`]
//! - **Traits**: [`IndependentSetOracle`] and its per-call [`OracleBudget`]
//! - **Errors**: [`BlockadeError`] with the pipeline's failure policy
//! - **Input**: DIMACS `.col` and partitioned hazard-graph JSON loaders
//!
//! ## Architecture
//! ```text
//!        ┌──────────────────┐
//!        │  blockade-core   │  ← types / oracle trait / errors
//!        └──────────────────┘
//!           ▲            ▲
//!    ┌──────┴─────┐ ┌────┴───────────┐
//!    │  geometry  │ │     oracle     │
//!    └────────────┘ └────────────────┘
//!           ▲            ▲
//!           └─────┬──────┘
//!        ┌────────▼─────────┐
//!        │ blockade-pipeline│  ← recursive coloring engine
//!        └──────────────────┘
//! ```

pub mod dimacs;
pub mod errors;
pub mod hazard;
pub mod traits;
pub mod types;

pub use errors::{BlockadeError, Result};
pub use hazard::{HazardGraphFile, NodeKey, Partition, PartitionSpec};
pub use traits::{IndependentSetOracle, OracleBudget};
pub use types::{Coloring, Graph, IndependentSet, Point, Subgraph, VertexId};
