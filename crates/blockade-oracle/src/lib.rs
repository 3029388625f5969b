//! # blockade-oracle
//!
//! Independent-set oracles for the recursive coloring engine.
//!
//! Two strategies implement [`blockade_core::IndependentSetOracle`]:
//! [`ExactOracle`] enumerates maximum independent sets by branch-and-bound,
//! and [`HeuristicOracle`] samples a relaxed blockade energy and repairs the
//! outcomes with [`conflict_resolution`]. [`OracleConfig::build`] picks one.

pub mod conflict_resolution;
pub mod exact;
pub mod heuristic;
pub mod strategy;

pub use conflict_resolution::{into_independent_set, resolve_conflicts};
pub use exact::ExactOracle;
pub use heuristic::{HeuristicConfig, HeuristicOracle};
pub use strategy::{OracleConfig, OracleStrategy};
