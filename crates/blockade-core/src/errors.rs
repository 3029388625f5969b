//! Error types for blockade.
//!
//! Every fallible operation in the workspace returns [`BlockadeError`]. The
//! variants mirror the failure policy of the pipeline: placement and
//! configuration failures abort a run, an oracle timeout degrades at the
//! branch level, and an oracle contract breach is always fatal.

use crate::types::{Coloring, VertexId};
use thiserror::Error;

/// Unified error type for all blockade operations.
#[derive(Error, Debug)]
pub enum BlockadeError {
    /// The embedder exhausted its draw budget for a vertex.
    #[error("Placement infeasible for vertex {vertex} after {attempts} attempts")]
    PlacementInfeasible { vertex: VertexId, attempts: usize },

    /// A single oracle invocation exceeded its time budget.
    ///
    /// `partial` holds the assignment accumulated when the timeout surfaced.
    #[error(
        "Oracle timed out after {budget_ms} ms ({} of {} vertices colored)",
        .partial.assigned_count(),
        .partial.len()
    )]
    OracleTimeout { budget_ms: u64, partial: Coloring },

    /// An oracle returned a set that is not a valid candidate.
    #[error("Oracle '{oracle}' violated its contract: {message}")]
    OracleInvariantViolation { oracle: String, message: String },

    /// The adjacency radius and the embedding radius disagree.
    #[error(
        "Inconsistent configuration: adjacency radius {adjacency_radius} != embedding radius {embedding_radius}"
    )]
    InconsistentConfiguration {
        adjacency_radius: f64,
        embedding_radius: f64,
    },

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// I/O errors (graph files, telemetry, reports)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic errors (fallback)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlockadeError {
    /// Creates a placement failure for `vertex`.
    pub fn placement_infeasible(vertex: VertexId, attempts: usize) -> Self {
        BlockadeError::PlacementInfeasible { vertex, attempts }
    }

    /// Creates an oracle timeout with an empty partial assignment.
    ///
    /// The coloring engine attaches its own partial assignment with
    /// [`BlockadeError::with_partial`] before surfacing the error.
    pub fn oracle_timeout(budget_ms: u64) -> Self {
        BlockadeError::OracleTimeout {
            budget_ms,
            partial: Coloring::default(),
        }
    }

    /// Creates an oracle contract violation.
    pub fn invariant_violation(oracle: impl Into<String>, message: impl Into<String>) -> Self {
        BlockadeError::OracleInvariantViolation {
            oracle: oracle.into(),
            message: message.into(),
        }
    }

    /// Creates a radius mismatch error.
    pub fn inconsistent_radius(adjacency_radius: f64, embedding_radius: f64) -> Self {
        BlockadeError::InconsistentConfiguration {
            adjacency_radius,
            embedding_radius,
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        BlockadeError::ConfigError(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        BlockadeError::ValidationError(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        BlockadeError::Internal(message.into())
    }

    /// Replaces the partial assignment carried by an `OracleTimeout`.
    ///
    /// Other variants are returned unchanged.
    pub fn with_partial(self, assignment: &Coloring) -> Self {
        match self {
            BlockadeError::OracleTimeout { budget_ms, .. } => BlockadeError::OracleTimeout {
                budget_ms,
                partial: assignment.clone(),
            },
            other => other,
        }
    }

    /// Checks if this error can be absorbed at the branch level.
    ///
    /// Only oracle timeouts are recoverable; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BlockadeError::OracleTimeout { .. })
    }

    /// Returns a user-friendly error message with actionable guidance.
    pub fn user_message(&self) -> String {
        match self {
            BlockadeError::PlacementInfeasible { vertex, attempts } => {
                format!(
                    "Placement infeasible for vertex {} after {} attempts\n\
                     → Increase the placement bound or max placement iterations.\n\
                     → The graph may not be a unit-disk graph (e.g. it contains an induced K1,6).",
                    vertex, attempts
                )
            }
            BlockadeError::OracleTimeout { budget_ms, partial } => {
                format!(
                    "Oracle timed out after {} ms with {} of {} vertices colored\n\
                     → Raise oracle.timeout_ms or switch to the heuristic oracle for large partitions.",
                    budget_ms,
                    partial.assigned_count(),
                    partial.len()
                )
            }
            BlockadeError::InconsistentConfiguration {
                adjacency_radius,
                embedding_radius,
            } => {
                format!(
                    "The graph was built with radius {} but embedding was configured with radius {}\n\
                     → Use the same blockade radius for adjacency and embedding.",
                    adjacency_radius, embedding_radius
                )
            }
            BlockadeError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n\
                     → Review your configuration file and ensure numeric values are within valid ranges.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for blockade operations.
pub type Result<T> = std::result::Result<T, BlockadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = BlockadeError::placement_infeasible(4, 100);
        assert!(matches!(
            err,
            BlockadeError::PlacementInfeasible {
                vertex: 4,
                attempts: 100
            }
        ));

        let err = BlockadeError::invariant_violation("exact", "adjacent pair (0, 1)");
        assert!(err.to_string().contains("exact"));

        let err = BlockadeError::inconsistent_radius(1.0, 2.0);
        assert!(matches!(err, BlockadeError::InconsistentConfiguration { .. }));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(BlockadeError::oracle_timeout(50).is_recoverable());
        assert!(!BlockadeError::placement_infeasible(0, 1).is_recoverable());
        assert!(!BlockadeError::invariant_violation("h", "bad").is_recoverable());
        assert!(!BlockadeError::config("radius").is_recoverable());
    }

    #[test]
    fn test_timeout_carries_partial_assignment() {
        let mut partial = Coloring::new(3);
        partial.assign(0, 1);

        let err = BlockadeError::oracle_timeout(10).with_partial(&partial);
        match err {
            BlockadeError::OracleTimeout { budget_ms, partial } => {
                assert_eq!(budget_ms, 10);
                assert_eq!(partial.assigned_count(), 1);
                assert_eq!(partial.len(), 3);
            }
            other => panic!("Expected OracleTimeout, got {:?}", other),
        }
    }

    #[test]
    fn test_with_partial_leaves_other_variants() {
        let partial = Coloring::new(2);
        let err = BlockadeError::validation("bad edge").with_partial(&partial);
        assert!(matches!(err, BlockadeError::ValidationError(_)));
    }
}
