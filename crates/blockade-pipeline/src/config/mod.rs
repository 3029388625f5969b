//! Pipeline configuration and validation.

use blockade_core::{BlockadeError, Graph, Result};
use blockade_geometry::{check_radius, EmbedderConfig};
use blockade_oracle::OracleConfig;
use serde::{Deserialize, Serialize};

/// Maximum number of vertices per partition (safety guardrail).
pub const MAX_VERTICES: usize = 10000;

/// Full pipeline configuration, one field per TOML section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Embedding radius, bound, draw budget, and seed
    #[serde(default)]
    pub geometry: EmbedderConfig,

    /// Oracle strategy and parameters
    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub pipeline: RunSettings,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Evaluate candidates of one recursion level concurrently
    #[serde(default)]
    pub parallel_branches: bool,

    /// Maximum vertices allowed per partition
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,

    /// JSONL telemetry output (disabled when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry_path: Option<String>,
}

fn default_max_vertices() -> usize {
    MAX_VERTICES
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            parallel_branches: false,
            max_vertices: default_max_vertices(),
            telemetry_path: None,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Returns an error if any constraints are violated.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.oracle.validate()?;

        if self.pipeline.max_vertices == 0 {
            return Err(BlockadeError::config("max_vertices must be greater than 0"));
        }
        if self.pipeline.max_vertices > MAX_VERTICES {
            return Err(BlockadeError::config(format!(
                "max_vertices ({}) exceeds MAX_VERTICES ({})",
                self.pipeline.max_vertices, MAX_VERTICES
            )));
        }
        Ok(())
    }

    /// Checks a graph against the configured limits and radius.
    pub fn check_graph(&self, graph: &Graph) -> Result<()> {
        if graph.num_vertices > self.pipeline.max_vertices {
            return Err(BlockadeError::validation(format!(
                "graph has {} vertices, limit is {}",
                graph.num_vertices, self.pipeline.max_vertices
            )));
        }
        check_radius(graph, self.geometry.radius)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn geometry(mut self, geometry: EmbedderConfig) -> Self {
        self.config.geometry = geometry;
        self
    }

    pub fn oracle(mut self, oracle: OracleConfig) -> Self {
        self.config.oracle = oracle;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.config.geometry.radius = radius;
        self
    }

    pub fn parallel_branches(mut self, enabled: bool) -> Self {
        self.config.pipeline.parallel_branches = enabled;
        self
    }

    pub fn max_vertices(mut self, max: usize) -> Self {
        self.config.pipeline.max_vertices = max;
        self
    }

    pub fn telemetry_path(mut self, path: impl Into<String>) -> Self {
        self.config.pipeline.telemetry_path = Some(path.into());
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockade_oracle::OracleStrategy;

    #[test]
    fn test_default_config_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_vertices() {
        assert!(PipelineConfig::builder().max_vertices(0).build().is_err());
        assert!(PipelineConfig::builder()
            .max_vertices(MAX_VERTICES + 1)
            .build()
            .is_err());
    }

    #[test]
    fn test_invalid_sections_rejected() {
        assert!(matches!(
            PipelineConfig::builder().radius(-1.0).build(),
            Err(BlockadeError::ConfigError(_))
        ));
        let oracle = OracleConfig {
            timeout_ms: 0,
            ..OracleConfig::default()
        };
        assert!(PipelineConfig::builder().oracle(oracle).build().is_err());
    }

    #[test]
    fn test_check_graph() {
        let config = PipelineConfig::builder().radius(1.5).max_vertices(4).build().unwrap();
        assert!(config.check_graph(&Graph::new(4).with_radius(1.5)).is_ok());
        assert!(matches!(
            config.check_graph(&Graph::new(5)),
            Err(BlockadeError::ValidationError(_))
        ));
        assert!(matches!(
            config.check_graph(&Graph::new(2).with_radius(2.0)),
            Err(BlockadeError::InconsistentConfiguration { .. })
        ));
    }

    #[test]
    fn test_sections_deserialize_independently() {
        let json = r#"{
            "oracle": { "strategy": "heuristic", "shots": 64 },
            "pipeline": { "parallel_branches": true }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.oracle.strategy, OracleStrategy::Heuristic);
        assert_eq!(config.oracle.shots, 64);
        assert!(config.pipeline.parallel_branches);
        assert_eq!(config.pipeline.max_vertices, MAX_VERTICES);
        assert_eq!(config.geometry, EmbedderConfig::default());
    }
}
