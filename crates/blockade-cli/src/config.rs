//! TOML configuration loading and command-line overrides.
//!
//! The file mirrors [`PipelineConfig`] section by section (`[geometry]`,
//! `[oracle]`, `[pipeline]`); omitted keys fall back to their defaults.

use anyhow::{Context, Result};
use blockade_oracle::OracleStrategy;
use blockade_pipeline::PipelineConfig;

/// Load configuration from TOML file
pub fn from_file(path: &str) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path))?;
    from_str(&content).with_context(|| format!("Invalid config file '{}'", path))
}

/// Parse configuration from TOML string
pub fn from_str(content: &str) -> Result<PipelineConfig> {
    Ok(toml::from_str(content)?)
}

/// Values given on the command line, applied over the file configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub radius: Option<f64>,
    pub oracle: Option<OracleStrategy>,
    pub candidates: Option<usize>,
    /// Seeds both the embedder and the oracle
    pub seed: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub parallel: bool,
    pub telemetry_path: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(radius) = self.radius {
            config.geometry.radius = radius;
        }
        if let Some(strategy) = self.oracle {
            config.oracle.strategy = strategy;
        }
        if let Some(candidates) = self.candidates {
            config.oracle.candidates = candidates;
        }
        if let Some(seed) = self.seed {
            config.geometry.seed = seed;
            config.oracle.seed = seed;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.oracle.timeout_ms = timeout_ms;
        }
        if self.parallel {
            config.pipeline.parallel_branches = true;
        }
        if let Some(path) = &self.telemetry_path {
            config.pipeline.telemetry_path = Some(path.clone());
        }
    }
}

/// Loads `path` (or defaults), applies `overrides`, and validates the result.
pub fn resolve(path: Option<&str>, overrides: &Overrides) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            from_file(path)?
        }
        None => PipelineConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;

    log::info!(
        "Configuration: radius={}, bound={}, max_iterations={}, oracle={} (K={}, timeout={}ms), parallel={}",
        config.geometry.radius,
        config.geometry.bound,
        config.geometry.max_iterations,
        config.oracle.strategy,
        config.oracle.candidates,
        config.oracle.timeout_ms,
        config.pipeline.parallel_branches
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_str(
            r#"
            [geometry]
            radius = 1.5

            [oracle]
            strategy = "heuristic"
            exact_limit = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.geometry.radius, 1.5);
        assert_eq!(config.geometry.bound, 4.0);
        assert_eq!(config.oracle.strategy, OracleStrategy::Heuristic);
        assert_eq!(config.oracle.exact_limit, Some(2));
        assert_eq!(config.oracle.candidates, 3);
        assert!(!config.pipeline.parallel_branches);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(from_str("[oracle]\nstrategy = \"quantum\"\n").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[oracle]\ncandidates = 5\nseed = 1\n\n[geometry]\nseed = 2").unwrap();

        let overrides = Overrides {
            candidates: Some(2),
            seed: Some(99),
            parallel: true,
            ..Overrides::default()
        };
        let config = resolve(file.path().to_str(), &overrides).unwrap();
        assert_eq!(config.oracle.candidates, 2);
        assert_eq!(config.oracle.seed, 99);
        assert_eq!(config.geometry.seed, 99);
        assert!(config.pipeline.parallel_branches);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let overrides = Overrides {
            timeout_ms: Some(0),
            ..Overrides::default()
        };
        assert!(resolve(None, &overrides).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = from_file("/nonexistent/blockade.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/blockade.toml"));
    }
}
