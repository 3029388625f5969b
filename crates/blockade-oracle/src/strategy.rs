//! Oracle selection by configuration.

use crate::exact::ExactOracle;
use crate::heuristic::{HeuristicConfig, HeuristicOracle};
use blockade_core::{BlockadeError, IndependentSetOracle, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which independent-set oracle drives the coloring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleStrategy {
    /// Branch-and-bound maximum independent sets
    #[default]
    Exact,
    /// Annealing followed by frequency-ranked sampling
    Heuristic,
}

impl fmt::Display for OracleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleStrategy::Exact => write!(f, "exact"),
            OracleStrategy::Heuristic => write!(f, "heuristic"),
        }
    }
}

impl FromStr for OracleStrategy {
    type Err = BlockadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(OracleStrategy::Exact),
            "heuristic" => Ok(OracleStrategy::Heuristic),
            other => Err(BlockadeError::config(format!(
                "unknown oracle strategy '{}' (expected 'exact' or 'heuristic')",
                other
            ))),
        }
    }
}

/// `[oracle]` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub strategy: OracleStrategy,

    /// Candidate sets requested per call (K)
    #[serde(default = "default_candidates")]
    pub candidates: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Per-call wall-clock budget
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cap on maximum sets returned by the exact oracle; falls back to `candidates`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_limit: Option<usize>,

    #[serde(default = "default_sweeps")]
    pub sweeps: usize,

    #[serde(default = "default_shots")]
    pub shots: usize,

    #[serde(default = "default_penalty")]
    pub penalty: f64,

    #[serde(default = "default_temp_start")]
    pub temp_start: f64,

    #[serde(default = "default_temp_end")]
    pub temp_end: f64,
}

fn default_candidates() -> usize {
    3
}
fn default_seed() -> u64 {
    7
}
fn default_timeout_ms() -> u64 {
    5_000
}
fn default_sweeps() -> usize {
    200
}
fn default_shots() -> usize {
    256
}
fn default_penalty() -> f64 {
    2.0
}
fn default_temp_start() -> f64 {
    2.0
}
fn default_temp_end() -> f64 {
    0.05
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            strategy: OracleStrategy::default(),
            candidates: default_candidates(),
            seed: default_seed(),
            timeout_ms: default_timeout_ms(),
            exact_limit: None,
            sweeps: default_sweeps(),
            shots: default_shots(),
            penalty: default_penalty(),
            temp_start: default_temp_start(),
            temp_end: default_temp_end(),
        }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(BlockadeError::config("oracle timeout_ms must be > 0"));
        }
        if self.exact_limit == Some(0) {
            return Err(BlockadeError::config("oracle exact_limit must be > 0"));
        }
        // Heuristic parameters are checked regardless of strategy so a
        // config file stays valid when only the strategy is switched.
        self.heuristic_config().validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn heuristic_config(&self) -> HeuristicConfig {
        HeuristicConfig {
            candidates: self.candidates,
            seed: self.seed,
            sweeps: self.sweeps,
            shots: self.shots,
            penalty: self.penalty,
            temp_start: self.temp_start,
            temp_end: self.temp_end,
        }
    }

    /// Instantiates the configured oracle.
    pub fn build(&self) -> Result<Box<dyn IndependentSetOracle>> {
        self.validate()?;
        let oracle: Box<dyn IndependentSetOracle> = match self.strategy {
            OracleStrategy::Exact => {
                Box::new(ExactOracle::new(self.exact_limit.unwrap_or(self.candidates)))
            }
            OracleStrategy::Heuristic => Box::new(HeuristicOracle::new(self.heuristic_config())),
        };
        log::info!(
            "Oracle: {} (K={}, timeout={}ms)",
            oracle.name(),
            self.candidates,
            self.timeout_ms
        );
        Ok(oracle)
    }
}
