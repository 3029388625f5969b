//! Oracle seam between the coloring engine and independent-set solvers.

use crate::errors::{BlockadeError, Result};
use crate::types::{IndependentSet, Subgraph};
use std::time::{Duration, Instant};

/// Source of candidate independent sets.
///
/// Implementations must uphold, for every returned set `S` on a non-empty
/// subgraph: `S` is non-empty, every member belongs to the subgraph, and no
/// two members are adjacent. An empty subgraph yields an empty sequence.
///
/// Oracles take `&self` so one instance can serve concurrently evaluated
/// branches; any randomness must be derived per call.
pub trait IndependentSetOracle: Send + Sync {
    /// Short strategy name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns up to the configured number of candidate sets for `subgraph`.
    ///
    /// Long-running searches poll `budget` and return
    /// [`BlockadeError::OracleTimeout`] once it is exhausted.
    fn produce_candidates(
        &self,
        subgraph: &Subgraph<'_>,
        budget: &OracleBudget,
    ) -> Result<Vec<IndependentSet>>;
}

impl<T: IndependentSetOracle + ?Sized> IndependentSetOracle for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn produce_candidates(
        &self,
        subgraph: &Subgraph<'_>,
        budget: &OracleBudget,
    ) -> Result<Vec<IndependentSet>> {
        (**self).produce_candidates(subgraph, budget)
    }
}

/// Wall-clock budget for a single oracle invocation.
///
/// Cancellation is cooperative: oracles call [`OracleBudget::check`] at
/// their natural loop boundaries.
#[derive(Debug, Clone, Copy)]
pub struct OracleBudget {
    started: Instant,
    timeout: Option<Duration>,
}

impl OracleBudget {
    /// Starts a budget of `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout: Some(timeout),
        }
    }

    /// A budget that never expires.
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            timeout: None,
        }
    }

    /// Time spent since the budget started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns true once the timeout has passed.
    pub fn is_exhausted(&self) -> bool {
        match self.timeout {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }

    /// Configured timeout in milliseconds (`u64::MAX` when unlimited).
    pub fn timeout_ms(&self) -> u64 {
        self.timeout
            .map(|t| t.as_millis().min(u64::MAX as u128) as u64)
            .unwrap_or(u64::MAX)
    }

    /// Fails with `OracleTimeout` once the budget is exhausted.
    pub fn check(&self) -> Result<()> {
        if self.is_exhausted() {
            Err(BlockadeError::oracle_timeout(self.timeout_ms()))
        } else {
            Ok(())
        }
    }
}
