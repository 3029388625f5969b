//! Recursive coloring engine.
//!
//! Each call asks the oracle for candidate independent sets of the
//! remaining vertices, paints each candidate with the current color in
//! turn, and recurses on what is left. The call keeps the result with the
//! fewest colors; on a tie the earlier candidate wins.
//!
//! Oracle output is checked before use. An empty or non-independent set,
//! or one reaching outside the remaining vertices, aborts the run with
//! `OracleInvariantViolation`. A timed-out oracle call only disqualifies
//! the branch that made it, unless every branch of a level times out.

use blockade_core::{
    BlockadeError, Coloring, Graph, IndependentSet, IndependentSetOracle, OracleBudget, Result,
    Subgraph, VertexId,
};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters collected over one coloring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub oracle_calls: u64,
    /// Branches dropped because their oracle call timed out
    pub timeouts_skipped: u64,
    /// Complete assignments reached
    pub leaves: u64,
}

#[derive(Default)]
struct Counters {
    oracle_calls: AtomicU64,
    timeouts_skipped: AtomicU64,
    leaves: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> EngineStats {
        EngineStats {
            oracle_calls: self.oracle_calls.load(Ordering::Relaxed),
            timeouts_skipped: self.timeouts_skipped.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
        }
    }
}

/// Result of [`ColoringEngine::color`].
#[derive(Debug, Clone)]
pub struct ColoringOutcome {
    pub coloring: Coloring,
    pub stats: EngineStats,
    pub elapsed: Duration,
}

impl ColoringOutcome {
    pub fn num_colors(&self) -> usize {
        self.coloring.num_colors()
    }
}

/// Best result of one recursion level, keyed for first-found tie-breaking.
struct Best {
    colors: usize,
    index: usize,
    coloring: Coloring,
}

/// Drives an oracle over shrinking remainders to build a proper coloring.
pub struct ColoringEngine<'o> {
    oracle: &'o dyn IndependentSetOracle,
    timeout: Option<Duration>,
    parallel_branches: bool,
}

impl<'o> ColoringEngine<'o> {
    pub fn new(oracle: &'o dyn IndependentSetOracle) -> Self {
        Self {
            oracle,
            timeout: None,
            parallel_branches: false,
        }
    }

    /// Sets the wall-clock budget of every oracle call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Evaluates the candidates of each level concurrently.
    pub fn with_parallel_branches(mut self, enabled: bool) -> Self {
        self.parallel_branches = enabled;
        self
    }

    /// Colors every vertex of `graph` with colors `1..=k`.
    ///
    /// # Errors
    /// - `OracleInvariantViolation` if the oracle hands back an invalid set
    /// - `OracleTimeout` if every branch of some level timed out; `partial`
    ///   holds the assignment reached along the first such branch
    pub fn color(&self, graph: &Graph) -> Result<ColoringOutcome> {
        let start = Instant::now();
        let counters = Counters::default();

        log::info!(
            "Coloring {} vertices / {} edges with {} oracle{}",
            graph.num_vertices,
            graph.num_edges,
            self.oracle.name(),
            if self.parallel_branches { " (parallel branches)" } else { "" }
        );

        let remaining: Vec<VertexId> = graph.vertices().collect();
        let coloring = self.solve(graph, &remaining, 1, Coloring::new(graph.num_vertices), &counters)?;

        let outcome = ColoringOutcome {
            coloring,
            stats: counters.snapshot(),
            elapsed: start.elapsed(),
        };
        log::info!(
            "Coloring complete: {} colors ({} oracle calls, {} branches skipped, {} leaves) in {:.2?}",
            outcome.num_colors(),
            outcome.stats.oracle_calls,
            outcome.stats.timeouts_skipped,
            outcome.stats.leaves,
            outcome.elapsed
        );
        Ok(outcome)
    }

    fn budget(&self) -> OracleBudget {
        match self.timeout {
            Some(timeout) => OracleBudget::new(timeout),
            None => OracleBudget::unlimited(),
        }
    }

    fn solve(
        &self,
        graph: &Graph,
        remaining: &[VertexId],
        color: usize,
        partial: Coloring,
        counters: &Counters,
    ) -> Result<Coloring> {
        if remaining.is_empty() {
            counters.leaves.fetch_add(1, Ordering::Relaxed);
            return Ok(partial);
        }

        let subgraph = graph.induced(remaining.iter().copied());
        counters.oracle_calls.fetch_add(1, Ordering::Relaxed);
        let candidates = self
            .oracle
            .produce_candidates(&subgraph, &self.budget())
            .map_err(|e| e.with_partial(&partial))?;
        self.check_candidates(&subgraph, &candidates)?;

        log::debug!(
            "Color {}: {} remaining, {} candidate(s) of sizes {:?}",
            color,
            remaining.len(),
            candidates.len(),
            candidates.iter().map(IndependentSet::len).collect::<Vec<_>>()
        );

        let branch = |candidate: &IndependentSet| {
            let mut next = partial.clone();
            next.assign_set(candidate, color);
            let rest: Vec<VertexId> = remaining
                .iter()
                .copied()
                .filter(|&v| !candidate.contains(v))
                .collect();
            self.solve(graph, &rest, color + 1, next, counters)
        };

        if self.parallel_branches && candidates.len() > 1 {
            self.best_parallel(color, &candidates, branch, counters)
        } else {
            self.best_sequential(color, &candidates, branch, counters)
        }
    }

    fn best_sequential<F>(
        &self,
        color: usize,
        candidates: &[IndependentSet],
        branch: F,
        counters: &Counters,
    ) -> Result<Coloring>
    where
        F: Fn(&IndependentSet) -> Result<Coloring>,
    {
        let mut best: Option<Best> = None;
        let mut first_timeout: Option<BlockadeError> = None;

        for (index, candidate) in candidates.iter().enumerate() {
            match branch(candidate) {
                Ok(coloring) => {
                    let colors = coloring.num_colors();
                    if best.as_ref().map_or(true, |b| colors < b.colors) {
                        best = Some(Best { colors, index, coloring });
                    }
                }
                Err(e) if e.is_recoverable() => {
                    skip_branch(color, index, &e, counters);
                    first_timeout.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        settle(best, first_timeout)
    }

    fn best_parallel<F>(
        &self,
        color: usize,
        candidates: &[IndependentSet],
        branch: F,
        counters: &Counters,
    ) -> Result<Coloring>
    where
        F: Fn(&IndependentSet) -> Result<Coloring> + Sync,
    {
        let best: Mutex<Option<Best>> = Mutex::new(None);
        let timeout: Mutex<Option<(usize, BlockadeError)>> = Mutex::new(None);
        let fatal: Mutex<Option<(usize, BlockadeError)>> = Mutex::new(None);

        candidates
            .par_iter()
            .enumerate()
            .for_each(|(index, candidate)| match branch(candidate) {
                Ok(coloring) => {
                    let colors = coloring.num_colors();
                    let mut guard = best.lock();
                    let better = guard
                        .as_ref()
                        .map_or(true, |b| (colors, index) < (b.colors, b.index));
                    if better {
                        *guard = Some(Best { colors, index, coloring });
                    }
                }
                Err(e) if e.is_recoverable() => {
                    skip_branch(color, index, &e, counters);
                    keep_lowest(&timeout, index, e);
                }
                Err(e) => keep_lowest(&fatal, index, e),
            });

        if let Some((_, e)) = fatal.into_inner() {
            return Err(e);
        }
        settle(best.into_inner(), timeout.into_inner().map(|(_, e)| e))
    }

    fn check_candidates(&self, subgraph: &Subgraph<'_>, candidates: &[IndependentSet]) -> Result<()> {
        let oracle = self.oracle.name();
        if candidates.is_empty() {
            return Err(BlockadeError::invariant_violation(
                oracle,
                format!("no candidates for a subgraph of {} vertices", subgraph.len()),
            ));
        }
        for (index, set) in candidates.iter().enumerate() {
            if set.is_empty() {
                return Err(BlockadeError::invariant_violation(
                    oracle,
                    format!("candidate {} is empty", index),
                ));
            }
            if let Some(&outside) = set.iter().find(|&&v| !subgraph.contains(v)) {
                return Err(BlockadeError::invariant_violation(
                    oracle,
                    format!("candidate {} contains vertex {} outside the subgraph", index, outside),
                ));
            }
            if let Some((u, v)) = set.find_conflict(subgraph.graph()) {
                return Err(BlockadeError::invariant_violation(
                    oracle,
                    format!("candidate {} selects adjacent vertices {} and {}", index, u, v),
                ));
            }
        }
        Ok(())
    }
}

fn skip_branch(color: usize, index: usize, error: &BlockadeError, counters: &Counters) {
    counters.timeouts_skipped.fetch_add(1, Ordering::Relaxed);
    log::warn!("Color {}: skipping candidate {} ({})", color, index, error);
}

fn keep_lowest(slot: &Mutex<Option<(usize, BlockadeError)>>, index: usize, error: BlockadeError) {
    let mut guard = slot.lock();
    if guard.as_ref().map_or(true, |(i, _)| index < *i) {
        *guard = Some((index, error));
    }
}

fn settle(best: Option<Best>, timeout: Option<BlockadeError>) -> Result<Coloring> {
    match (best, timeout) {
        (Some(best), _) => Ok(best.coloring),
        (None, Some(e)) => Err(e),
        (None, None) => Err(BlockadeError::internal("recursion level explored no candidates")),
    }
}
