//! Sampling oracle over the blockade energy landscape.
//!
//! One solve pass anneals an occupation state under
//!
//! ```text
//! E(x) = -Σ x_i + penalty · Σ_(u,v)∈E x_u x_v
//! ```
//!
//! with single-flip Metropolis moves on a geometric temperature schedule, the
//! classical analogue of sweeping a Rydberg array from the empty state into
//! its blockaded ground state. The chain is then held at the final
//! temperature and measured `shots` times; the most frequent measured states
//! are repaired by [`crate::conflict_resolution`] and returned as candidates.
//!
//! Each call derives its RNG stream from the configured seed and the
//! subgraph's vertex set, so the oracle is stateless and reproducible even
//! when branches call it concurrently.

use crate::conflict_resolution::into_independent_set;
use blockade_core::{
    BlockadeError, IndependentSet, IndependentSetOracle, OracleBudget, Result, Subgraph,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Annealing and sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Candidates returned per call (K)
    pub candidates: usize,
    /// Base seed
    pub seed: u64,
    /// Annealing sweeps (one sweep = one proposal per vertex)
    pub sweeps: usize,
    /// Measured states after annealing
    pub shots: usize,
    /// Energy cost of a selected edge; values above 1 make blockade violations uphill
    pub penalty: f64,
    pub temp_start: f64,
    pub temp_end: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            candidates: 3,
            seed: 7,
            sweeps: 200,
            shots: 256,
            penalty: 2.0,
            temp_start: 2.0,
            temp_end: 0.05,
        }
    }
}

impl HeuristicConfig {
    pub fn validate(&self) -> Result<()> {
        if self.candidates == 0 {
            return Err(BlockadeError::config("oracle candidates must be > 0"));
        }
        if self.shots == 0 {
            return Err(BlockadeError::config("heuristic shots must be > 0"));
        }
        if !(self.penalty.is_finite() && self.penalty > 1.0) {
            return Err(BlockadeError::config(format!(
                "heuristic penalty must exceed 1.0 (got {})",
                self.penalty
            )));
        }
        if !(self.temp_end.is_finite() && self.temp_end > 0.0 && self.temp_start >= self.temp_end)
        {
            return Err(BlockadeError::config(format!(
                "heuristic temperatures must satisfy temp_start ({}) >= temp_end ({}) > 0",
                self.temp_start, self.temp_end
            )));
        }
        Ok(())
    }
}

/// Stochastic oracle returning the K most frequently measured states.
#[derive(Debug, Clone)]
pub struct HeuristicOracle {
    config: HeuristicConfig,
}

impl HeuristicOracle {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }
}

impl Default for HeuristicOracle {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl IndependentSetOracle for HeuristicOracle {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn produce_candidates(
        &self,
        subgraph: &Subgraph<'_>,
        budget: &OracleBudget,
    ) -> Result<Vec<IndependentSet>> {
        if subgraph.is_empty() {
            return Ok(Vec::new());
        }
        budget.check()?;

        let mut chain = Chain::new(subgraph, self.config.penalty, derive_seed(self.config.seed, subgraph));

        let cooling = if self.config.sweeps > 1 {
            (self.config.temp_end / self.config.temp_start).powf(1.0 / (self.config.sweeps - 1) as f64)
        } else {
            1.0
        };
        let mut temperature = self.config.temp_start;
        for _ in 0..self.config.sweeps {
            budget.check()?;
            chain.sweep(temperature);
            temperature = (temperature * cooling).max(self.config.temp_end);
        }

        // Measurement: count states at the final temperature, remembering
        // first appearance for a stable ordering among equal counts.
        let mut histogram: HashMap<Vec<bool>, (usize, usize)> = HashMap::new();
        for shot in 0..self.config.shots {
            budget.check()?;
            chain.sweep(self.config.temp_end);
            histogram
                .entry(chain.state.clone())
                .or_insert((0, shot))
                .0 += 1;
        }

        let mut outcomes: Vec<(Vec<bool>, usize, usize)> = histogram
            .into_iter()
            .map(|(state, (count, first))| (state, count, first))
            .collect();
        outcomes.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let distinct_outcomes = outcomes.len();
        let mut candidates: Vec<IndependentSet> = Vec::with_capacity(self.config.candidates);
        for (state, _, _) in outcomes {
            let set = into_independent_set(subgraph, state);
            if !candidates.contains(&set) {
                candidates.push(set);
            }
            if candidates.len() == self.config.candidates {
                break;
            }
        }

        log::debug!(
            "Heuristic oracle: {} vertices, {} distinct outcomes -> {} candidate(s), largest {}",
            subgraph.len(),
            distinct_outcomes,
            candidates.len(),
            candidates.iter().map(IndependentSet::len).max().unwrap_or(0)
        );

        Ok(candidates)
    }
}

/// Metropolis chain over occupation states of one subgraph.
struct Chain<'s, 'g> {
    subgraph: &'s Subgraph<'g>,
    penalty: f64,
    rng: ChaCha8Rng,
    state: Vec<bool>,
    /// Selected neighbors per vertex
    occupied_neighbors: Vec<usize>,
}

impl<'s, 'g> Chain<'s, 'g> {
    fn new(subgraph: &'s Subgraph<'g>, penalty: f64, seed: u64) -> Self {
        Self {
            subgraph,
            penalty,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: vec![false; subgraph.len()],
            occupied_neighbors: vec![0; subgraph.len()],
        }
    }

    /// Energy change of flipping vertex `i`.
    fn delta(&self, i: usize) -> f64 {
        let interaction = self.penalty * self.occupied_neighbors[i] as f64;
        if self.state[i] {
            1.0 - interaction
        } else {
            interaction - 1.0
        }
    }

    fn flip(&mut self, i: usize) {
        self.state[i] = !self.state[i];
        for &j in self.subgraph.local_neighbors(i) {
            if self.state[i] {
                self.occupied_neighbors[j] += 1;
            } else {
                self.occupied_neighbors[j] -= 1;
            }
        }
    }

    fn sweep(&mut self, temperature: f64) {
        let n = self.state.len();
        for _ in 0..n {
            let i = self.rng.gen_range(0..n);
            let delta = self.delta(i);
            if delta <= 0.0 || self.rng.gen::<f64>() < (-delta / temperature).exp() {
                self.flip(i);
            }
        }
    }
}

/// Mixes the base seed with the subgraph's vertex ids (splitmix64 finalizer).
fn derive_seed(seed: u64, subgraph: &Subgraph<'_>) -> u64 {
    fn mix(mut z: u64) -> u64 {
        z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
    subgraph
        .vertices()
        .iter()
        .fold(mix(seed), |acc, &v| mix(acc ^ v as u64))
}
