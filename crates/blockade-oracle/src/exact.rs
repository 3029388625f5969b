//! Exact maximum-independent-set oracle.
//!
//! Branch-and-bound over the subgraph's local indices. Each node branches on
//! the lowest remaining candidate, include before exclude, so maximum sets
//! are discovered in lexicographic order of their sorted vertex ids. Two
//! bounds prune the tree: the candidate count, and a greedy clique cover of
//! the candidates (an independent set meets each clique at most once).
//! An edgeless candidate set is taken whole without branching.
//!
//! The budget is polled at every search node and between clique-cover
//! steps, and once more after the search completes.

use blockade_core::{IndependentSet, IndependentSetOracle, OracleBudget, Result, Subgraph};

/// Deterministic oracle returning up to `limit` maximum independent sets.
#[derive(Debug, Clone)]
pub struct ExactOracle {
    limit: usize,
}

impl ExactOracle {
    /// Creates an exact oracle returning at most `limit` sets (min 1).
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for ExactOracle {
    fn default() -> Self {
        Self::new(3)
    }
}

impl IndependentSetOracle for ExactOracle {
    fn name(&self) -> &'static str {
        "exact"
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

        let mut search = Search {
            subgraph,
            budget,
            limit: self.limit,
            best_size: 0,
            found: Vec::new(),
            nodes: 0,
        };
        let mut current = Vec::new();
        search.expand(&mut current, (0..subgraph.len()).collect())?;
        budget.check()?;

        log::debug!(
            "Exact oracle: {} vertices, {} edges -> {} set(s) of size {} ({} search nodes)",
            subgraph.len(),
            subgraph.num_edges(),
            search.found.len(),
            search.best_size,
            search.nodes
        );

        Ok(search
            .found
            .into_iter()
            .map(|local| IndependentSet::new(local.into_iter().map(|i| subgraph.vertex_at(i)).collect()))
            .collect())
    }
}

struct Search<'s, 'g> {
    subgraph: &'s Subgraph<'g>,
    budget: &'s OracleBudget,
    limit: usize,
    best_size: usize,
    found: Vec<Vec<usize>>,
    nodes: u64,
}

impl Search<'_, '_> {
    fn adjacent(&self, a: usize, b: usize) -> bool {
        self.subgraph.local_neighbors(a).binary_search(&b).is_ok()
    }

    /// Returns true when no completion of `current` can be recorded.
    fn pruned(&self, bound: usize) -> bool {
        bound < self.best_size || (bound == self.best_size && self.found.len() >= self.limit)
    }

    fn record(&mut self, current: &[usize]) {
        if current.len() > self.best_size {
            self.best_size = current.len();
            self.found.clear();
            self.found.push(current.to_vec());
        } else if current.len() == self.best_size && self.found.len() < self.limit {
            self.found.push(current.to_vec());
        }
    }

    /// True when no two of `candidates` are adjacent.
    fn is_edgeless(&self, candidates: &[usize]) -> bool {
        let mut member = vec![false; self.subgraph.len()];
        for &v in candidates {
            member[v] = true;
        }
        candidates
            .iter()
            .all(|&v| self.subgraph.local_neighbors(v).iter().all(|&w| !member[w]))
    }

    /// Size of a greedy clique cover of `candidates`.
    fn clique_cover(&self, candidates: &[usize]) -> Result<usize> {
        let mut cliques: Vec<Vec<usize>> = Vec::new();
        for &v in candidates {
            self.budget.check()?;
            match cliques
                .iter_mut()
                .find(|clique| clique.iter().all(|&u| self.adjacent(u, v)))
            {
                Some(clique) => clique.push(v),
                None => cliques.push(vec![v]),
            }
        }
        Ok(cliques.len())
    }

    fn expand(&mut self, current: &mut Vec<usize>, candidates: Vec<usize>) -> Result<()> {
        self.nodes += 1;
        self.budget.check()?;

        let Some((&v, rest)) = candidates.split_first() else {
            self.record(current);
            return Ok(());
        };

        if self.pruned(current.len() + candidates.len()) {
            return Ok(());
        }
        if self.is_edgeless(&candidates) {
            let depth = current.len();
            current.extend_from_slice(&candidates);
            self.record(current);
            current.truncate(depth);
            return Ok(());
        }
        if self.pruned(current.len() + self.clique_cover(&candidates)?) {
            return Ok(());
        }

        let non_neighbors: Vec<usize> = rest.iter().copied().filter(|&w| !self.adjacent(v, w)).collect();
        let isolated = non_neighbors.len() == rest.len();

        current.push(v);
        self.expand(current, non_neighbors)?;
        current.pop();

        // A set that skips a vertex with no remaining neighbors is never maximum.
        if !isolated {
            self.expand(current, rest.to_vec())?;
        }
        Ok(())
    }
}
