//! Both oracle strategies must satisfy the candidate contract on every
//! subgraph they are handed.

use blockade_core::{Graph, IndependentSetOracle, OracleBudget};
use blockade_oracle::{OracleConfig, OracleStrategy};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random graph with edge probability 1/`sparsity`.
fn random_graph(n: usize, sparsity: u64, seed: u64) -> Graph {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut graph = Graph::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(1.0 / sparsity as f64) {
                graph.add_edge(u, v);
            }
        }
    }
    graph
}

fn oracles() -> Vec<Box<dyn IndependentSetOracle>> {
    [OracleStrategy::Exact, OracleStrategy::Heuristic]
        .into_iter()
        .map(|strategy| {
            OracleConfig {
                strategy,
                candidates: 4,
                ..OracleConfig::default()
            }
            .build()
            .unwrap()
        })
        .collect()
}

#[test]
fn test_candidates_honor_contract_on_induced_subgraphs() {
    env_logger::builder().is_test(true).try_init().ok();

    for (round, oracle) in (0u64..6).flat_map(|r| oracles().into_iter().map(move |o| (r, o))) {
        let graph = random_graph(14, 3, 0x9e37 + round);
        // Every third vertex removed, as after one coloring step.
        let remaining: Vec<usize> = graph.vertices().filter(|v| v % 3 != 0).collect();
        let sub = graph.induced(remaining.iter().copied());

        let sets = oracle
            .produce_candidates(&sub, &OracleBudget::unlimited())
            .unwrap();
        assert!(!sets.is_empty(), "{} returned nothing", oracle.name());
        assert!(sets.len() <= 4);
        for set in &sets {
            assert!(!set.is_empty());
            assert!(set.iter().all(|v| remaining.contains(v)), "{}: {:?}", oracle.name(), set);
            assert_eq!(set.find_conflict(&graph), None, "{}: {:?}", oracle.name(), set);
        }
    }
}

#[test]
fn test_exact_sets_are_never_smaller_than_heuristic_sets() {
    let exact = OracleConfig::default().build().unwrap();
    let heuristic = OracleConfig {
        strategy: OracleStrategy::Heuristic,
        ..OracleConfig::default()
    }
    .build()
    .unwrap();

    for seed in 0u64..5 {
        let graph = random_graph(12, 4, seed);
        let sub = graph.induced(graph.vertices());
        let best = exact
            .produce_candidates(&sub, &OracleBudget::unlimited())
            .unwrap()[0]
            .len();
        for set in heuristic
            .produce_candidates(&sub, &OracleBudget::unlimited())
            .unwrap()
        {
            assert!(set.len() <= best);
        }
    }
}

#[test]
fn test_empty_subgraph_short_circuits() {
    let graph = random_graph(5, 2, 1);
    let empty = graph.induced(std::iter::empty());
    for oracle in oracles() {
        assert!(oracle
            .produce_candidates(&empty, &OracleBudget::unlimited())
            .unwrap()
            .is_empty());
    }
}
