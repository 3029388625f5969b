//! Deterministic repair of sampled occupation states.
//!
//! A sampled state may select both endpoints of an edge. The repair rule is
//! fixed: for every adjacent pair that is still fully selected, the
//! higher-indexed member is dropped. Scanning vertices in ascending order
//! applies the rule in a single pass, because a vertex that survives to its
//! turn has no selected lower neighbor left.

use blockade_core::{IndependentSet, Subgraph};

/// Clears the higher-indexed endpoint of every selected edge.
///
/// `selected` is indexed by the subgraph's local indices. Returns the number
/// of vertices dropped.
pub fn resolve_conflicts(subgraph: &Subgraph<'_>, selected: &mut [bool]) -> usize {
    debug_assert_eq!(selected.len(), subgraph.len());

    let mut dropped = 0;
    for u in 0..selected.len() {
        if !selected[u] {
            continue;
        }
        for &v in subgraph.local_neighbors(u) {
            if v > u && selected[v] {
                selected[v] = false;
                dropped += 1;
            }
        }
    }
    dropped
}

/// Repairs a state and converts it into an independent set of parent ids.
///
/// A state that repairs to nothing on a non-empty subgraph is seeded with the
/// lowest-indexed vertex, keeping every candidate non-empty.
pub fn into_independent_set(subgraph: &Subgraph<'_>, mut selected: Vec<bool>) -> IndependentSet {
    let dropped = resolve_conflicts(subgraph, &mut selected);
    if dropped > 0 {
        log::trace!("Conflict resolution dropped {} vertices", dropped);
    }

    if !subgraph.is_empty() && !selected.iter().any(|&s| s) {
        selected[0] = true;
    }

    IndependentSet::new(
        selected
            .iter()
            .enumerate()
            .filter(|(_, &s)| s)
            .map(|(local, _)| subgraph.vertex_at(local))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockade_core::Graph;

    #[test]
    fn test_higher_index_is_dropped() {
        // Path 0-1-2, all selected: 0 keeps, 1 drops, 2 survives.
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)]);
        let sub = graph.induced(graph.vertices());
        let mut selected = vec![true, true, true];

        assert_eq!(resolve_conflicts(&sub, &mut selected), 1);
        assert_eq!(selected, vec![true, false, true]);
    }

    #[test]
    fn test_triangle_keeps_lowest() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let sub = graph.induced(graph.vertices());
        let set = into_independent_set(&sub, vec![true, true, true]);
        assert_eq!(set, IndependentSet::new(vec![0]));
    }

    #[test]
    fn test_empty_state_is_seeded() {
        let graph = Graph::from_edges(4, &[(1, 2)]);
        let sub = graph.induced([2, 3]);
        let set = into_independent_set(&sub, vec![false, false]);
        assert_eq!(set, IndependentSet::new(vec![2]));
    }

    #[test]
    fn test_result_is_independent_for_every_state() {
        // Wheel-like graph on 6 vertices; try every occupation state.
        let graph = Graph::from_edges(
            6,
            &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (1, 2), (2, 3), (3, 4), (4, 5), (5, 1)],
        );
        let sub = graph.induced(graph.vertices());
        for mask in 0u32..64 {
            let state: Vec<bool> = (0..6).map(|i| mask & (1 << i) != 0).collect();
            let set = into_independent_set(&sub, state);
            assert!(!set.is_empty());
            assert!(set.is_independent_in(&graph), "mask {:06b} -> {:?}", mask, set);
        }
    }
}
