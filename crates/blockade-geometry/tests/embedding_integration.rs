//! Integration tests for unit-disk embedding
//!
//! Whenever `embed` succeeds the point set must realize the graph exactly;
//! unsatisfiable requests must fail the same way on every run.

use blockade_core::{BlockadeError, Graph, Point};
use blockade_geometry::{embed, Embedder, EmbedderConfig};

fn path(n: usize) -> Graph {
    let edges: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
    Graph::from_edges(n, &edges)
}

fn clique(n: usize) -> Graph {
    let edges: Vec<_> = (0..n).flat_map(|u| ((u + 1)..n).map(move |v| (u, v))).collect();
    Graph::from_edges(n, &edges)
}

fn star(leaves: usize) -> Graph {
    let edges: Vec<_> = (1..=leaves).map(|leaf| (0, leaf)).collect();
    Graph::from_edges(leaves + 1, &edges)
}

#[test]
fn test_successful_embeddings_realize_the_graph() {
    env_logger::try_init().ok();

    let graphs = vec![
        ("path4", path(4)),
        ("triangle+isolated", Graph::from_edges(4, &[(0, 1), (1, 2), (0, 2)])),
        ("two edges", Graph::from_edges(4, &[(0, 1), (2, 3)])),
        ("star3", star(3)),
        ("edgeless5", Graph::new(5)),
    ];

    for (name, graph) in &graphs {
        let mut successes = 0;
        for seed in 0..10 {
            match embed(graph, 1.0, 3.0, 20_000, seed) {
                Ok(embedding) => {
                    successes += 1;
                    assert_eq!(embedding.len(), graph.num_vertices);
                    if let Err(violation) = embedding.verify(graph) {
                        panic!("{} (seed {}): {}", name, seed, violation);
                    }
                    assert_eq!(embedding.induced_graph().adjacency, graph.adjacency);
                }
                Err(BlockadeError::PlacementInfeasible { .. }) => {}
                Err(other) => panic!("{} (seed {}): unexpected error {:?}", name, seed, other),
            }
        }
        assert!(successes > 0, "{}: no seed produced an embedding", name);
    }
}

#[test]
fn test_positions_follow_vertex_order() {
    let graph = path(3);
    let embedding = embed(&graph, 1.0, 3.0, 20_000, 3).expect("path3 embeds");
    for (index, node) in embedding.nodes.iter().enumerate() {
        assert_eq!(node.vertex, index);
    }
}

#[test]
fn test_single_vertex_stays_at_reference_point() {
    let embedding = embed(&Graph::new(1), 2.5, 1.0, 1, 99).unwrap();
    assert_eq!(embedding.position(0), Some(Point::ORIGIN));
}

#[test]
fn test_claw_with_six_leaves_is_infeasible_and_reproducible() {
    // Six leaves within R of the center need pairwise angles above 60 degrees.
    let graph = star(6);
    let config = EmbedderConfig {
        radius: 1.0,
        bound: 2.0,
        max_iterations: 2_000,
        seed: 5,
    };

    let first = Embedder::new(config.clone()).embed(&graph);
    let second = Embedder::new(config).embed(&graph);

    match (first, second) {
        (
            Err(BlockadeError::PlacementInfeasible { vertex: a, attempts }),
            Err(BlockadeError::PlacementInfeasible { vertex: b, .. }),
        ) => {
            assert_eq!(a, b);
            assert!((1..=6).contains(&a));
            assert_eq!(attempts, 2_000);
        }
        other => panic!("Expected PlacementInfeasible twice, got {:?}", other),
    }
}

#[test]
fn test_independent_vertices_do_not_fit_in_small_box() {
    // Every pair in [-0.3, 0.3]² is closer than 0.85, but must be farther than 1.
    let graph = Graph::new(3);
    match embed(&graph, 1.0, 0.3, 500, 1) {
        Err(BlockadeError::PlacementInfeasible { vertex, .. }) => assert_eq!(vertex, 1),
        other => panic!("Expected PlacementInfeasible, got {:?}", other),
    }
}

#[test]
fn test_clique_in_wide_box_fails_reproducibly() {
    // Each new vertex must land within R of the origin cluster; a draw in a
    // 100 x 100 box hits that disk with probability about 3e-4.
    let graph = clique(5);
    let config = EmbedderConfig {
        radius: 1.0,
        bound: 50.0,
        max_iterations: 20,
        seed: 11,
    };

    let first = Embedder::new(config.clone()).embed(&graph);
    let second = Embedder::new(config).embed(&graph);

    match (first, second) {
        (
            Err(BlockadeError::PlacementInfeasible { vertex: a, attempts }),
            Err(BlockadeError::PlacementInfeasible { vertex: b, .. }),
        ) => {
            assert_eq!(a, b);
            assert!((1..5).contains(&a));
            assert_eq!(attempts, 20);
        }
        other => panic!("Expected PlacementInfeasible twice, got {:?}", other),
    }
}
