//! Unit tests for the adjacency representations and CSR finalization.

use rstest::rstest;

use super::{AdjacencyList, GraphError};

fn csr_invariants_hold(graph: &super::CsrGraph) {
    let offsets = graph.offsets();
    let degrees = graph.degrees();
    assert_eq!(offsets.len(), degrees.len());
    if let Some(&first) = offsets.first() {
        assert_eq!(first, 0);
    }
    for u in 0..offsets.len().saturating_sub(1) {
        assert_eq!(offsets[u] + degrees[u], offsets[u + 1]);
    }
    if let Some(last) = offsets.len().checked_sub(1) {
        assert_eq!(offsets[last] + degrees[last], graph.edge_count());
    }
}

#[derive(Clone, Copy, Debug)]
enum Shape {
    Bitset,
    Sparse,
}

fn build(shape: Shape, len: usize, edges: &[(usize, usize)]) -> super::CsrGraph {
    let mut adjacency = match shape {
        Shape::Bitset => AdjacencyList::new_bitset(len),
        Shape::Sparse => AdjacencyList::new_sparse(len),
    };
    for &(u, v) in edges {
        adjacency.insert_edge(u, v).expect("edge must insert");
    }
    adjacency.finalize()
}

#[rstest]
#[case::bitset(Shape::Bitset)]
#[case::sparse(Shape::Sparse)]
fn finalize_packs_neighbours_in_ascending_order(#[case] shape: Shape) {
    let graph = build(shape, 4, &[(0, 3), (0, 1), (1, 0), (2, 1), (2, 3), (2, 0)]);

    csr_invariants_hold(&graph);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 6);
    assert_eq!(graph.neighbours_of(0), &[1, 3]);
    assert_eq!(graph.neighbours_of(1), &[0]);
    assert_eq!(graph.neighbours_of(2), &[0, 1, 3]);
    assert_eq!(graph.neighbours_of(3), &[] as &[u32]);
}

#[rstest]
#[case::bitset(Shape::Bitset)]
#[case::sparse(Shape::Sparse)]
fn both_shapes_finalize_identically(#[case] shape: Shape) {
    let edges = [(0, 65), (65, 0), (0, 64), (64, 0), (70, 1), (1, 70)];
    let graph = build(shape, 71, &edges);
    let reference = build(Shape::Sparse, 71, &edges);

    assert_eq!(graph, reference);
    csr_invariants_hold(&graph);
    // Neighbour 64 and 65 land in the second bitset word of row 0.
    assert_eq!(graph.neighbours_of(0), &[64, 65]);
}

#[rstest]
#[case::bitset(Shape::Bitset)]
#[case::sparse(Shape::Sparse)]
fn empty_relation_finalizes_to_zero_edges(#[case] shape: Shape) {
    let graph = build(shape, 5, &[]);

    csr_invariants_hold(&graph);
    assert_eq!(graph.edge_count(), 0);
    for u in 0..5 {
        assert_eq!(graph.degree(u), 0);
        assert!(graph.neighbours_of(u).is_empty());
    }
}

#[rstest]
#[case::bitset(Shape::Bitset)]
#[case::sparse(Shape::Sparse)]
fn insert_rejects_out_of_bounds_endpoints(#[case] shape: Shape) {
    let mut adjacency = match shape {
        Shape::Bitset => AdjacencyList::new_bitset(3),
        Shape::Sparse => AdjacencyList::new_sparse(3),
    };

    let err = adjacency
        .insert_edge(0, 3)
        .expect_err("endpoint beyond the vertex count must be rejected");
    assert_eq!(err, GraphError::VertexOutOfBounds { vertex: 3, len: 3 });
    assert_eq!(err.code().as_str(), "GRAPH_VERTEX_OUT_OF_BOUNDS");

    let err = adjacency
        .insert_edge(7, 1)
        .expect_err("source beyond the vertex count must be rejected");
    assert_eq!(err, GraphError::VertexOutOfBounds { vertex: 7, len: 3 });
}

#[rstest]
#[case::bitset(Shape::Bitset)]
#[case::sparse(Shape::Sparse)]
fn self_pairs_are_ignored(#[case] shape: Shape) {
    let graph = build(shape, 2, &[(0, 0), (0, 1), (1, 1)]);

    assert_eq!(graph.neighbours_of(0), &[1]);
    assert_eq!(graph.degree(1), 0);
}

#[test]
fn duplicate_sparse_inserts_collapse() {
    let graph = build(Shape::Sparse, 2, &[(0, 1), (0, 1), (0, 1)]);
    assert_eq!(graph.degree(0), 1);
}

#[test]
fn degrees_span_multiple_bitset_words() {
    let len = 200;
    let mut adjacency = AdjacencyList::new_bitset(len);
    for v in 0..len {
        if v != 5 {
            adjacency.insert_edge(5, v).expect("edge must insert");
        }
    }
    let graph = adjacency.finalize();

    csr_invariants_hold(&graph);
    assert_eq!(graph.degree(5), len - 1);
    let expected: Vec<u32> = (0..len as u32).filter(|&v| v != 5).collect();
    assert_eq!(graph.neighbours_of(5), expected.as_slice());
}
