//! Cluster identification by level-synchronous parallel breadth-first search.
//!
//! Vertices are scanned in ascending order; every unclustered Core vertex
//! seeds the next cluster id and a BFS over the finalized graph. Within a
//! level the frontier is split into contiguous chunks, one per worker; each
//! worker collects a private next-level buffer and a private list of Noise
//! vertices to relabel as Border. Frontier admission is guarded by a
//! compare-and-swap on the vertex's cluster id, so a vertex is enqueued at
//! most once per run even when two workers discover it in the same level.
//!
//! Relabels are applied at the level barrier. A vertex joins at most one
//! frontier (admission sets its cluster id), so no two workers ever report
//! the same relabel.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicI64, Ordering},
};

use rayon::prelude::*;

use crate::{
    graph::CsrGraph,
    result::{Membership, NOISE_ID},
};

/// Assigns dense cluster ids and relabels reachable Noise vertices.
///
/// Requires `memberships` to hold only Core and Noise (the classifier's
/// output). Returns the per-vertex cluster ids and the cluster count. Must
/// run inside the pool that owns the configured worker count.
pub(crate) fn identify_clusters(
    graph: &CsrGraph,
    memberships: &mut [Membership],
    threads: NonZeroUsize,
) -> (Vec<i64>, usize) {
    let len = graph.node_count();
    debug_assert_eq!(memberships.len(), len);

    let cluster_ids: Vec<AtomicI64> = (0..len).map(|_| AtomicI64::new(NOISE_ID)).collect();

    let mut next_cluster: i64 = 0;
    for seed in 0..len {
        if memberships[seed] != Membership::Core {
            continue;
        }
        if cluster_ids[seed].load(Ordering::Relaxed) != NOISE_ID {
            continue;
        }
        cluster_ids[seed].store(next_cluster, Ordering::Relaxed);
        grow_cluster(graph, memberships, &cluster_ids, seed, next_cluster, threads);
        next_cluster += 1;
    }

    let cluster_ids = cluster_ids
        .into_iter()
        .map(AtomicI64::into_inner)
        .collect();
    (cluster_ids, next_cluster as usize)
}

/// One worker's share of a level expansion.
#[derive(Default)]
struct LevelPart {
    next: Vec<u32>,
    relabelled: Vec<u32>,
}

fn grow_cluster(
    graph: &CsrGraph,
    memberships: &mut [Membership],
    cluster_ids: &[AtomicI64],
    seed: usize,
    cluster: i64,
    threads: NonZeroUsize,
) {
    let mut frontier: Vec<u32> = vec![seed as u32];

    while !frontier.is_empty() {
        let chunk = frontier.len().div_ceil(threads.get());
        let view: &[Membership] = memberships;
        let parts: Vec<LevelPart> = frontier
            .par_chunks(chunk)
            .map(|nodes| expand(graph, view, cluster_ids, cluster, nodes))
            .collect();

        // Level barrier: apply relabels, then merge the partial frontiers in
        // worker order.
        frontier.clear();
        for part in parts {
            for node in part.relabelled {
                memberships[node as usize] = Membership::Border;
            }
            frontier.extend(part.next);
        }
    }
}

fn expand(
    graph: &CsrGraph,
    memberships: &[Membership],
    cluster_ids: &[AtomicI64],
    cluster: i64,
    nodes: &[u32],
) -> LevelPart {
    let mut part = LevelPart::default();
    for &node in nodes {
        // A reachable Noise vertex becomes Border but is not expanded.
        if memberships[node as usize] == Membership::Noise {
            part.relabelled.push(node);
            continue;
        }
        for &neighbour in graph.neighbours_of(node as usize) {
            let admitted = cluster_ids[neighbour as usize]
                .compare_exchange(NOISE_ID, cluster, Ordering::AcqRel, Ordering::Acquire)
                .is_ok();
            if admitted {
                part.next.push(neighbour);
            }
        }
    }
    part
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rstest::rstest;

    use super::*;
    use crate::graph::AdjacencyList;

    fn chain_graph(len: usize) -> CsrGraph {
        let mut adjacency = AdjacencyList::new_sparse(len);
        for u in 0..len.saturating_sub(1) {
            adjacency.insert_edge(u, u + 1).expect("edge must insert");
            adjacency.insert_edge(u + 1, u).expect("edge must insert");
        }
        adjacency.finalize()
    }

    #[rstest]
    #[case::single_worker(1)]
    #[case::many_workers(4)]
    fn chain_of_cores_forms_one_cluster(#[case] threads: usize) {
        let graph = chain_graph(5);
        let mut memberships = vec![Membership::Core; 5];
        let threads = NonZeroUsize::new(threads).expect("non-zero");

        let (ids, count) = identify_clusters(&graph, &mut memberships, threads);

        assert_eq!(count, 1);
        assert_eq!(ids, vec![0; 5]);
        assert!(memberships.iter().all(|&m| m == Membership::Core));
    }

    #[test]
    fn reachable_noise_becomes_border_without_expanding() {
        // 0 - 1 - 2 where only 1 is Core: 0 and 2 join cluster 0 as Border.
        let graph = chain_graph(3);
        let mut memberships = vec![Membership::Noise, Membership::Core, Membership::Noise];

        let (ids, count) =
            identify_clusters(&graph, &mut memberships, NonZeroUsize::new(2).expect("non-zero"));

        assert_eq!(count, 1);
        assert_eq!(ids, vec![0, 0, 0]);
        assert_eq!(
            memberships,
            vec![Membership::Border, Membership::Core, Membership::Border]
        );
    }

    #[test]
    fn isolated_noise_keeps_the_noise_id() {
        let graph = AdjacencyList::new_sparse(2).finalize();
        let mut memberships = vec![Membership::Noise, Membership::Noise];

        let (ids, count) =
            identify_clusters(&graph, &mut memberships, NonZeroUsize::new(1).expect("non-zero"));

        assert_eq!(count, 0);
        assert_eq!(ids, vec![NOISE_ID, NOISE_ID]);
        assert_eq!(memberships, vec![Membership::Noise, Membership::Noise]);
    }

    #[test]
    fn cluster_ids_follow_the_ascending_scan() {
        // Two disjoint components; the one containing the lower vertex id
        // takes cluster 0.
        let mut adjacency = AdjacencyList::new_sparse(4);
        for (u, v) in [(2, 3), (3, 2), (0, 1), (1, 0)] {
            adjacency.insert_edge(u, v).expect("edge must insert");
        }
        let graph = adjacency.finalize();
        let mut memberships = vec![Membership::Core; 4];

        let (ids, count) =
            identify_clusters(&graph, &mut memberships, NonZeroUsize::new(2).expect("non-zero"));

        assert_eq!(count, 2);
        assert_eq!(ids, vec![0, 0, 1, 1]);
    }

    #[test]
    fn border_vertex_shared_by_two_clusters_joins_the_first() {
        // 0 - 1 - 2 where 1 is not Core; clusters {0} and {2} both reach 1,
        // but the scan visits vertex 0 first.
        let graph = chain_graph(3);
        let mut memberships = vec![Membership::Core, Membership::Noise, Membership::Core];

        let (ids, count) =
            identify_clusters(&graph, &mut memberships, NonZeroUsize::new(3).expect("non-zero"));

        assert_eq!(count, 2);
        assert_eq!(ids, vec![0, 0, 1]);
        assert_eq!(memberships[1], Membership::Border);
    }
}
