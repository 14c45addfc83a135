//! CPU pipeline orchestration.
//!
//! Centralizes the stage sequence so it can be reused across [`Enoki`]
//! orchestration and tests: discover neighbours into the temporary
//! adjacency, finalize to CSR, classify vertices by degree, then identify
//! clusters with the parallel BFS. Each stage is a fork–join over the
//! configured pool, and each emits a tracing event carrying its wall-clock
//! time, mirroring the per-stage timers of classic DBSCAN drivers.

use std::{num::NonZeroUsize, time::Instant};

use rayon::{ThreadPool, prelude::*};
use tracing::info;

use crate::{
    bfs::identify_clusters,
    graph::{CsrGraph, StoreKind},
    kernel::Kernel,
    neighbourhood::build_adjacency,
    points::PointSet,
    result::{ClusteringResult, Membership},
};

/// Resolved run parameters handed down by [`Enoki`](crate::Enoki).
#[derive(Clone, Copy, Debug)]
pub(crate) struct PipelineConfig {
    pub(crate) min_pts: NonZeroUsize,
    pub(crate) squared_radius: f32,
    pub(crate) threads: NonZeroUsize,
    pub(crate) store: StoreKind,
    pub(crate) kernel: Kernel,
}

/// Builds the finalized neighbourhood graph for `points`.
pub(crate) fn build_graph(
    points: &PointSet,
    config: &PipelineConfig,
    pool: &ThreadPool,
) -> CsrGraph {
    let started = Instant::now();
    let adjacency = pool.install(|| {
        build_adjacency(
            points,
            config.squared_radius,
            config.store,
            config.kernel,
            config.threads,
        )
    });
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        points = points.len(),
        "neighbour discovery completed"
    );

    let started = Instant::now();
    let graph = pool.install(|| adjacency.finalize());
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        edges = graph.edge_count(),
        "graph finalized"
    );
    graph
}

/// Runs the full pipeline over an already-built graph.
pub(crate) fn cluster_graph(
    graph: &CsrGraph,
    config: &PipelineConfig,
    pool: &ThreadPool,
) -> ClusteringResult {
    let started = Instant::now();
    let mut memberships = pool.install(|| classify(graph, config.min_pts));
    let core_count = memberships
        .iter()
        .filter(|&&membership| membership == Membership::Core)
        .count();
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        core = core_count,
        "vertices classified"
    );

    let started = Instant::now();
    let (cluster_ids, clusters) =
        pool.install(|| identify_clusters(graph, &mut memberships, config.threads));
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        clusters, "clusters identified"
    );

    ClusteringResult::from_parts(memberships, cluster_ids)
}

/// Marks each vertex Core or Noise by the degree threshold. Border labels
/// appear only later, during cluster identification.
fn classify(graph: &CsrGraph, min_pts: NonZeroUsize) -> Vec<Membership> {
    (0..graph.node_count())
        .into_par_iter()
        .map(|u| {
            if graph.degree(u) >= min_pts.get() {
                Membership::Core
            } else {
                Membership::Noise
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::graph::AdjacencyList;

    fn star_graph() -> CsrGraph {
        // Vertex 0 is connected to 1, 2, 3; the leaves only to 0.
        let mut adjacency = AdjacencyList::new_sparse(4);
        for leaf in 1..4 {
            adjacency.insert_edge(0, leaf).expect("edge must insert");
            adjacency.insert_edge(leaf, 0).expect("edge must insert");
        }
        adjacency.finalize()
    }

    #[test]
    fn classify_applies_the_degree_threshold() {
        let graph = star_graph();
        let memberships = classify(&graph, NonZeroUsize::new(3).expect("non-zero"));

        assert_eq!(memberships[0], Membership::Core);
        assert!(
            memberships[1..]
                .iter()
                .all(|&membership| membership == Membership::Noise)
        );
    }

    #[test]
    fn classify_is_idempotent() {
        let graph = star_graph();
        let min_pts = NonZeroUsize::new(2).expect("non-zero");

        let first = classify(&graph, min_pts);
        let second = classify(&graph, min_pts);
        assert_eq!(first, second);
    }
}
