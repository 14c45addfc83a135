//! Shared helpers for the core integration tests.

use enoki_core::{
    ClusteringResult, DistanceKernel, Enoki, EnokiBuilder, NeighbourStore, PointSet,
};

pub fn engine(
    min_pts: usize,
    radius: f32,
    threads: usize,
    store: NeighbourStore,
    kernel: DistanceKernel,
) -> Enoki {
    EnokiBuilder::new()
        .with_min_pts(min_pts)
        .with_radius(radius)
        .with_threads(threads)
        .with_neighbour_store(store)
        .with_distance_kernel(kernel)
        .build()
        .expect("test configuration must be valid")
}

pub fn run(
    points: &[(f32, f32)],
    min_pts: usize,
    radius: f32,
    threads: usize,
    store: NeighbourStore,
) -> ClusteringResult {
    engine(min_pts, radius, threads, store, DistanceKernel::Auto)
        .run(&PointSet::from_points(points))
        .expect("run must succeed")
}
