//! Entry point for running the clustering pipeline.

use std::{num::NonZeroUsize, sync::Arc};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{instrument, warn};

use crate::{
    builder::{DistanceKernel, NeighbourStore},
    error::EnokiError,
    graph::{CsrGraph, StoreKind},
    kernel::Kernel,
    pipeline::{self, PipelineConfig},
    points::PointSet,
    result::ClusteringResult,
};

/// Runs G-DBSCAN over two-dimensional point sets.
///
/// Constructed through [`EnokiBuilder`](crate::EnokiBuilder); all parameters
/// are validated there, so an `Enoki` instance always holds a usable
/// configuration.
///
/// # Examples
/// ```
/// use enoki_core::{EnokiBuilder, Membership, PointSet};
///
/// let points = PointSet::from_points(&[
///     (0.0, 0.0),
///     (1.0, 0.0),
///     (2.0, 0.0),
///     (10.0, 10.0),
/// ]);
/// let enoki = EnokiBuilder::new()
///     .with_min_pts(2)
///     .with_radius(1.5)
///     .build()
///     .expect("configuration is valid");
/// let result = enoki.run(&points).expect("run must succeed");
///
/// assert_eq!(result.cluster_count(), 1);
/// assert_eq!(result.cluster_ids(), &[0, 0, 0, -1]);
/// assert_eq!(result.memberships()[3], Membership::Noise);
/// ```
#[derive(Debug, Clone)]
pub struct Enoki {
    min_pts: NonZeroUsize,
    radius: f32,
    threads: NonZeroUsize,
    store: StoreKind,
    kernel: Kernel,
}

impl Enoki {
    pub(crate) fn new(
        min_pts: NonZeroUsize,
        radius: f32,
        threads: NonZeroUsize,
        store: StoreKind,
        kernel: Kernel,
    ) -> Self {
        Self {
            min_pts,
            radius,
            threads,
            store,
            kernel,
        }
    }

    /// Returns the Core-vertex degree threshold.
    #[must_use]
    pub fn min_pts(&self) -> NonZeroUsize {
        self.min_pts
    }

    /// Returns the neighbourhood search radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the worker count used by every parallel stage.
    #[must_use]
    pub fn threads(&self) -> NonZeroUsize {
        self.threads
    }

    /// Returns the resolved adjacency shape (never `Auto`).
    #[must_use]
    pub fn neighbour_store(&self) -> NeighbourStore {
        match self.store {
            StoreKind::Bitset => NeighbourStore::Bitset,
            StoreKind::Sparse => NeighbourStore::Sparse,
        }
    }

    /// Returns the resolved distance kernel (never `Auto`).
    #[must_use]
    pub fn distance_kernel(&self) -> DistanceKernel {
        self.kernel.as_public()
    }

    /// Executes the clustering pipeline against the provided [`PointSet`].
    ///
    /// # Errors
    /// Returns [`EnokiError::EmptyPointSet`] when the point set is empty and
    /// [`EnokiError::ThreadPoolFailure`] when the worker pool cannot be
    /// constructed.
    #[instrument(
        name = "core.run",
        err,
        skip(self, points),
        fields(
            points = points.len(),
            min_pts = self.min_pts.get(),
            radius = self.radius,
            threads = self.threads.get(),
        ),
    )]
    pub fn run(&self, points: &PointSet) -> crate::Result<ClusteringResult> {
        let (config, pool) = self.prepare(points)?;
        let graph = pipeline::build_graph(points, &config, &pool);
        Ok(pipeline::cluster_graph(&graph, &config, &pool))
    }

    /// Builds only the finalized neighbourhood graph for `points`.
    ///
    /// Exposes the first half of the pipeline so callers can inspect degrees
    /// and neighbour runs directly.
    ///
    /// # Errors
    /// Same as [`Self::run`].
    #[instrument(
        name = "core.build_graph",
        err,
        skip(self, points),
        fields(points = points.len(), threads = self.threads.get()),
    )]
    pub fn build_graph(&self, points: &PointSet) -> crate::Result<CsrGraph> {
        let (config, pool) = self.prepare(points)?;
        Ok(pipeline::build_graph(points, &config, &pool))
    }

    fn prepare(&self, points: &PointSet) -> crate::Result<(PipelineConfig, ThreadPool)> {
        if points.is_empty() {
            warn!("point set is empty, returning error");
            return Err(EnokiError::EmptyPointSet);
        }

        let config = PipelineConfig {
            min_pts: self.min_pts,
            squared_radius: self.radius * self.radius,
            threads: self.threads,
            store: self.store,
            kernel: self.kernel,
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads.get())
            .build()
            .map_err(|source| EnokiError::ThreadPoolFailure {
                message: Arc::from(source.to_string()),
            })?;
        Ok((config, pool))
    }
}
