//! Builder utilities for configuring Enoki runs.
//!
//! Exposes the adjacency-store and distance-kernel selection surface and the
//! builder validation performed before constructing [`Enoki`] instances.

use std::num::NonZeroUsize;

use crate::{Result, enoki::Enoki, error::EnokiError, graph::StoreKind, kernel::Kernel};

/// Shape of the temporary adjacency built during neighbour discovery.
///
/// `Bitset` stores one bit per candidate pair and suits large, moderately
/// dense inputs; `Sparse` stores explicit index lists and suits low-density
/// inputs. `Auto` resolves deterministically to `Bitset`. Both shapes
/// finalize to the same CSR graph, so downstream stages are oblivious to the
/// choice.
///
/// # Examples
/// ```
/// use enoki_core::NeighbourStore;
///
/// let store = NeighbourStore::Auto;
/// assert!(matches!(store, NeighbourStore::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighbourStore {
    /// Allow the library to select a shape automatically.
    Auto,
    /// One dense bitset row per vertex, processed 64 candidates at a time.
    Bitset,
    /// One growable neighbour-index list per vertex.
    Sparse,
}

/// Implementation of the 8-candidate range-test kernel.
///
/// `Wide` uses 8-lane AVX2 arithmetic and is only available on x86-64 hosts
/// that advertise the feature; `Auto` picks `Wide` when detected and falls
/// back to `Scalar` otherwise. Every implementation produces identical
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceKernel {
    /// Allow the library to probe the host and select a kernel.
    Auto,
    /// Portable one-pair-at-a-time implementation.
    Scalar,
    /// Explicitly vectorized 8-lane implementation.
    Wide,
}

/// Configures and constructs [`Enoki`] instances.
///
/// # Examples
/// ```
/// use enoki_core::{EnokiBuilder, NeighbourStore};
///
/// let enoki = EnokiBuilder::new()
///     .with_min_pts(3)
///     .with_radius(0.5)
///     .with_neighbour_store(NeighbourStore::Sparse)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(enoki.min_pts().get(), 3);
/// assert_eq!(enoki.neighbour_store(), NeighbourStore::Sparse);
/// ```
#[derive(Debug, Clone)]
pub struct EnokiBuilder {
    min_pts: usize,
    radius: f32,
    threads: Option<usize>,
    store: NeighbourStore,
    kernel: DistanceKernel,
}

impl Default for EnokiBuilder {
    fn default() -> Self {
        Self {
            min_pts: 4,
            radius: 1.0,
            threads: None,
            store: NeighbourStore::Auto,
            kernel: DistanceKernel::Auto,
        }
    }
}

impl EnokiBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// Defaults: `min_pts = 4`, `radius = 1.0`, worker count taken from the
    /// host's available parallelism, automatic store and kernel selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the Core-vertex degree threshold.
    #[must_use]
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Returns the configured degree threshold.
    #[must_use]
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Overrides the neighbourhood search radius.
    ///
    /// The radius is squared once at build time; all distance comparisons in
    /// the engine use squared values.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Returns the configured search radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Overrides the worker thread count.
    ///
    /// When unset, the builder uses the host's available parallelism.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Selects the temporary adjacency shape.
    #[must_use]
    pub fn with_neighbour_store(mut self, store: NeighbourStore) -> Self {
        self.store = store;
        self
    }

    /// Returns the currently configured adjacency shape.
    #[must_use]
    pub fn neighbour_store(&self) -> NeighbourStore {
        self.store
    }

    /// Selects the range-test kernel implementation.
    #[must_use]
    pub fn with_distance_kernel(mut self, kernel: DistanceKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Returns the currently configured kernel selection.
    #[must_use]
    pub fn distance_kernel(&self) -> DistanceKernel {
        self.kernel
    }

    /// Validates the configuration and constructs an [`Enoki`] instance.
    ///
    /// # Errors
    /// Returns [`EnokiError::InvalidMinPts`] when `min_pts` is zero,
    /// [`EnokiError::InvalidRadius`] when the radius is non-positive or
    /// non-finite, [`EnokiError::InvalidThreads`] when an explicit worker
    /// count of zero was requested, and [`EnokiError::KernelUnavailable`]
    /// when the `Wide` kernel was requested on a host without 8-lane
    /// support.
    ///
    /// # Examples
    /// ```
    /// use enoki_core::EnokiBuilder;
    ///
    /// let err = EnokiBuilder::new()
    ///     .with_radius(-2.0)
    ///     .build()
    ///     .expect_err("negative radii must be rejected");
    /// assert_eq!(err.code().as_str(), "ENOKI_INVALID_RADIUS");
    /// ```
    pub fn build(self) -> Result<Enoki> {
        let min_pts = NonZeroUsize::new(self.min_pts)
            .ok_or(EnokiError::InvalidMinPts { got: self.min_pts })?;

        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(EnokiError::InvalidRadius { got: self.radius });
        }

        let threads = match self.threads {
            Some(requested) => NonZeroUsize::new(requested)
                .ok_or(EnokiError::InvalidThreads { got: requested })?,
            None => default_thread_count(),
        };

        let store = match self.store {
            NeighbourStore::Auto | NeighbourStore::Bitset => StoreKind::Bitset,
            NeighbourStore::Sparse => StoreKind::Sparse,
        };
        let kernel = Kernel::resolve(self.kernel)?;

        Ok(Enoki::new(min_pts, self.radius, threads, store, kernel))
    }
}

fn default_thread_count() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
