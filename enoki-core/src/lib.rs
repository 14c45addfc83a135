//! Enoki core library.
//!
//! Implements the G-DBSCAN formulation of DBSCAN over two-dimensional point
//! sets: the ε-neighbourhood relation is materialized as an immutable
//! compressed-sparse-row graph, vertices are classified Core or Noise by
//! degree, and clusters are discovered with a level-synchronous parallel
//! breadth-first search that relabels reachable Noise vertices as Border.

mod bfs;
mod builder;
mod enoki;
mod error;
mod graph;
mod kernel;
mod neighbourhood;
mod pipeline;
mod points;
mod result;

pub use crate::{
    builder::{DistanceKernel, EnokiBuilder, NeighbourStore},
    enoki::Enoki,
    error::{EnokiError, EnokiErrorCode, Result},
    graph::{AdjacencyList, CsrGraph, GraphError, GraphErrorCode},
    points::PointSet,
    result::{ClusteringResult, LabellingError, Membership, NOISE_ID},
};
