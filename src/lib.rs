//! Enoki library facade.
//!
//! Re-exports the public surface of [`enoki_core`] so applications can depend
//! on a single crate. Input ingestion lives in `enoki-providers-points` and
//! the command-line front end in `enoki-cli`.
//!
//! # Determinism
//!
//! Cluster identifiers are assigned in ascending-vertex-scan order and
//! frontier admission is guarded by compare-and-swap, so the membership and
//! cluster-id vectors produced by a run are identical for any worker count.

pub use enoki_core::*;
