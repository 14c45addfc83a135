//! Result types for clustering runs.
//!
//! Encapsulates the per-vertex membership and cluster-id vectors produced by
//! [`Enoki::run`](crate::Enoki::run), with validation of the labelling
//! invariants.

use std::fmt;

use thiserror::Error;

/// Cluster id carried by vertices that belong to no cluster.
pub const NOISE_ID: i64 = -1;

/// DBSCAN role of a vertex.
///
/// The classifier assigns `Core` and `Noise` by degree threshold; `Border`
/// is produced only by the cluster-identification BFS, when a Noise vertex
/// turns out to be reachable from a Core vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Membership {
    /// Not a Core vertex and not reachable from one.
    Noise,
    /// Not a Core vertex, but a neighbour of one.
    Border,
    /// A vertex whose neighbourhood meets the `min_pts` threshold.
    Core,
}

impl Membership {
    /// Returns the lowercase label used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noise => "noise",
            Self::Border => "border",
            Self::Core => "core",
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a labelling violates the clustering invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LabellingError {
    /// The membership and cluster-id vectors differ in length.
    #[error("membership vector has length {memberships} but {cluster_ids} cluster ids were given")]
    LengthMismatch {
        memberships: usize,
        cluster_ids: usize,
    },
    /// A Noise vertex carried a cluster id.
    #[error("noise vertex {index} carries cluster id {id}")]
    NoiseClustered { index: usize, id: i64 },
    /// A Core or Border vertex carried no cluster id.
    #[error("{membership} vertex {index} carries no cluster id")]
    MemberUnclustered { index: usize, membership: Membership },
    /// Cluster identifiers did not include 0.
    #[error("cluster identifiers must include 0")]
    MissingZero,
    /// Cluster identifiers skipped a value.
    #[error("cluster identifiers must form a dense range (id {missing} is unused)")]
    Gap { missing: i64 },
}

/// Represents the output of a clustering run.
///
/// # Examples
/// ```
/// use enoki_core::{ClusteringResult, Membership};
///
/// let result = ClusteringResult::from_parts(
///     vec![Membership::Core, Membership::Border, Membership::Noise],
///     vec![0, 0, -1],
/// );
/// assert_eq!(result.cluster_count(), 1);
/// assert_eq!(result.cluster_ids(), &[0, 0, -1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringResult {
    memberships: Vec<Membership>,
    cluster_ids: Vec<i64>,
    cluster_count: usize,
}

impl ClusteringResult {
    /// Builds a result from explicit membership and cluster-id vectors.
    ///
    /// # Panics
    /// Panics when the vectors violate the labelling invariants; use
    /// [`Self::try_from_parts`] to surface the violation as an error.
    #[must_use]
    pub fn from_parts(memberships: Vec<Membership>, cluster_ids: Vec<i64>) -> Self {
        Self::try_from_parts(memberships, cluster_ids)
            .expect("labelling must satisfy the clustering invariants")
    }

    /// Attempts to build a result from membership and cluster-id vectors.
    ///
    /// The vectors must have equal length; Noise vertices must carry
    /// [`NOISE_ID`], Core and Border vertices a non-negative id; and the ids
    /// in use must form a dense range starting at zero.
    ///
    /// # Errors
    /// Returns the first [`LabellingError`] violated by the input.
    pub fn try_from_parts(
        memberships: Vec<Membership>,
        cluster_ids: Vec<i64>,
    ) -> Result<Self, LabellingError> {
        if memberships.len() != cluster_ids.len() {
            return Err(LabellingError::LengthMismatch {
                memberships: memberships.len(),
                cluster_ids: cluster_ids.len(),
            });
        }

        let mut max_id: Option<i64> = None;
        for (index, (&membership, &id)) in memberships.iter().zip(&cluster_ids).enumerate() {
            match membership {
                Membership::Noise => {
                    if id != NOISE_ID {
                        return Err(LabellingError::NoiseClustered { index, id });
                    }
                }
                Membership::Core | Membership::Border => {
                    if id < 0 {
                        return Err(LabellingError::MemberUnclustered { index, membership });
                    }
                    max_id = Some(max_id.map_or(id, |current| current.max(id)));
                }
            }
        }

        let cluster_count = match max_id {
            None => 0,
            Some(max_id) => {
                let expected = (max_id + 1) as usize;
                let mut seen = vec![false; expected];
                for &id in cluster_ids.iter().filter(|&&id| id >= 0) {
                    seen[id as usize] = true;
                }
                if !seen[0] {
                    return Err(LabellingError::MissingZero);
                }
                if let Some(missing) = seen.iter().position(|&used| !used) {
                    return Err(LabellingError::Gap {
                        missing: missing as i64,
                    });
                }
                expected
            }
        };

        Ok(Self {
            memberships,
            cluster_ids,
            cluster_count,
        })
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    /// Returns whether the result covers no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    /// Returns the per-vertex memberships.
    #[must_use]
    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    /// Returns the per-vertex cluster ids; [`NOISE_ID`] marks Noise vertices.
    #[must_use]
    pub fn cluster_ids(&self) -> &[i64] {
        &self.cluster_ids
    }

    /// Counts the distinct clusters in the assignment.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }
}
