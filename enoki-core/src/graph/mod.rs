//! Neighbourhood graph representations.
//!
//! The graph passes through two phases. During neighbour discovery it is a
//! mutable [`AdjacencyList`] holding one temporary row per vertex, in one of
//! two shapes: a dense bitset row (one bit per candidate, 64 at a time) or a
//! sparse index list. [`AdjacencyList::finalize`] consumes the temporary rows
//! and packs them into an immutable [`CsrGraph`]: a vertex offset/degree
//! table plus a single packed neighbour array.
//!
//! The mutable-to-immutable transition is expressed through ownership:
//! finalizing consumes the adjacency list, so inserting after finalize or
//! finalizing twice cannot be written, and the CSR graph exposes no mutators.

use std::fmt;

use rayon::prelude::*;
use thiserror::Error;

/// Resolved adjacency shape. [`NeighbourStore::Auto`](crate::NeighbourStore)
/// is resolved before construction, so the engine only ever sees a concrete
/// shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StoreKind {
    Bitset,
    Sparse,
}

/// Temporary per-vertex rows, in the shape fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Rows {
    /// `words_per_row` u64 words per vertex, flattened row-major. Bit `j` of
    /// word `i` in row `u` set means `64 * i + j` is a neighbour of `u`.
    Bitset {
        words_per_row: usize,
        bits: Vec<u64>,
    },
    /// One growable neighbour-index list per vertex, ascending.
    Sparse(Vec<Vec<u32>>),
}

/// Stable codes describing [`GraphError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum GraphErrorCode {
    /// An edge endpoint was not a valid vertex index.
    VertexOutOfBounds,
}

impl GraphErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VertexOutOfBounds => "GRAPH_VERTEX_OUT_OF_BOUNDS",
        }
    }
}

impl fmt::Display for GraphErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced by graph mutation.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// An edge endpoint was not a valid vertex index.
    #[error("vertex {vertex} is out of bounds for a graph of {len} vertices")]
    VertexOutOfBounds { vertex: usize, len: usize },
}

impl GraphError {
    /// Retrieve the stable [`GraphErrorCode`] for this error.
    pub const fn code(&self) -> GraphErrorCode {
        match self {
            Self::VertexOutOfBounds { .. } => GraphErrorCode::VertexOutOfBounds,
        }
    }
}

/// Mutable per-vertex adjacency under construction.
///
/// # Examples
/// ```
/// use enoki_core::AdjacencyList;
///
/// let mut adjacency = AdjacencyList::new_sparse(3);
/// adjacency.insert_edge(0, 1)?;
/// adjacency.insert_edge(1, 0)?;
/// let graph = adjacency.finalize();
/// assert_eq!(graph.degree(0), 1);
/// assert_eq!(graph.neighbours_of(0), &[1]);
/// assert_eq!(graph.degree(2), 0);
/// # Ok::<(), enoki_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AdjacencyList {
    len: usize,
    rows: Rows,
}

impl AdjacencyList {
    /// Creates an empty adjacency in the bitset shape.
    #[must_use]
    pub fn new_bitset(len: usize) -> Self {
        let words_per_row = len.div_ceil(64);
        Self {
            len,
            rows: Rows::Bitset {
                words_per_row,
                bits: vec![0; len * words_per_row],
            },
        }
    }

    /// Creates an empty adjacency in the sparse shape.
    #[must_use]
    pub fn new_sparse(len: usize) -> Self {
        Self {
            len,
            rows: Rows::Sparse(vec![Vec::new(); len]),
        }
    }

    pub(crate) fn new(len: usize, store: StoreKind) -> Self {
        match store {
            StoreKind::Bitset => Self::new_bitset(len),
            StoreKind::Sparse => Self::new_sparse(len),
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records `v` as a neighbour of `u`.
    ///
    /// The neighbourhood relation is directed at this level; symmetric
    /// relations are obtained by inserting both orientations, as the
    /// discovery engine does. Self pairs are ignored so the finalized
    /// relation stays irreflexive.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfBounds`] when either endpoint is not
    /// a valid vertex index.
    pub fn insert_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        let len = self.len;
        for vertex in [u, v] {
            if vertex >= len {
                return Err(GraphError::VertexOutOfBounds { vertex, len });
            }
        }
        if u == v {
            return Ok(());
        }
        match &mut self.rows {
            Rows::Bitset {
                words_per_row,
                bits,
            } => {
                bits[u * *words_per_row + v / 64] |= 1u64 << (v % 64);
            }
            Rows::Sparse(rows) => {
                let row = &mut rows[u];
                let index = v as u32;
                // Keep rows ascending so both shapes finalize identically.
                if let Err(slot) = row.binary_search(&index) {
                    row.insert(slot, index);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Rows {
        &mut self.rows
    }

    /// Packs the temporary rows into an immutable CSR graph.
    ///
    /// Degrees are computed in parallel, offsets by a serial exclusive
    /// prefix sum, and the neighbour array is filled by a parallel scatter
    /// into per-vertex slices. The slices are disjoint by the prefix sum, so
    /// the scatter needs no synchronization.
    #[must_use]
    pub fn finalize(self) -> CsrGraph {
        let len = self.len;
        let degrees: Vec<usize> = match &self.rows {
            Rows::Bitset {
                words_per_row,
                bits,
            } => {
                if *words_per_row == 0 {
                    vec![0; len]
                } else {
                    bits.par_chunks(*words_per_row)
                        .map(|row| row.iter().map(|word| word.count_ones() as usize).sum())
                        .collect()
                }
            }
            Rows::Sparse(rows) => rows.par_iter().map(Vec::len).collect(),
        };

        let mut offsets = Vec::with_capacity(len);
        let mut total = 0usize;
        for &degree in &degrees {
            offsets.push(total);
            total += degree;
        }

        let mut neighbours = vec![0u32; total];
        if total > 0 {
            let mut slices: Vec<&mut [u32]> = Vec::with_capacity(len);
            let mut rest = neighbours.as_mut_slice();
            for &degree in &degrees {
                let (row, tail) = rest.split_at_mut(degree);
                slices.push(row);
                rest = tail;
            }

            match &self.rows {
                Rows::Bitset {
                    words_per_row,
                    bits,
                } => {
                    slices
                        .into_par_iter()
                        .zip(bits.par_chunks(*words_per_row))
                        .for_each(|(slot, row)| scatter_bitset_row(slot, row));
                }
                Rows::Sparse(rows) => {
                    slices
                        .into_par_iter()
                        .zip(rows.par_iter())
                        .for_each(|(slot, row)| slot.copy_from_slice(row));
                }
            }
        }

        CsrGraph {
            offsets,
            degrees,
            neighbours,
        }
    }
}

/// Expands one bitset row into ascending neighbour indices.
fn scatter_bitset_row(slot: &mut [u32], row: &[u64]) {
    let mut cursor = 0;
    for (index, &word) in row.iter().enumerate() {
        let mut word = word;
        while word != 0 {
            let bit = word.trailing_zeros() as usize;
            slot[cursor] = (index * 64 + bit) as u32;
            cursor += 1;
            word &= word - 1;
        }
    }
    debug_assert_eq!(cursor, slot.len());
}

/// Immutable neighbourhood graph in compressed-sparse-row form.
///
/// `offsets[u]` is the start of vertex `u`'s neighbour run in the packed
/// array and `degrees[u]` its length; `offsets[u] + degrees[u] ==
/// offsets[u + 1]` for every `u` below the last vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrGraph {
    offsets: Vec<usize>,
    degrees: Vec<usize>,
    neighbours: Vec<u32>,
}

impl CsrGraph {
    /// Returns the number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.degrees.len()
    }

    /// Returns the number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns the degree of vertex `u`.
    ///
    /// # Panics
    /// Panics when `u` is out of bounds.
    #[must_use]
    pub fn degree(&self, u: usize) -> usize {
        self.degrees[u]
    }

    /// Returns the neighbours of vertex `u` in ascending order.
    ///
    /// # Panics
    /// Panics when `u` is out of bounds.
    #[must_use]
    pub fn neighbours_of(&self, u: usize) -> &[u32] {
        let start = self.offsets[u];
        &self.neighbours[start..start + self.degrees[u]]
    }

    /// The per-vertex start offsets into the packed neighbour array.
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The per-vertex degrees.
    #[must_use]
    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }
}

#[cfg(test)]
mod tests;
