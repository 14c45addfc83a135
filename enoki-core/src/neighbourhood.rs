//! Parallel neighbour discovery.
//!
//! Scans every ordered pair `(u, v)` and records `v` as a neighbour of `u`
//! when `u ≠ v` and the squared distance is within the squared radius. The
//! vertex range is partitioned into contiguous chunks of `⌈N/T⌉`, one per
//! worker; each worker writes only into its own rows, so the stage needs no
//! synchronization. The inner loop walks candidates eight at a time through
//! the range-test kernel.

use std::num::NonZeroUsize;

use rayon::prelude::*;

use crate::{
    graph::{AdjacencyList, Rows, StoreKind},
    kernel::Kernel,
    points::{LANES, PointSet},
};

/// Builds the temporary adjacency for `points` under the configured shape.
///
/// Must run inside the pool that owns the configured worker count.
pub(crate) fn build_adjacency(
    points: &PointSet,
    squared_radius: f32,
    store: StoreKind,
    kernel: Kernel,
    threads: NonZeroUsize,
) -> AdjacencyList {
    let len = points.len();
    let mut adjacency = AdjacencyList::new(len, store);
    if len == 0 {
        return adjacency;
    }

    let chunk = len.div_ceil(threads.get());
    let xs = points.padded_xs();
    let ys = points.padded_ys();

    match adjacency.rows_mut() {
        Rows::Bitset {
            words_per_row,
            bits,
        } => {
            let words_per_row = *words_per_row;
            bits.par_chunks_mut(chunk * words_per_row)
                .enumerate()
                .for_each(|(worker, owned)| {
                    let first = worker * chunk;
                    for (offset, row) in owned.chunks_mut(words_per_row).enumerate() {
                        fill_bitset_row(xs, ys, len, first + offset, squared_radius, kernel, row);
                    }
                });
        }
        Rows::Sparse(rows) => {
            rows.par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(worker, owned)| {
                    let first = worker * chunk;
                    for (offset, row) in owned.iter_mut().enumerate() {
                        fill_sparse_row(xs, ys, len, first + offset, squared_radius, kernel, row);
                    }
                });
        }
    }
    adjacency
}

/// Walks row `u` as (word index, bit offset in {0, 8, …, 56}) and ORs each
/// surviving block mask into place.
fn fill_bitset_row(
    xs: &[f32],
    ys: &[f32],
    len: usize,
    u: usize,
    squared_radius: f32,
    kernel: Kernel,
    row: &mut [u64],
) {
    let (ux, uy) = (xs[u], ys[u]);
    for (outer, word) in row.iter_mut().enumerate() {
        let word_first = outer * 64;
        if word_first >= len {
            break;
        }
        for inner in (0..64).step_by(LANES) {
            let v0 = word_first + inner;
            if v0 >= len {
                break;
            }
            let mask = masked_block(kernel, xs, ys, len, u, v0, ux, uy, squared_radius);
            *word |= u64::from(mask) << inner;
        }
    }
}

fn fill_sparse_row(
    xs: &[f32],
    ys: &[f32],
    len: usize,
    u: usize,
    squared_radius: f32,
    kernel: Kernel,
    row: &mut Vec<u32>,
) {
    let (ux, uy) = (xs[u], ys[u]);
    for v0 in (0..len).step_by(LANES) {
        let mut mask = masked_block(kernel, xs, ys, len, u, v0, ux, uy, squared_radius);
        while mask != 0 {
            let lane = mask.trailing_zeros() as usize;
            row.push((v0 + lane) as u32);
            mask &= mask - 1;
        }
    }
}

/// Tests one 8-candidate block, then clears the self lane and any lanes at
/// or beyond the point count. Padding lanes always fall to the tail mask, so
/// the padded coordinates never produce edges.
#[inline]
fn masked_block(
    kernel: Kernel,
    xs: &[f32],
    ys: &[f32],
    len: usize,
    u: usize,
    v0: usize,
    ux: f32,
    uy: f32,
    squared_radius: f32,
) -> u8 {
    let mut mask = kernel.test_block(xs, ys, v0, ux, uy, squared_radius);
    if u >= v0 && u < v0 + LANES {
        mask &= !(1u8 << (u - v0));
    }
    let tail = len - v0;
    if tail < LANES {
        mask &= (1u8 << tail) - 1;
    }
    mask
}
