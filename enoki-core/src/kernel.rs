//! Range-test kernels.
//!
//! A kernel tests eight consecutive candidate points against the squared
//! search radius in one call and reports the outcome as an 8-bit mask (bit
//! `k` set means candidate `v0 + k` is within range). The caller is
//! responsible for discarding the self pair and any lanes at or beyond the
//! logical point count; padding guarantees the eight loads are always
//! in-bounds.
//!
//! Two implementations with identical semantics are provided: a portable
//! scalar loop and an AVX2 path selected by runtime feature detection.

use crate::{builder::DistanceKernel, error::EnokiError, points::LANES};

/// A resolved kernel implementation. Constructed through [`Kernel::resolve`],
/// which performs host feature detection, so the vector variant is only ever
/// instantiated on hosts that support it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kernel {
    Scalar,
    #[cfg(target_arch = "x86_64")]
    Avx2,
}

impl Kernel {
    /// Resolves a requested kernel selection against the host.
    ///
    /// `Auto` prefers the vector implementation when the host advertises it;
    /// an explicit `Wide` request on an unsupported host is a configuration
    /// error.
    pub(crate) fn resolve(requested: DistanceKernel) -> Result<Self, EnokiError> {
        match requested {
            DistanceKernel::Scalar => Ok(Self::Scalar),
            DistanceKernel::Auto => {
                #[cfg(target_arch = "x86_64")]
                if is_x86_feature_detected!("avx2") {
                    return Ok(Self::Avx2);
                }
                Ok(Self::Scalar)
            }
            DistanceKernel::Wide => {
                #[cfg(target_arch = "x86_64")]
                if is_x86_feature_detected!("avx2") {
                    return Ok(Self::Avx2);
                }
                Err(EnokiError::KernelUnavailable { requested })
            }
        }
    }

    /// Reports the resolved kernel in public-API terms.
    pub(crate) fn as_public(self) -> DistanceKernel {
        match self {
            Self::Scalar => DistanceKernel::Scalar,
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => DistanceKernel::Wide,
        }
    }

    /// Tests the candidate block `[v0, v0 + 8)` against `squared_radius`.
    ///
    /// `v0` must be a multiple of eight and `v0 + 8` must not exceed the
    /// padded slice length.
    #[inline]
    pub(crate) fn test_block(
        self,
        xs: &[f32],
        ys: &[f32],
        v0: usize,
        ux: f32,
        uy: f32,
        squared_radius: f32,
    ) -> u8 {
        debug_assert!(v0 % LANES == 0);
        debug_assert!(v0 + LANES <= xs.len() && v0 + LANES <= ys.len());
        match self {
            Self::Scalar => test_block_scalar(xs, ys, v0, ux, uy, squared_radius),
            #[cfg(target_arch = "x86_64")]
            // SAFETY: `resolve` only yields `Avx2` after feature detection
            // succeeded, and the caller upholds the slice bounds above.
            Self::Avx2 => unsafe { test_block_avx2(xs, ys, v0, ux, uy, squared_radius) },
        }
    }
}

fn test_block_scalar(
    xs: &[f32],
    ys: &[f32],
    v0: usize,
    ux: f32,
    uy: f32,
    squared_radius: f32,
) -> u8 {
    let mut mask = 0u8;
    for lane in 0..LANES {
        let dx = ux - xs[v0 + lane];
        let dy = uy - ys[v0 + lane];
        if dx * dx + dy * dy <= squared_radius {
            mask |= 1 << lane;
        }
    }
    mask
}

/// # Safety
/// The host must support AVX2 and `v0 + 8` must be within both slices.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn test_block_avx2(
    xs: &[f32],
    ys: &[f32],
    v0: usize,
    ux: f32,
    uy: f32,
    squared_radius: f32,
) -> u8 {
    use std::arch::x86_64::{
        _CMP_LE_OS, _mm256_add_ps, _mm256_cmp_ps, _mm256_loadu_ps, _mm256_movemask_ps,
        _mm256_mul_ps, _mm256_set1_ps, _mm256_sub_ps,
    };

    let ux8 = _mm256_set1_ps(ux);
    let uy8 = _mm256_set1_ps(uy);
    let radius8 = _mm256_set1_ps(squared_radius);

    let vx8 = _mm256_loadu_ps(xs.as_ptr().add(v0));
    let vy8 = _mm256_loadu_ps(ys.as_ptr().add(v0));

    let dx = _mm256_sub_ps(ux8, vx8);
    let dy = _mm256_sub_ps(uy8, vy8);
    let sum = _mm256_add_ps(_mm256_mul_ps(dx, dx), _mm256_mul_ps(dy, dy));

    let within = _mm256_cmp_ps::<_CMP_LE_OS>(sum, radius8);
    _mm256_movemask_ps(within) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(values: &[f32]) -> Vec<f32> {
        let mut padded = values.to_vec();
        padded.resize(values.len().div_ceil(LANES) * LANES, 0.0);
        padded
    }

    #[test]
    fn scalar_flags_candidates_within_radius() {
        let xs = padded(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let ys = padded(&[0.0; 8]);

        // From the origin with r² = 4.25: candidates 0, 1, 2 are in range.
        let mask = test_block_scalar(&xs, &ys, 0, 0.0, 0.0, 4.25);
        assert_eq!(mask, 0b0000_0111);
    }

    #[test]
    fn scalar_accepts_boundary_distance() {
        let xs = padded(&[2.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
        let ys = padded(&[0.0; 8]);

        // d² == r² counts as within range.
        let mask = test_block_scalar(&xs, &ys, 0, 0.0, 0.0, 4.0);
        assert_eq!(mask, 0b0000_0001);
    }

    #[test]
    fn scalar_reports_self_lane_as_in_range() {
        // Zero distance passes the test; clearing the self bit is the
        // caller's responsibility.
        let xs = padded(&[5.0; 8]);
        let ys = padded(&[5.0; 8]);
        let mask = test_block_scalar(&xs, &ys, 0, 5.0, 5.0, 0.01);
        assert_eq!(mask, 0b1111_1111);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn wide_matches_scalar() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }

        let xs = padded(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0]);
        let ys = padded(&[0.0, 1.0, -1.0, 2.0, 0.0, -2.0, 3.0, 0.5, 1.5, -0.5, 0.0]);

        for v0 in [0, 8] {
            for &squared_radius in &[0.0, 1.0, 2.25, 9.0, 100.0] {
                let scalar = test_block_scalar(&xs, &ys, v0, 1.0, 0.5, squared_radius);
                let wide =
                    unsafe { test_block_avx2(&xs, &ys, v0, 1.0, 0.5, squared_radius) };
                assert_eq!(scalar, wide, "v0={v0} r²={squared_radius}");
            }
        }
    }
}
