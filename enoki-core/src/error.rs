//! Error types for the Enoki core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::builder::DistanceKernel;

/// Stable codes describing [`EnokiError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum EnokiErrorCode {
    /// `min_pts` must be greater than zero.
    InvalidMinPts,
    /// The search radius must be positive and finite.
    InvalidRadius,
    /// The worker count must be greater than zero.
    InvalidThreads,
    /// The requested distance kernel is unavailable on this host.
    KernelUnavailable,
    /// The supplied point set contained no points.
    EmptyPointSet,
    /// The worker thread pool could not be constructed.
    ThreadPoolFailure,
}

impl EnokiErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidMinPts => "ENOKI_INVALID_MIN_PTS",
            Self::InvalidRadius => "ENOKI_INVALID_RADIUS",
            Self::InvalidThreads => "ENOKI_INVALID_THREADS",
            Self::KernelUnavailable => "ENOKI_KERNEL_UNAVAILABLE",
            Self::EmptyPointSet => "ENOKI_EMPTY_POINT_SET",
            Self::ThreadPoolFailure => "ENOKI_THREAD_POOL_FAILURE",
        }
    }
}

impl fmt::Display for EnokiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced when configuring or running [`Enoki`](crate::Enoki).
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EnokiError {
    /// `min_pts` must be greater than zero.
    #[error("min_pts must be at least 1 (got {got})")]
    InvalidMinPts { got: usize },
    /// The search radius must be positive and finite.
    #[error("radius must be positive and finite (got {got})")]
    InvalidRadius { got: f32 },
    /// The worker count must be greater than zero.
    #[error("threads must be at least 1 (got {got})")]
    InvalidThreads { got: usize },
    /// The requested distance kernel is unavailable on this host.
    #[error("the requested distance kernel {requested:?} is not supported on this host")]
    KernelUnavailable { requested: DistanceKernel },
    /// The supplied point set contained no points.
    #[error("point set contains no points")]
    EmptyPointSet,
    /// The worker thread pool could not be constructed.
    #[error("failed to build the worker thread pool: {message}")]
    ThreadPoolFailure { message: Arc<str> },
}

impl EnokiError {
    /// Retrieve the stable [`EnokiErrorCode`] for this error.
    pub const fn code(&self) -> EnokiErrorCode {
        match self {
            Self::InvalidMinPts { .. } => EnokiErrorCode::InvalidMinPts,
            Self::InvalidRadius { .. } => EnokiErrorCode::InvalidRadius,
            Self::InvalidThreads { .. } => EnokiErrorCode::InvalidThreads,
            Self::KernelUnavailable { .. } => EnokiErrorCode::KernelUnavailable,
            Self::EmptyPointSet => EnokiErrorCode::EmptyPointSet,
            Self::ThreadPoolFailure { .. } => EnokiErrorCode::ThreadPoolFailure,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, EnokiError>;
