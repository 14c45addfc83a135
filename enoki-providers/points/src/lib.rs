//! Whitespace-text ingestion for Enoki point sets.
//!
//! The format is a plain stream of whitespace-separated tokens: the first
//! token is the point count `N`, followed by exactly `N` records of
//! `index x y`. Records may appear in any order, and the indices must cover
//! `[0, N)` exactly. Any deviation fails fast with a typed error.

use std::{
    fs::File,
    io::{self, Read},
    num::{ParseFloatError, ParseIntError},
    path::Path,
    str::SplitWhitespace,
};

use thiserror::Error;

use enoki_core::PointSet;

/// An error produced while reading a points file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PointsFileError {
    /// Reading the underlying stream failed.
    #[error("failed to read points input: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
    /// The input contained no tokens.
    #[error("missing point count")]
    MissingCount,
    /// The first token did not parse as a point count.
    #[error("invalid point count `{token}`: {source}")]
    InvalidCount {
        token: String,
        #[source]
        source: ParseIntError,
    },
    /// The point count was zero.
    #[error("point count must be at least 1")]
    ZeroPoints,
    /// A record ended before its three tokens were read.
    #[error("record {record} is truncated (expected `index x y`)")]
    TruncatedRecord { record: usize },
    /// A record's index token did not parse.
    #[error("invalid index `{token}` in record {record}: {source}")]
    InvalidIndex {
        token: String,
        record: usize,
        #[source]
        source: ParseIntError,
    },
    /// A record's coordinate token did not parse.
    #[error("invalid coordinate `{token}` in record {record}: {source}")]
    InvalidCoordinate {
        token: String,
        record: usize,
        #[source]
        source: ParseFloatError,
    },
    /// A record named an index at or beyond the declared count.
    #[error("index {index} is out of range for {count} points")]
    IndexOutOfRange { index: usize, count: usize },
    /// Two records named the same index.
    #[error("index {index} appears more than once")]
    DuplicateIndex { index: usize },
    /// A record carried a NaN or infinite coordinate.
    #[error("coordinates of point {index} are not finite")]
    NonFiniteCoordinate { index: usize },
    /// Tokens remained after the declared record count.
    #[error("unexpected trailing token `{token}` after {count} records")]
    TrailingToken { token: String, count: usize },
}

/// Parses a points file from an in-memory string.
///
/// # Errors
/// Returns a [`PointsFileError`] describing the first deviation from the
/// format.
///
/// # Examples
/// ```
/// use enoki_providers_points::parse_points;
///
/// let points = parse_points("3\n0 0.0 0.0\n2 1.5 -1.5\n1 1.0 1.0")?;
/// assert_eq!(points.len(), 3);
/// assert_eq!(points.get(2), (1.5, -1.5));
/// # Ok::<(), enoki_providers_points::PointsFileError>(())
/// ```
pub fn parse_points(text: &str) -> Result<PointSet, PointsFileError> {
    let mut tokens = text.split_whitespace();

    let token = tokens.next().ok_or(PointsFileError::MissingCount)?;
    let count: usize = token.parse().map_err(|source| PointsFileError::InvalidCount {
        token: token.to_owned(),
        source,
    })?;
    if count == 0 {
        return Err(PointsFileError::ZeroPoints);
    }

    let mut points = PointSet::new(count);
    let mut seen = vec![false; count];
    for record in 0..count {
        let token = next_field(&mut tokens, record)?;
        let index: usize = token.parse().map_err(|source| PointsFileError::InvalidIndex {
            token: token.to_owned(),
            record,
            source,
        })?;
        let x = parse_coordinate(&mut tokens, record)?;
        let y = parse_coordinate(&mut tokens, record)?;

        if index >= count {
            return Err(PointsFileError::IndexOutOfRange { index, count });
        }
        if seen[index] {
            return Err(PointsFileError::DuplicateIndex { index });
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(PointsFileError::NonFiniteCoordinate { index });
        }
        seen[index] = true;
        points.set(index, x, y);
    }

    if let Some(extra) = tokens.next() {
        return Err(PointsFileError::TrailingToken {
            token: extra.to_owned(),
            count,
        });
    }

    // Exactly `count` unique in-range indices were recorded, so the indices
    // cover [0, count) by counting.
    Ok(points)
}

/// Reads and parses a points file from an arbitrary reader.
///
/// # Errors
/// Returns [`PointsFileError::Io`] on read failures, otherwise the same
/// errors as [`parse_points`].
pub fn read_points<R: Read>(mut reader: R) -> Result<PointSet, PointsFileError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_points(&text)
}

/// Reads and parses a points file from a filesystem path.
///
/// # Errors
/// Same as [`read_points`].
pub fn read_points_path(path: impl AsRef<Path>) -> Result<PointSet, PointsFileError> {
    read_points(File::open(path)?)
}

fn next_field<'a>(
    tokens: &mut SplitWhitespace<'a>,
    record: usize,
) -> Result<&'a str, PointsFileError> {
    tokens
        .next()
        .ok_or(PointsFileError::TruncatedRecord { record })
}

fn parse_coordinate(
    tokens: &mut SplitWhitespace<'_>,
    record: usize,
) -> Result<f32, PointsFileError> {
    let token = next_field(tokens, record)?;
    token
        .parse()
        .map_err(|source| PointsFileError::InvalidCoordinate {
            token: token.to_owned(),
            record,
            source,
        })
}
