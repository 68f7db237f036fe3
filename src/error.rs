use thiserror::Error;

use crate::geometry::AxisDirection;

/// Top-level error type for layer construction and volume transforms.
#[derive(Debug, Error)]
pub enum TrackGeoError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Binning(#[from] BinningError),
}

/// Coarse classification of a [`TrackGeoError`], as reported to the
/// geometry-assembly caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty surface set, inconsistent or degenerate bounds, bad envelopes.
    InvalidGeometryInput,
    /// Zero bin count or malformed arbitrary boundaries.
    InvalidBinningSpec,
}

impl TrackGeoError {
    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Geometry(_) => ErrorKind::InvalidGeometryInput,
            Self::Binning(_) => ErrorKind::InvalidBinningSpec,
        }
    }
}

/// Errors related to geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("surface collection is empty")]
    EmptySurfaceSet,

    #[error("invalid {what} bounds: min {min} must be below max {max}")]
    InvalidBounds {
        what: &'static str,
        min: f64,
        max: f64,
    },

    #[error("envelope along {axis} must be finite and non-negative, got {value}")]
    NegativeEnvelope { axis: AxisDirection, value: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("transform contains non-finite components")]
    NonFiniteTransform,

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to binning specifications.
#[derive(Debug, Error)]
pub enum BinningError {
    #[error("binning along {axis} needs at least one bin")]
    ZeroBins { axis: AxisDirection },

    #[error("arbitrary binning along {axis} needs at least two boundaries, got {count}")]
    TooFewBoundaries { axis: AxisDirection, count: usize },

    #[error("boundaries along {axis} are not strictly increasing at index {index}")]
    NonIncreasingBoundaries { axis: AxisDirection, index: usize },

    #[error("boundary {index} along {axis} is not finite")]
    NonFiniteBoundary { axis: AxisDirection, index: usize },

    #[error("periodic binning along {axis} must span {period}, got {span}")]
    PeriodMismatch {
        axis: AxisDirection,
        period: f64,
        span: f64,
    },
}

/// Convenience type alias for results using [`TrackGeoError`].
pub type Result<T> = std::result::Result<T, TrackGeoError>;
