//! errors — crate-wide error type for dimensional causality inference.
//!
//! Purpose
//! -------
//! Provide a single error enum, [`CausalityError`], and result alias,
//! [`CausalityResult`], shared by the geometry, estimation, and pipeline
//! subtrees. Each variant carries just enough payload (offending value,
//! manifold, neighbourhood size) to make failures actionable without
//! leaking large buffers.
//!
//! Key behaviors
//! -------------
//! - Attach a human-readable `Display` message to every variant.
//! - Group variants into three coarse families via [`ErrorKind`]:
//!   malformed inputs ([`ErrorKind::InvalidParameters`]), too few points
//!   surviving trimming ([`ErrorKind::InsufficientData`]), and coincident
//!   or collapsed geometry ([`ErrorKind::DegenerateGeometry`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter-family errors are raised eagerly by
//!   `causality::validation` before any numerical work begins.
//! - `InsufficientData` and `DegenerateGeometry` are only raised from inside
//!   the per-k loop and always carry the offending `k`.
//!
//! Conventions
//! -----------
//! - Indices are 0-based.
//! - Messages are phrased in terms of domain constraints ("k must satisfy
//!   2 ≤ k < n'") rather than implementation details.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` embeds payloads and that
//!   [`CausalityError::kind`] maps every family correctly.
use crate::geometry::manifold::ManifoldKind;

/// Crate-wide result alias for operations that may produce [`CausalityError`].
pub type CausalityResult<T> = Result<T, CausalityError>;

/// ErrorKind — coarse classification of [`CausalityError`] variants.
///
/// Callers that only need to distinguish "fix your inputs" from "the data
/// does not support the requested k range" can match on this instead of on
/// individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameters,
    InsufficientData,
    DegenerateGeometry,
}

/// CausalityError — failure conditions for causal inference via dimensions.
///
/// Variants
/// --------
/// Input validation (all map to [`ErrorKind::InvalidParameters`]):
/// - `EmptySeries`, `LengthMismatch`, `NonFiniteData` for the raw series.
/// - `InvalidEmbeddingDimension`, `InvalidLag`, `InvalidDownsampleRate`,
///   `SeriesTooShort` for the embedding parameters.
/// - `EmptyKRange`, `KTooSmall`, `KTooLarge` for the neighbourhood range.
/// - `InvalidOutlierFraction`, `InvalidSpread`, `InvalidBins`,
///   `InvalidTolerance` for the estimation options.
/// - `EmptyManifold`, `ManifoldLengthMismatch`, `NonFiniteManifold` for
///   pre-embedded manifolds.
///
/// Runtime failures:
/// - `InsufficientData { k, retained }` when fewer than 2 points survive
///   trimming for some k.
/// - `DegenerateGeometry { k, manifold }` when every local-dimension
///   estimate of a manifold is non-finite for some k.
/// - `SingularCovariance { k }` when the fitted covariance stays non-positive
///   definite after regularisation.
#[derive(Debug, Clone, PartialEq)]
pub enum CausalityError {
    // ---- Raw series ----
    EmptySeries,
    LengthMismatch { x_len: usize, y_len: usize },
    NonFiniteData { series: &'static str, index: usize, value: f64 },

    // ---- Embedding parameters ----
    InvalidEmbeddingDimension { value: usize },
    InvalidLag { value: usize },
    InvalidDownsampleRate { value: usize },
    SeriesTooShort { len: usize, required: usize },

    // ---- Neighbourhood range ----
    EmptyKRange,
    KTooSmall { k: usize },
    KTooLarge { k: usize, points: usize },

    // ---- Estimation options ----
    InvalidOutlierFraction { value: f64 },
    InvalidSpread { value: f64 },
    InvalidBins { value: usize },
    InvalidTolerance { value: f64 },

    // ---- Pre-embedded manifolds ----
    EmptyManifold { manifold: ManifoldKind },
    ManifoldLengthMismatch { manifold: ManifoldKind, expected: usize, actual: usize },
    NonFiniteManifold { manifold: ManifoldKind, row: usize, col: usize, value: f64 },

    // ---- Per-k runtime failures ----
    InsufficientData { k: usize, retained: usize },
    DegenerateGeometry { k: usize, manifold: ManifoldKind },
    SingularCovariance { k: usize },
}

impl CausalityError {
    /// Coarse family of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CausalityError::InsufficientData { .. } => ErrorKind::InsufficientData,
            CausalityError::DegenerateGeometry { .. } | CausalityError::SingularCovariance { .. } => {
                ErrorKind::DegenerateGeometry
            }
            _ => ErrorKind::InvalidParameters,
        }
    }
}

impl std::error::Error for CausalityError {}

impl std::fmt::Display for CausalityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Raw series ----
            CausalityError::EmptySeries => write!(f, "Input series are empty."),
            CausalityError::LengthMismatch { x_len, y_len } => {
                write!(f, "Input series must have equal length; got x: {x_len}, y: {y_len}")
            }
            CausalityError::NonFiniteData { series, index, value } => {
                write!(f, "Series {series} has a non-finite value at index {index}: {value}")
            }
            // ---- Embedding parameters ----
            CausalityError::InvalidEmbeddingDimension { value } => {
                write!(f, "Embedding dimension must be ≥ 1; got: {value}")
            }
            CausalityError::InvalidLag { value } => {
                write!(f, "Embedding lag tau must be ≥ 1; got: {value}")
            }
            CausalityError::InvalidDownsampleRate { value } => {
                write!(f, "Downsample rate must be ≥ 1; got: {value}")
            }
            CausalityError::SeriesTooShort { len, required } => {
                write!(
                    f,
                    "Series of length {len} is too short for the embedding; need at least {required} observations"
                )
            }
            // ---- Neighbourhood range ----
            CausalityError::EmptyKRange => write!(f, "The k range must contain at least one value."),
            CausalityError::KTooSmall { k } => {
                write!(f, "Neighbourhood size k must be ≥ 2; got: {k}")
            }
            CausalityError::KTooLarge { k, points } => {
                write!(f, "Neighbourhood size k ({k}) must satisfy k < n' ({points} points)")
            }
            // ---- Estimation options ----
            CausalityError::InvalidOutlierFraction { value } => {
                write!(f, "Outlier fraction eps must satisfy 0 < eps < 1; got: {value}")
            }
            CausalityError::InvalidSpread { value } => {
                write!(f, "Spread multiplier c must be finite and > 0; got: {value}")
            }
            CausalityError::InvalidBins { value } => {
                write!(f, "Bin resolution must be ≥ 1; got: {value}")
            }
            CausalityError::InvalidTolerance { value } => {
                write!(f, "Region tolerance must satisfy 0 < tolerance < 1; got: {value}")
            }
            // ---- Pre-embedded manifolds ----
            CausalityError::EmptyManifold { manifold } => {
                write!(f, "Manifold {manifold} has no points or no coordinates.")
            }
            CausalityError::ManifoldLengthMismatch { manifold, expected, actual } => {
                write!(
                    f,
                    "Manifold {manifold} must have {expected} points to stay aligned; got {actual}"
                )
            }
            CausalityError::NonFiniteManifold { manifold, row, col, value } => {
                write!(f, "Manifold {manifold} has a non-finite coordinate at ({row}, {col}): {value}")
            }
            // ---- Per-k runtime failures ----
            CausalityError::InsufficientData { k, retained } => {
                write!(
                    f,
                    "Only {retained} points survived trimming for k = {k}; at least 2 are needed to fit a covariance"
                )
            }
            CausalityError::DegenerateGeometry { k, manifold } => {
                write!(
                    f,
                    "All local dimension estimates of manifold {manifold} are non-finite for k = {k} (coincident points)"
                )
            }
            CausalityError::SingularCovariance { k } => {
                write!(f, "Fitted covariance for k = {k} is not positive definite after regularisation")
            }
        }
    }
}
