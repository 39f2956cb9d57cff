//! geometry::manifold — point-cloud containers for the four manifolds.
//!
//! Purpose
//! -------
//! Provide validated, explicitly shaped containers for the delay-embedded
//! point clouds consumed by the neighbour search. A [`Manifold`] is an
//! `n' × dims` matrix (rows = time index, columns = coordinates), and a
//! [`ManifoldSet`] bundles the four manifolds of one inference call while
//! enforcing their row alignment.
//!
//! Key behaviors
//! -------------
//! - [`Manifold::new`] rejects empty and non-finite point clouds.
//! - [`ManifoldSet::new`] rejects sets whose manifolds disagree on the
//!   number of points, so row `i` always denotes the same time index.
//! - [`ManifoldKind`] names the four slots (X, Y, joint J, cross Z) and
//!   fixes their axis order in every downstream 4-vector.
//!
//! Invariants & assumptions
//! ------------------------
//! - `points.nrows() ≥ 1`, `points.ncols() ≥ 1`, all entries finite.
//! - All four manifolds of a set share `nrows()`; column counts may differ
//!   (the joint manifold carries both embeddings side by side).
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction failures and the alignment guard.
use crate::errors::{CausalityError, CausalityResult};
use ndarray::Array2;

/// ManifoldKind — slot of a manifold in a [`ManifoldSet`].
///
/// The discriminant is the axis index used for dimension-estimate tuples,
/// Gaussian means, and diagnostic exports: X = 0, Y = 1, Joint = 2,
/// Cross = 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifoldKind {
    X,
    Y,
    Joint,
    Cross,
}

impl ManifoldKind {
    /// All four kinds in axis order.
    pub const ALL: [ManifoldKind; 4] =
        [ManifoldKind::X, ManifoldKind::Y, ManifoldKind::Joint, ManifoldKind::Cross];

    /// Axis index of this manifold in 4-vectors.
    pub fn axis(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ManifoldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ManifoldKind::X => "X",
            ManifoldKind::Y => "Y",
            ManifoldKind::Joint => "J",
            ManifoldKind::Cross => "Z",
        };
        write!(f, "{label}")
    }
}

/// `Manifold` — validated point cloud of shape `n' × dims`.
///
/// Fields
/// ------
/// - `kind`: [`ManifoldKind`]
///   Slot this manifold occupies; used for error reporting and logging.
/// - `points`: `Array2<f64>`
///   Row-major point cloud; row `i` is the delay vector at time index `i`.
///
/// Invariants
/// ----------
/// - At least one point and one coordinate; every coordinate is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifold {
    kind: ManifoldKind,
    points: Array2<f64>,
}

impl Manifold {
    /// Construct a validated [`Manifold`].
    ///
    /// Errors
    /// ------
    /// - `CausalityError::EmptyManifold` if `points` has no rows or no columns.
    /// - `CausalityError::NonFiniteManifold` for the first NaN/±∞ coordinate.
    pub fn new(kind: ManifoldKind, points: Array2<f64>) -> CausalityResult<Self> {
        if points.nrows() == 0 || points.ncols() == 0 {
            return Err(CausalityError::EmptyManifold { manifold: kind });
        }
        for ((row, col), &value) in points.indexed_iter() {
            if !value.is_finite() {
                return Err(CausalityError::NonFiniteManifold { manifold: kind, row, col, value });
            }
        }
        Ok(Manifold { kind, points })
    }

    pub fn kind(&self) -> ManifoldKind {
        self.kind
    }

    /// Point cloud view, rows = time index.
    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    /// Number of points `n'`.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Number of coordinates per point.
    pub fn dims(&self) -> usize {
        self.points.ncols()
    }
}

/// `ManifoldSet` — the four row-aligned manifolds of one inference call.
///
/// Invariants
/// ----------
/// - `manifolds[a].kind()` equals `ManifoldKind::ALL[a]`.
/// - All four manifolds have the same number of points.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifoldSet {
    manifolds: [Manifold; 4],
}

impl ManifoldSet {
    /// Bundle four point clouds, validating each and their alignment.
    ///
    /// Parameters
    /// ----------
    /// - `x`, `y`: `Array2<f64>`
    ///   Individual embeddings of the two series.
    /// - `joint`: `Array2<f64>`
    ///   Joint embedding of both series.
    /// - `cross`: `Array2<f64>`
    ///   Cross manifold (by default the embedding of the standardized sum).
    ///
    /// Errors
    /// ------
    /// - Any error of [`Manifold::new`].
    /// - `CausalityError::ManifoldLengthMismatch` if a manifold's row count
    ///   differs from that of `x`.
    pub fn new(
        x: Array2<f64>, y: Array2<f64>, joint: Array2<f64>, cross: Array2<f64>,
    ) -> CausalityResult<Self> {
        let manifolds = [
            Manifold::new(ManifoldKind::X, x)?,
            Manifold::new(ManifoldKind::Y, y)?,
            Manifold::new(ManifoldKind::Joint, joint)?,
            Manifold::new(ManifoldKind::Cross, cross)?,
        ];
        let expected = manifolds[0].len();
        for manifold in &manifolds[1..] {
            if manifold.len() != expected {
                return Err(CausalityError::ManifoldLengthMismatch {
                    manifold: manifold.kind(),
                    expected,
                    actual: manifold.len(),
                });
            }
        }
        Ok(ManifoldSet { manifolds })
    }

    /// Shared point count `n'`.
    pub fn len(&self) -> usize {
        self.manifolds[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifolds[0].is_empty()
    }

    pub fn get(&self, kind: ManifoldKind) -> &Manifold {
        &self.manifolds[kind.axis()]
    }

    /// All four manifolds in axis order.
    pub fn as_array(&self) -> &[Manifold; 4] {
        &self.manifolds
    }
}
