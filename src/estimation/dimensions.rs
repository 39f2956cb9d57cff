//! estimation::dimensions — per-point local intrinsic dimension estimates.
//!
//! Purpose
//! -------
//! Convert a [`NeighborTable`] into one intrinsic-dimension estimate per
//! point using the maximum-likelihood estimator over the first `k`
//! neighbour distances:
//!
//! ```text
//! D_i = (k − 1) / Σ_{j=1}^{k−1} ln(r_k / r_j)
//! ```
//!
//! where `r_1 ≤ … ≤ r_k` are the sorted neighbour distances of point `i`.
//!
//! Key behaviors
//! -------------
//! - A zero nearest distance (duplicate point) yields `NaN`.
//! - A zero log-ratio sum (all `k` distances equal) yields `+∞`.
//! - Both sentinels are left in place for `estimation::trimming` to drop.
//! - Uniformly rescaling the manifold leaves every estimate unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - `2 ≤ k ≤ k_max` of the table.
//! - The table rows are non-decreasing.
use crate::{
    errors::{CausalityError, CausalityResult},
    geometry::neighbors::NeighborTable,
};
use ndarray::{Array1, ArrayView1, s};

/// `LocalDimensions` — dimension estimates of one manifold at one `k`.
///
/// Fields
/// ------
/// - `k`: `usize`
///   Neighbourhood size used for every estimate.
/// - `values`: `Array1<f64>`
///   One estimate per point, indexed by time; may contain `NaN` or `+∞`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDimensions {
    k: usize,
    values: Array1<f64>,
}

impl LocalDimensions {
    /// Wrap externally computed estimates.
    pub fn from_parts(k: usize, values: Array1<f64>) -> Self {
        LocalDimensions { k, values }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of `NaN`/`±∞` estimates.
    pub fn non_finite_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}

/// Estimate the local dimension of every point from its first `k`
/// neighbour distances.
///
/// Errors
/// ------
/// - `CausalityError::KTooSmall` if `k < 2`.
/// - `CausalityError::KTooLarge` if `k` exceeds the table's `k_max`.
pub fn local_dimensions(table: &NeighborTable, k: usize) -> CausalityResult<LocalDimensions> {
    if k < 2 {
        return Err(CausalityError::KTooSmall { k });
    }
    if k > table.k_max() {
        return Err(CausalityError::KTooLarge { k, points: table.len() });
    }

    let values = table
        .distances()
        .rows()
        .into_iter()
        .map(|row| ml_estimate(row.slice(s![..k])))
        .collect::<Array1<f64>>();
    Ok(LocalDimensions { k, values })
}

fn ml_estimate(radii: ArrayView1<f64>) -> f64 {
    let k = radii.len();
    let r_k = radii[k - 1];
    if radii[0] == 0.0 {
        return f64::NAN;
    }
    let log_sum: f64 = radii.iter().take(k - 1).map(|&r_j| (r_k / r_j).ln()).sum();
    if log_sum == 0.0 {
        return f64::INFINITY;
    }
    (k - 1) as f64 / log_sum
}
