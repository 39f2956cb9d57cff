//! estimation::trimming — joint outlier filter over the four estimate arrays.
//!
//! Purpose
//! -------
//! Reduce the four per-manifold dimension estimates at one `k` to a clean,
//! row-aligned `m × 4` sample for Gaussian fitting. Rows (time indices) are
//! kept or dropped as a unit, so column `a` of the output is always the
//! estimate of manifold `a` at the same time index as the other columns.
//!
//! Key behaviors
//! -------------
//! - Every row with a non-finite estimate in any manifold is dropped first.
//! - Among the `m_f` remaining rows, outlyingness is the largest robust
//!   z-score `|D − median| / MAD` across the four manifolds.
//! - The `⌊eps · m_f⌋` most outlying rows are dropped; ties go to the
//!   lower time index first.
//! - Retained rows are returned in ascending time order.
//!
//! Invariants & assumptions
//! ------------------------
//! - The four inputs share `k` and length.
//! - `0 < eps < 1` (checked by `causality::validation`).
//! - A MAD of zero is floored at machine precision relative to the median,
//!   so identical estimates never produce infinite scores.
use crate::{
    errors::{CausalityError, CausalityResult},
    estimation::dimensions::LocalDimensions,
    geometry::manifold::ManifoldKind,
};
use ndarray::Array2;
use statrs::statistics::{Data, Median};
use std::cmp::Ordering;

/// `TrimmedSample` — retained estimate rows for one `k`.
///
/// Fields
/// ------
/// - `k`: `usize`
///   Neighbourhood size the estimates were computed at.
/// - `indices`: `Vec<usize>`
///   Retained time indices, strictly ascending.
/// - `values`: `Array2<f64>`
///   Shape `m × 4`; row `r` holds the X, Y, J, Z estimates at `indices[r]`.
/// - `dropped_non_finite`: `usize`
///   Rows removed because some estimate was `NaN`/`±∞`.
/// - `dropped_outliers`: `usize`
///   Rows removed by the robust-score cut.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedSample {
    pub k: usize,
    pub indices: Vec<usize>,
    pub values: Array2<f64>,
    pub dropped_non_finite: usize,
    pub dropped_outliers: usize,
}

impl TrimmedSample {
    /// Number of retained rows `m`.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Jointly trim the four estimate arrays of one `k`.
///
/// Parameters
/// ----------
/// - `dims`: `&[LocalDimensions; 4]`
///   Estimates for X, Y, J, Z in axis order.
/// - `eps`: `f64`
///   Fraction of finite rows removed as outliers.
///
/// Returns
/// -------
/// `CausalityResult<TrimmedSample>`
///   Possibly empty; callers decide whether enough rows survived.
///
/// Errors
/// ------
/// - `CausalityError::DegenerateGeometry` if every estimate of one
///   manifold is non-finite (the first such manifold in axis order).
pub fn trim(dims: &[LocalDimensions; 4], eps: f64) -> CausalityResult<TrimmedSample> {
    let k = dims[0].k();
    let n = dims.iter().map(LocalDimensions::len).min().unwrap_or(0);

    for (kind, estimates) in ManifoldKind::ALL.iter().zip(dims.iter()) {
        if estimates.values().iter().all(|v| !v.is_finite()) {
            return Err(CausalityError::DegenerateGeometry { k, manifold: *kind });
        }
    }

    let finite_rows: Vec<usize> =
        (0..n).filter(|&i| dims.iter().all(|d| d.values()[i].is_finite())).collect();
    let dropped_non_finite = n - finite_rows.len();

    let centres: Vec<(f64, f64)> = dims.iter().map(|d| robust_centre(d, &finite_rows)).collect();
    let mut scored: Vec<(f64, usize)> = finite_rows
        .iter()
        .map(|&i| {
            let score = dims
                .iter()
                .zip(centres.iter())
                .map(|(d, &(median, mad))| (d.values()[i] - median).abs() / mad)
                .fold(0.0_f64, f64::max);
            (score, i)
        })
        .collect();

    let n_drop = (eps * finite_rows.len() as f64).floor() as usize;
    scored.sort_by(|a, b| match b.0.total_cmp(&a.0) {
        Ordering::Equal => a.1.cmp(&b.1),
        other => other,
    });
    let mut indices: Vec<usize> = scored.iter().skip(n_drop).map(|&(_, i)| i).collect();
    indices.sort_unstable();

    let mut values = Array2::<f64>::zeros((indices.len(), 4));
    for (mut row, &i) in values.rows_mut().into_iter().zip(indices.iter()) {
        for (cell, d) in row.iter_mut().zip(dims.iter()) {
            *cell = d.values()[i];
        }
    }

    Ok(TrimmedSample { k, indices, values, dropped_non_finite, dropped_outliers: n_drop })
}

/// Median and floored MAD of `estimates` restricted to `rows`.
fn robust_centre(estimates: &LocalDimensions, rows: &[usize]) -> (f64, f64) {
    if rows.is_empty() {
        return (0.0, 1.0);
    }
    let picked: Vec<f64> = rows.iter().map(|&i| estimates.values()[i]).collect();
    let median = Data::new(picked.clone()).median();
    let deviations: Vec<f64> = picked.iter().map(|v| (v - median).abs()).collect();
    let mad = Data::new(deviations).median();
    let floor = f64::EPSILON * median.abs().max(1.0);
    (median, mad.max(floor))
}
