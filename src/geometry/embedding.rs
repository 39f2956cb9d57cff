//! geometry::embedding — delay-coordinate reconstruction of the four manifolds.
//!
//! Purpose
//! -------
//! Turn two synchronized scalar series into the four row-aligned point
//! clouds the dimension estimator works on: the individual embeddings `X`
//! and `Y`, the joint manifold `J`, and the cross manifold `Z`.
//!
//! Key behaviors
//! -------------
//! - [`delay_embed`] stacks lagged copies of a series: row `t` of the
//!   undownsampled embedding is `[s(t+(d−1)τ), s(t+(d−2)τ), …, s(t)]`,
//!   most recent coordinate first.
//! - Optional downsampling keeps every `stride`-th delay vector, giving
//!   `n' = ⌊(n − (d−1)τ) / stride⌋` points.
//! - `J` concatenates the rows of `X` and `Y` (2d coordinates per point).
//! - `Z` embeds the standardized sum `x̃ + ỹ`; a zero-variance series is
//!   only centred. `Z` does not depend on the order of the two inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite and of equal length (checked by
//!   `causality::validation`); this module re-checks only the embedding
//!   window via [`EmbeddingParams::point_count`].
//! - Inputs are never mutated; every manifold is a fresh buffer.
//!
//! Testing notes
//! -------------
//! - Unit tests pin exact coordinates for small hand-checkable series,
//!   downsampling row selection, the joint layout, and symmetry of `Z`.
use crate::{
    causality::options::EmbeddingParams,
    errors::{CausalityError, CausalityResult},
    geometry::manifold::ManifoldSet,
};
use ndarray::{Array2, s};
use statrs::statistics::Statistics;

/// Build the four manifolds `X`, `Y`, `J`, `Z` from two raw series.
///
/// Parameters
/// ----------
/// - `x`, `y`: `&[f64]`
///   Synchronized, finite series of equal length `n`.
/// - `params`: `&EmbeddingParams`
///   Embedding dimension `d`, lag `τ`, and downsample stride.
///
/// Returns
/// -------
/// `CausalityResult<ManifoldSet>`
///   Four manifolds with `n'` rows each; `X`, `Y`, `Z` have `d` columns
///   and `J` has `2d`.
///
/// Errors
/// ------
/// - `CausalityError::LengthMismatch` if `x.len() != y.len()`.
/// - `CausalityError::SeriesTooShort` if `n' < 1`.
pub fn build_manifolds(x: &[f64], y: &[f64], params: &EmbeddingParams) -> CausalityResult<ManifoldSet> {
    if x.len() != y.len() {
        return Err(CausalityError::LengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    let x_emb = delay_embed(x, params)?;
    let y_emb = delay_embed(y, params)?;
    let joint = concat_columns(&x_emb, &y_emb);

    let x_std = standardize(x);
    let y_std = standardize(y);
    let sum: Vec<f64> = x_std.iter().zip(y_std.iter()).map(|(a, b)| a + b).collect();
    let cross = delay_embed(&sum, params)?;

    ManifoldSet::new(x_emb, y_emb, joint, cross)
}

/// Delay-embed a single series.
///
/// Returns an `n' × d` matrix whose row `i` is the delay vector at
/// undownsampled time `i · stride`.
///
/// Errors
/// ------
/// - `CausalityError::SeriesTooShort` if the series cannot host a single
///   delay vector at the requested stride.
pub fn delay_embed(series: &[f64], params: &EmbeddingParams) -> CausalityResult<Array2<f64>> {
    let n_points = params.point_count(series.len())?;
    let d = params.emb_dim;
    let tau = params.tau;
    let stride = params.downsample;

    let mut points = Array2::<f64>::zeros((n_points, d));
    for (i, mut row) in points.rows_mut().into_iter().enumerate() {
        let t = i * stride;
        for (j, coord) in row.iter_mut().enumerate() {
            *coord = series[t + (d - 1 - j) * tau];
        }
    }
    Ok(points)
}

/// Centre a series and scale it to unit sample standard deviation.
///
/// Series with zero (or undefined) spread are returned centred only.
fn standardize(series: &[f64]) -> Vec<f64> {
    let mean = series.iter().mean();
    let sd = series.iter().std_dev();
    if sd.is_finite() && sd > 0.0 {
        series.iter().map(|v| (v - mean) / sd).collect()
    } else {
        series.iter().map(|v| v - mean).collect()
    }
}

/// Place `left` and `right` side by side; both must have the same row count.
fn concat_columns(left: &Array2<f64>, right: &Array2<f64>) -> Array2<f64> {
    let split = left.ncols();
    let mut joint = Array2::<f64>::zeros((left.nrows(), split + right.ncols()));
    joint.slice_mut(s![.., ..split]).assign(left);
    joint.slice_mut(s![.., split..]).assign(right);
    joint
}
