//! estimation::gaussian — 4-d Gaussian model of the mean dimension estimates.
//!
//! Purpose
//! -------
//! Summarise a [`TrimmedSample`] as a multivariate normal over the four
//! mean dimensions `(D_X, D_Y, D_J, D_Z)`. The covariance describes the
//! uncertainty of the *mean*, not of a single point: neighbouring points
//! share most of their neighbours, so only about `eff_n = 2k` estimates are
//! treated as independent.
//!
//! Key behaviors
//! -------------
//! - Mean `μ = (1/m) Σ_r v_r`.
//! - Scatter matrix `W = Σ_r (v_r − μ)(v_r − μ)ᵀ`.
//! - Model covariance `Σ = W / eff_n`: `eff_n` takes the place of the point
//!   count in the unbiased-variance denominator, so `m` never enters it.
//!
//! Conventions
//! -----------
//! - Row data come from `ndarray` and are copied into `nalgebra` fixed-size
//!   types (`Vector4`, `Matrix4`) for the 4×4 linear algebra downstream.
use crate::{
    errors::{CausalityError, CausalityResult},
    estimation::trimming::TrimmedSample,
};
use nalgebra::{Matrix4, Vector4};
use ndarray::ArrayView1;

/// `GaussianModel` — fitted mean and covariance for one `k`.
///
/// Fields
/// ------
/// - `k`: `usize`
///   Neighbourhood size of the underlying estimates.
/// - `mean`: `Vector4<f64>`
///   Mean dimensions in axis order X, Y, J, Z.
/// - `covariance`: `Matrix4<f64>`
///   Symmetric PSD covariance: the scatter matrix divided by `eff_n`.
/// - `eff_n`: `f64`
///   Effective sample size used for the scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianModel {
    pub k: usize,
    pub mean: Vector4<f64>,
    pub covariance: Matrix4<f64>,
    pub eff_n: f64,
}

impl GaussianModel {
    /// Marginal standard deviations `√Σ_aa`.
    pub fn marginal_stdevs(&self) -> Vector4<f64> {
        self.covariance.diagonal().map(f64::sqrt)
    }
}

/// Effective number of independent estimates at neighbourhood size `k`.
pub fn effective_sample_size(k: usize) -> f64 {
    2.0 * k as f64
}

/// Fit the Gaussian model to a trimmed sample.
///
/// Parameters
/// ----------
/// - `sample`: `&TrimmedSample`
///   `m × 4` retained estimates.
/// - `eff_n`: `f64`
///   Effective sample size dividing the scatter matrix (usually
///   [`effective_sample_size`] of `sample.k`).
///
/// Errors
/// ------
/// - `CausalityError::InsufficientData` if `m < 2`.
pub fn fit_gaussian(sample: &TrimmedSample, eff_n: f64) -> CausalityResult<GaussianModel> {
    let m = sample.len();
    if m < 2 {
        return Err(CausalityError::InsufficientData { k: sample.k, retained: m });
    }

    let rows: Vec<Vector4<f64>> = sample.values.rows().into_iter().map(to_vector4).collect();
    let mean = rows.iter().fold(Vector4::zeros(), |acc, v| acc + v) / m as f64;

    let mut scatter = Matrix4::<f64>::zeros();
    for v in &rows {
        let centred = v - mean;
        scatter += centred * centred.transpose();
    }

    Ok(GaussianModel { k: sample.k, mean, covariance: scatter / eff_n, eff_n })
}

fn to_vector4(row: ArrayView1<f64>) -> Vector4<f64> {
    Vector4::new(row[0], row[1], row[2], row[3])
}
