//! estimation::probabilities — causal-hypothesis probabilities from a
//! Gaussian model of the four mean dimensions.
//!
//! Purpose
//! -------
//! Partition dimension space `(D_X, D_Y, D_J, D_Z)` into five regions, one
//! per [`CausalHypothesis`], and integrate a fitted [`GaussianModel`] over
//! each region on a regular grid. The result is a [`CausalProbabilities`]
//! vector for one neighbourhood size.
//!
//! Key behaviors
//! -------------
//! - The covariance gets a small diagonal jitter ([`regularize_covariance`]),
//!   escalated only when Cholesky fails, and the factor gives the precision
//!   matrix and log-determinant. Variances are never floored, so the
//!   integrated Gaussian is the fitted one up to the jitter.
//! - The integration box spans `μ_a ± c·σ_a` per axis, split into `bins`
//!   cells; each cell centre is assigned to a region by a [`RegionRule`]
//!   and credited with `density × cell volume`.
//! - Region masses are renormalised to sum to one, absorbing the mass lying
//!   outside the box.
//!
//! Region rule
//! -----------
//! The default [`RelativeGapRule`] compares each individual dimension with
//! the joint dimension `j = max(D_J, D_Z)` through the relative gaps
//!
//! ```text
//! u_x = (j − D_X) / j,   u_y = (j − D_Y) / j,   u_s = (D_X + D_Y − j) / j
//! ```
//!
//! A gap below the tolerance counts as closed. `u_y` closed means `Y`
//! already spans the joint dynamics, so `X` drives `Y`; both closed is
//! mutual coupling; `u_s` closed (dimensions add up) is independence; no
//! closed gap is a hidden common cause. Swapping X and Y swaps the two
//! directional hypotheses.
//!
//! Invariants & assumptions
//! ------------------------
//! - `spread > 0` and finite, `bins ≥ 1`.
//! - Output entries are non-negative and sum to 1.
use crate::{
    errors::{CausalityError, CausalityResult},
    estimation::gaussian::GaussianModel,
};
use nalgebra::{Cholesky, Matrix4, U4, Vector4};
use std::ops::Index;

/// ln(2π)
const LOG_2PI: f64 = 1.837_877_066_409_345_5;

/// Diagonal jitter, relative to the mean variance, tried in turn until the
/// covariance factorises.
const JITTER_LADDER: [f64; 4] = [1e-8, 1e-6, 1e-4, 1e-2];

/// CausalHypothesis — the five possible causal configurations.
///
/// The discriminant is the slot in [`CausalProbabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CausalHypothesis {
    /// X ⊥ Y.
    Independent,
    /// X → Y.
    XDrivesY,
    /// X ↔ Y.
    Mutual,
    /// Y → X.
    YDrivesX,
    /// Hidden common driver.
    CommonCause,
}

impl CausalHypothesis {
    pub const ALL: [CausalHypothesis; 5] = [
        CausalHypothesis::Independent,
        CausalHypothesis::XDrivesY,
        CausalHypothesis::Mutual,
        CausalHypothesis::YDrivesX,
        CausalHypothesis::CommonCause,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The hypothesis with X and Y exchanged.
    pub fn mirrored(self) -> Self {
        match self {
            CausalHypothesis::XDrivesY => CausalHypothesis::YDrivesX,
            CausalHypothesis::YDrivesX => CausalHypothesis::XDrivesY,
            other => other,
        }
    }
}

impl std::fmt::Display for CausalHypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CausalHypothesis::Independent => "X ⊥ Y",
            CausalHypothesis::XDrivesY => "X → Y",
            CausalHypothesis::Mutual => "X ↔ Y",
            CausalHypothesis::YDrivesX => "X ← Y",
            CausalHypothesis::CommonCause => "X ⊥̸ Y",
        };
        write!(f, "{label}")
    }
}

/// `CausalProbabilities` — probability of each [`CausalHypothesis`].
///
/// Invariants
/// ----------
/// - Five non-negative entries summing to 1 (up to rounding).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CausalProbabilities([f64; 5]);

impl CausalProbabilities {
    /// Normalise non-negative region masses.
    ///
    /// Returns `None` if the total mass is not a positive finite number.
    pub fn from_masses(masses: [f64; 5]) -> Option<Self> {
        let total: f64 = masses.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return None;
        }
        Some(CausalProbabilities(masses.map(|m| m / total)))
    }

    /// All mass on a single hypothesis.
    pub fn certain(hypothesis: CausalHypothesis) -> Self {
        let mut probs = [0.0; 5];
        probs[hypothesis.index()] = 1.0;
        CausalProbabilities(probs)
    }

    /// Elementwise mean of several vectors: sum, then divide by the count.
    ///
    /// Returns `None` for an empty slice.
    pub fn mean_of(items: &[CausalProbabilities]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let mut sum = [0.0_f64; 5];
        for item in items {
            for (acc, p) in sum.iter_mut().zip(item.0.iter()) {
                *acc += p;
            }
        }
        let count = items.len() as f64;
        Some(CausalProbabilities(sum.map(|s| s / count)))
    }

    pub fn get(&self, hypothesis: CausalHypothesis) -> f64 {
        self.0[hypothesis.index()]
    }

    pub fn as_array(&self) -> &[f64; 5] {
        &self.0
    }

    /// Most probable hypothesis; ties resolve to the lower slot.
    pub fn most_likely(&self) -> CausalHypothesis {
        let mut best = CausalHypothesis::Independent;
        for h in CausalHypothesis::ALL {
            if self.get(h) > self.get(best) {
                best = h;
            }
        }
        best
    }
}

impl Index<CausalHypothesis> for CausalProbabilities {
    type Output = f64;

    fn index(&self, hypothesis: CausalHypothesis) -> &f64 {
        &self.0[hypothesis.index()]
    }
}

/// RegionRule — assigns a point of dimension space to a hypothesis.
///
/// `dims` is ordered X, Y, J, Z.
pub trait RegionRule {
    fn hypothesis(&self, dims: &Vector4<f64>) -> CausalHypothesis;

    /// Check the rule's own parameters.
    fn validate(&self) -> CausalityResult<()> {
        Ok(())
    }
}

/// `RelativeGapRule` — default partition based on relative dimension gaps.
///
/// Fields
/// ------
/// - `tolerance`: `f64`
///   A relative gap strictly below this value is considered closed.
///   Must satisfy `0 < tolerance < 1`. Default 0.25.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeGapRule {
    pub tolerance: f64,
}

impl RelativeGapRule {
    pub fn new(tolerance: f64) -> CausalityResult<Self> {
        let rule = RelativeGapRule { tolerance };
        rule.validate()?;
        Ok(rule)
    }
}

impl Default for RelativeGapRule {
    fn default() -> Self {
        RelativeGapRule { tolerance: 0.25 }
    }
}

impl RegionRule for RelativeGapRule {
    fn hypothesis(&self, dims: &Vector4<f64>) -> CausalHypothesis {
        let (dx, dy) = (dims[0], dims[1]);
        let j = dims[2].max(dims[3]);
        if !(j > 0.0) {
            return CausalHypothesis::Independent;
        }
        let x_closed = (j - dx) / j < self.tolerance;
        let y_closed = (j - dy) / j < self.tolerance;
        let sum_closed = (dx + dy - j) / j < self.tolerance;
        match (x_closed, y_closed) {
            (true, true) => CausalHypothesis::Mutual,
            (false, true) => CausalHypothesis::XDrivesY,
            (true, false) => CausalHypothesis::YDrivesX,
            (false, false) if sum_closed => CausalHypothesis::Independent,
            (false, false) => CausalHypothesis::CommonCause,
        }
    }

    fn validate(&self) -> CausalityResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(CausalityError::InvalidTolerance { value: self.tolerance });
        }
        Ok(())
    }
}

/// Add `1e-12 + mean_var · r` to the diagonal for the first `r` in
/// [`JITTER_LADDER`] that makes the covariance positive definite.
///
/// Returns the jittered covariance with its Cholesky factor, or `None` when
/// even the largest jitter leaves it indefinite (or it is not finite).
pub fn regularize_covariance(
    covariance: &Matrix4<f64>,
) -> Option<(Matrix4<f64>, Cholesky<f64, U4>)> {
    let mean_var = covariance.trace() / 4.0;
    JITTER_LADDER.iter().find_map(|&r| {
        let sigma = covariance + Matrix4::identity() * (1e-12 + mean_var.abs() * r);
        Cholesky::new(sigma).map(|chol| (sigma, chol))
    })
}

/// Integrate the model over the five regions of `rule`.
///
/// Parameters
/// ----------
/// - `model`: `&GaussianModel`
///   Fitted mean and covariance for one `k`.
/// - `rule`: `&R`
///   Region partition of dimension space.
/// - `spread`: `f64`
///   Half-width of the integration box in marginal standard deviations.
/// - `bins`: `usize`
///   Cells per axis (`bins⁴` cells in total).
///
/// Errors
/// ------
/// - `CausalityError::InvalidSpread` if `spread` is not finite and positive.
/// - `CausalityError::InvalidBins` if `bins == 0`.
/// - `CausalityError::SingularCovariance` if no jitter in the ladder makes
///   the covariance positive definite.
pub fn classify<R: RegionRule + ?Sized>(
    model: &GaussianModel, rule: &R, spread: f64, bins: usize,
) -> CausalityResult<CausalProbabilities> {
    if !(spread.is_finite() && spread > 0.0) {
        return Err(CausalityError::InvalidSpread { value: spread });
    }
    if bins == 0 {
        return Err(CausalityError::InvalidBins { value: bins });
    }

    let (sigma, chol) = regularize_covariance(&model.covariance)
        .ok_or(CausalityError::SingularCovariance { k: model.k })?;
    let log_det: f64 = 2.0 * chol.l().diagonal().iter().map(|v| v.ln()).sum::<f64>();
    let precision = chol.inverse();
    let log_norm = -0.5 * (4.0 * LOG_2PI + log_det);

    let mean = model.mean;
    let mut centres: [Vec<f64>; 4] = Default::default();
    let mut volume = 1.0;
    for (a, axis) in centres.iter_mut().enumerate() {
        let half = spread * sigma[(a, a)].sqrt();
        let step = 2.0 * half / bins as f64;
        let lo = mean[a] - half;
        *axis = (0..bins).map(|i| lo + (i as f64 + 0.5) * step).collect();
        volume *= step;
    }

    let mut masses = [0.0_f64; 5];
    for &x in &centres[0] {
        for &y in &centres[1] {
            for &j in &centres[2] {
                for &z in &centres[3] {
                    let point = Vector4::new(x, y, j, z);
                    let diff = point - mean;
                    let q = diff.dot(&(precision * diff));
                    let density = (log_norm - 0.5 * q).exp();
                    masses[rule.hypothesis(&point).index()] += density * volume;
                }
            }
        }
    }

    Ok(CausalProbabilities::from_masses(masses)
        .unwrap_or_else(|| CausalProbabilities::certain(rule.hypothesis(&mean))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Each branch of `RelativeGapRule`.
    // - `classify` on tight Gaussians centred in each region.
    // - Symmetry of the rule and parameter guards.
    // -------------------------------------------------------------------------

    fn tight_model(mean: [f64; 4]) -> GaussianModel {
        GaussianModel {
            k: 5,
            mean: Vector4::from(mean),
            covariance: Matrix4::identity() * 1e-4,
            eff_n: 10.0,
        }
    }

    #[test]
    // Purpose
    // -------
    // Pin the region of one representative point per hypothesis.
    //
    // Given
    // -----
    // - Default tolerance 0.25.
    //
    // Expect
    // ------
    // - (1,2,2,2) → X→Y; (2,1,2,2) → Y→X; (2,2,2,2) → mutual;
    //   (1,1,2,2) → independent; (2,2,3,3) → common cause; j = 0 →
    //   independent.
    fn relative_gap_rule_covers_every_region() {
        let rule = RelativeGapRule::default();
        let cases = [
            ([1.0, 2.0, 2.0, 2.0], CausalHypothesis::XDrivesY),
            ([2.0, 1.0, 2.0, 2.0], CausalHypothesis::YDrivesX),
            ([2.0, 2.0, 2.0, 2.0], CausalHypothesis::Mutual),
            ([1.0, 1.0, 2.0, 1.5], CausalHypothesis::Independent),
            ([2.0, 2.0, 3.0, 3.0], CausalHypothesis::CommonCause),
            ([1.0, 1.0, 0.0, 0.0], CausalHypothesis::Independent),
        ];

        for (dims, expected) in cases {
            assert_eq!(rule.hypothesis(&Vector4::from(dims)), expected, "dims = {dims:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a tight Gaussian puts all its mass in the region of its
    // mean and that the vector is normalised.
    //
    // Given
    // -----
    // - Means in the X→Y, independent, mutual, and common-cause regions
    //   with σ = 0.01 on each axis; spread 3, 8 bins.
    //
    // Expect
    // ------
    // - Probability 1 on the expected hypothesis.
    fn classify_tight_gaussian_concentrates_in_mean_region() {
        let rule = RelativeGapRule::default();
        let cases = [
            ([1.0, 2.0, 2.0, 2.0], CausalHypothesis::XDrivesY),
            ([1.0, 1.0, 2.0, 2.0], CausalHypothesis::Independent),
            ([2.0, 2.0, 2.0, 2.0], CausalHypothesis::Mutual),
            ([2.0, 2.0, 3.0, 3.0], CausalHypothesis::CommonCause),
        ];

        for (mean, expected) in cases {
            let probs = classify(&tight_model(mean), &rule, 3.0, 8).unwrap();

            assert_relative_eq!(probs[expected], 1.0, epsilon = 1e-12);
            assert_relative_eq!(probs.as_array().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert_eq!(probs.most_likely(), expected);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the X/Y symmetry of the integrated probabilities.
    //
    // Given
    // -----
    // - A broad Gaussian straddling several regions, and the same model
    //   with the X and Y axes exchanged.
    //
    // Expect
    // ------
    // - Directional slots swap; the others agree to 1e-9.
    fn classify_is_symmetric_under_axis_swap() {
        let rule = RelativeGapRule::default();
        let mut model = tight_model([1.4, 1.8, 2.0, 1.9]);
        model.covariance = Matrix4::new(
            0.04, 0.01, 0.0, 0.0, //
            0.01, 0.09, 0.0, 0.0, //
            0.0, 0.0, 0.05, 0.02, //
            0.0, 0.0, 0.02, 0.05,
        );
        let swap = Matrix4::new(
            0.0, 1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        let mirrored = GaussianModel {
            mean: swap * model.mean,
            covariance: swap * model.covariance * swap,
            ..model.clone()
        };

        let a = classify(&model, &rule, 3.0, 10).unwrap();
        let b = classify(&mirrored, &rule, 3.0, 10).unwrap();

        for h in CausalHypothesis::ALL {
            assert_relative_eq!(a[h], b[h.mirrored()], epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid integration parameters are rejected.
    //
    // Given
    // -----
    // - spread = 0, spread = NaN, bins = 0, tolerance = 1.5.
    //
    // Expect
    // ------
    // - `InvalidSpread`, `InvalidSpread`, `InvalidBins`, `InvalidTolerance`.
    fn classify_rejects_invalid_parameters() {
        let rule = RelativeGapRule::default();
        let model = tight_model([1.0, 1.0, 1.0, 1.0]);

        assert_eq!(
            classify(&model, &rule, 0.0, 8).unwrap_err(),
            CausalityError::InvalidSpread { value: 0.0 }
        );
        assert!(matches!(
            classify(&model, &rule, f64::NAN, 8),
            Err(CausalityError::InvalidSpread { .. })
        ));
        assert_eq!(classify(&model, &rule, 3.0, 0).unwrap_err(), CausalityError::InvalidBins { value: 0 });
        assert_eq!(
            RelativeGapRule::new(1.5).unwrap_err(),
            CausalityError::InvalidTolerance { value: 1.5 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that regularisation only adds jitter and never floors a
    // variance.
    //
    // Given
    // -----
    // - diag(4, 0, 0, 0): mean variance 1, first jitter 1e-12 + 1e-8.
    //
    // Expect
    // ------
    // - Diagonal (4 + j, j, j, j); off-diagonals unchanged.
    fn regularize_covariance_adds_jitter_without_flooring() {
        let cov = Matrix4::from_diagonal(&Vector4::new(4.0, 0.0, 0.0, 0.0));

        let (reg, _) = regularize_covariance(&cov).unwrap();

        let jitter = 1e-12 + 1e-8;
        assert_relative_eq!(reg[(0, 0)], 4.0 + jitter, epsilon = 1e-15);
        assert_relative_eq!(reg[(1, 1)], jitter, epsilon = 1e-15);
        assert_eq!(reg[(0, 1)], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the jitter escalates when the smallest step is not
    // enough.
    //
    // Given
    // -----
    // - diag(4, 4, 4, −1e-7): the 1e-8 step leaves the last pivot negative.
    //
    // Expect
    // ------
    // - The 1e-6 step is used; the returned factor reproduces the matrix.
    // - A non-finite covariance yields `None`.
    fn regularize_covariance_escalates_until_positive_definite() {
        let cov = Matrix4::from_diagonal(&Vector4::new(4.0, 4.0, 4.0, -1e-7));
        let mean_var = cov.trace() / 4.0;

        let (reg, chol) = regularize_covariance(&cov).unwrap();

        assert_relative_eq!(reg[(3, 3)], -1e-7 + 1e-12 + mean_var * 1e-6, epsilon = 1e-15);
        assert_relative_eq!(chol.l() * chol.l().transpose(), reg, epsilon = 1e-12);
        assert!(regularize_covariance(&(Matrix4::identity() * f64::NAN)).is_none());
    }

    #[test]
    // Purpose
    // -------
    // Ensure a broad covariance is integrated as fitted, so a small
    // variance on one axis keeps that axis narrow.
    //
    // Given
    // -----
    // - Mean (1, 2, 2, 2) in the X→Y region; σ² = 1e-6 on X, 0.04 elsewhere.
    //
    // Expect
    // ------
    // - The regularised X variance stays within 1e-9 of 1e-6.
    // - X→Y keeps the largest probability.
    fn classify_keeps_small_variances_unfloored() {
        let rule = RelativeGapRule::default();
        let mut model = tight_model([1.0, 2.0, 2.0, 2.0]);
        model.covariance = Matrix4::from_diagonal(&Vector4::new(1e-6, 0.04, 0.04, 0.04));

        let (reg, _) = regularize_covariance(&model.covariance).unwrap();
        let probs = classify(&model, &rule, 3.0, 10).unwrap();

        assert_relative_eq!(reg[(0, 0)], 1e-6, epsilon = 1e-9);
        assert_eq!(probs.most_likely(), CausalHypothesis::XDrivesY);
    }
}
