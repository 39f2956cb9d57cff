//! causality::validation — eager input guards for the inference pipeline.
//!
//! Purpose
//! -------
//! Centralize every parameter and input check so that the pipeline either
//! rejects a call up front or runs to completion on well-formed inputs.
//! No embedding, neighbour search, or estimation happens until these
//! guards pass.
//!
//! Key behaviors
//! -------------
//! - [`validate_series`]: non-empty, equal-length, finite series.
//! - [`validate_embedding`]: `d ≥ 1`, `τ ≥ 1`, stride `≥ 1`.
//! - [`validate_k_values`] / [`validate_k_range`]: non-empty k list with
//!   `2 ≤ k < n'`.
//! - [`validate_options`]: outlier fraction, spread, bin count, and the
//!   region rule's own parameters.
//!
//! Conventions
//! -----------
//! - Checks run in a fixed order and report the first violation only.
//! - Pure functions; nothing is allocated beyond the error value.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each error branch and a success path.
use crate::{
    causality::options::{CausalityOptions, EmbeddingParams, KRange},
    errors::{CausalityError, CausalityResult},
    estimation::probabilities::RegionRule,
};

/// Validate the raw input series.
///
/// Errors
/// ------
/// - `CausalityError::LengthMismatch` if `x.len() != y.len()`.
/// - `CausalityError::EmptySeries` if both are empty.
/// - `CausalityError::NonFiniteData` for the first `NaN`/`±∞`, scanning
///   `x` before `y`.
pub fn validate_series(x: &[f64], y: &[f64]) -> CausalityResult<()> {
    if x.len() != y.len() {
        return Err(CausalityError::LengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    if x.is_empty() {
        return Err(CausalityError::EmptySeries);
    }
    for (series, data) in [("x", x), ("y", y)] {
        if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CausalityError::NonFiniteData { series, index, value });
        }
    }
    Ok(())
}

/// Validate embedding settings.
///
/// Errors
/// ------
/// - `CausalityError::InvalidEmbeddingDimension` if `emb_dim == 0`.
/// - `CausalityError::InvalidLag` if `tau == 0`.
/// - `CausalityError::InvalidDownsampleRate` if `downsample == 0`.
pub fn validate_embedding(params: &EmbeddingParams) -> CausalityResult<()> {
    if params.emb_dim == 0 {
        return Err(CausalityError::InvalidEmbeddingDimension { value: params.emb_dim });
    }
    if params.tau == 0 {
        return Err(CausalityError::InvalidLag { value: params.tau });
    }
    if params.downsample == 0 {
        return Err(CausalityError::InvalidDownsampleRate { value: params.downsample });
    }
    Ok(())
}

/// Validate a list of neighbourhood sizes independently of the data.
///
/// Errors
/// ------
/// - `CausalityError::EmptyKRange` if `values` is empty.
/// - `CausalityError::KTooSmall` for the first `k < 2`.
pub fn validate_k_values(values: &[usize]) -> CausalityResult<()> {
    if values.is_empty() {
        return Err(CausalityError::EmptyKRange);
    }
    if let Some(&k) = values.iter().find(|&&k| k < 2) {
        return Err(CausalityError::KTooSmall { k });
    }
    Ok(())
}

/// Validate a k range against the manifold point count `n'`.
///
/// Errors
/// ------
/// - Any error of [`validate_k_values`].
/// - `CausalityError::KTooLarge` if `max(k) ≥ n'`.
pub fn validate_k_range(k_range: &KRange, points: usize) -> CausalityResult<()> {
    validate_k_values(k_range.values())?;
    let k_max = k_range.max();
    if k_max >= points {
        return Err(CausalityError::KTooLarge { k: k_max, points });
    }
    Ok(())
}

/// Validate trimming and integration settings.
///
/// Errors
/// ------
/// - `CausalityError::InvalidOutlierFraction` unless `0 < eps < 1`.
/// - `CausalityError::InvalidSpread` unless `spread` is finite and `> 0`.
/// - `CausalityError::InvalidBins` if `bins == 0`.
/// - Any error of `opts.rule.validate()`.
pub fn validate_options<R: RegionRule>(opts: &CausalityOptions<R>) -> CausalityResult<()> {
    if !(opts.eps > 0.0 && opts.eps < 1.0) {
        return Err(CausalityError::InvalidOutlierFraction { value: opts.eps });
    }
    if !(opts.spread.is_finite() && opts.spread > 0.0) {
        return Err(CausalityError::InvalidSpread { value: opts.spread });
    }
    if opts.bins == 0 {
        return Err(CausalityError::InvalidBins { value: opts.bins });
    }
    opts.rule.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::probabilities::RelativeGapRule;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Series guards (length, emptiness, finiteness).
    // - k bounds against the point count.
    // - Option guards, including the region rule's tolerance.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the series guards in order.
    //
    // Given
    // -----
    // - Mismatched lengths, two empty series, and ∞ in y at index 1.
    //
    // Expect
    // ------
    // - `LengthMismatch`, `EmptySeries`, `NonFiniteData { series: "y", index: 1 }`.
    fn validate_series_reports_first_violation() {
        assert_eq!(
            validate_series(&[1.0], &[1.0, 2.0]).unwrap_err(),
            CausalityError::LengthMismatch { x_len: 1, y_len: 2 }
        );
        assert_eq!(validate_series(&[], &[]).unwrap_err(), CausalityError::EmptySeries);
        assert_eq!(
            validate_series(&[1.0, 2.0], &[0.0, f64::INFINITY]).unwrap_err(),
            CausalityError::NonFiniteData { series: "y", index: 1, value: f64::INFINITY }
        );
        assert!(validate_series(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the largest k must stay below the point count.
    //
    // Given
    // -----
    // - k range [3, 10] against n' = 10 and n' = 11.
    //
    // Expect
    // ------
    // - `KTooLarge { k: 10, points: 10 }`, then success.
    fn validate_k_range_bounds_by_point_count() {
        let range = KRange::new(vec![3, 10]).unwrap();

        assert_eq!(
            validate_k_range(&range, 10).unwrap_err(),
            CausalityError::KTooLarge { k: 10, points: 10 }
        );
        assert!(validate_k_range(&range, 11).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify option guards on directly constructed (unvalidated) values.
    //
    // Given
    // -----
    // - Defaults with spread = −1, bins = 0, and tolerance = 0.
    //
    // Expect
    // ------
    // - `InvalidSpread`, `InvalidBins`, `InvalidTolerance`.
    fn validate_options_checks_each_field() {
        let base: CausalityOptions = CausalityOptions::default();

        let bad_spread = CausalityOptions { spread: -1.0, ..base.clone() };
        let bad_bins = CausalityOptions { bins: 0, ..base.clone() };
        let bad_rule = CausalityOptions { rule: RelativeGapRule { tolerance: 0.0 }, ..base.clone() };

        assert_eq!(
            validate_options(&bad_spread).unwrap_err(),
            CausalityError::InvalidSpread { value: -1.0 }
        );
        assert_eq!(validate_options(&bad_bins).unwrap_err(), CausalityError::InvalidBins { value: 0 });
        assert_eq!(
            validate_options(&bad_rule).unwrap_err(),
            CausalityError::InvalidTolerance { value: 0.0 }
        );
        assert!(validate_options(&base).is_ok());
    }
}
