//! causality::options — configuration carriers for the inference pipeline.
//!
//! Purpose
//! -------
//! Hold the user-facing knobs of a dimensional causality run in three small
//! value types: how to embed the series ([`EmbeddingParams`]), which
//! neighbourhood sizes to average over ([`KRange`]), and how to trim,
//! integrate, and report ([`CausalityOptions`]).
//!
//! Key behaviors
//! -------------
//! - Validated constructors return [`CausalityResult`] so malformed settings
//!   fail before any numerical work starts.
//! - [`CausalityOptions::default`] reproduces the conventional settings
//!   `eps = 0.05`, `spread = 3`, `bins = 20`, relative-gap tolerance 0.25.
//! - [`EmbeddingParams::point_count`] gives the post-embedding point count
//!   `n'` used to bound the k range.
//!
//! Conventions
//! -----------
//! - Fields are public for ergonomic construction in tests and callers;
//!   the pipeline re-validates them through `causality::validation`.
use crate::{
    causality::validation::{validate_embedding, validate_k_values, validate_options},
    errors::{CausalityError, CausalityResult},
    estimation::probabilities::{RegionRule, RelativeGapRule},
};

/// EmbeddingParams — delay-embedding settings shared by both series.
///
/// Fields
/// ------
/// - `emb_dim`: `usize`
///   Embedding dimension `d ≥ 1` (coordinates per delay vector).
/// - `tau`: `usize`
///   Lag `τ ≥ 1` between consecutive coordinates, in samples.
/// - `downsample`: `usize`
///   Stride `s ≥ 1`; only every `s`-th delay vector is kept.
///
/// Notes
/// -----
/// - With `n` observations the manifolds hold
///   `n' = ⌊(n − (d − 1)τ) / s⌋` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingParams {
    pub emb_dim: usize,
    pub tau: usize,
    pub downsample: usize,
}

impl EmbeddingParams {
    /// Construct embedding settings with stride 1.
    ///
    /// Errors
    /// ------
    /// - `CausalityError::InvalidEmbeddingDimension` if `emb_dim == 0`.
    /// - `CausalityError::InvalidLag` if `tau == 0`.
    pub fn new(emb_dim: usize, tau: usize) -> CausalityResult<Self> {
        let params = EmbeddingParams { emb_dim, tau, downsample: 1 };
        validate_embedding(&params)?;
        Ok(params)
    }

    /// Replace the downsample stride.
    ///
    /// Errors
    /// ------
    /// - `CausalityError::InvalidDownsampleRate` if `downsample == 0`.
    pub fn with_downsample(self, downsample: usize) -> CausalityResult<Self> {
        let params = EmbeddingParams { downsample, ..self };
        validate_embedding(&params)?;
        Ok(params)
    }

    /// Number of samples spanned by one delay vector, `(d − 1)τ + 1`.
    pub fn window(&self) -> usize {
        self.emb_dim.saturating_sub(1).saturating_mul(self.tau).saturating_add(1)
    }

    /// Point count `n'` of manifolds embedded from `len` observations.
    ///
    /// Errors
    /// ------
    /// - Any error of [`validate_embedding`].
    /// - `CausalityError::SeriesTooShort` if `n' < 1`; `required` is the
    ///   minimal length `(d − 1)τ + s`.
    pub fn point_count(&self, len: usize) -> CausalityResult<usize> {
        validate_embedding(self)?;
        let span = self.window() - 1;
        let required = span.saturating_add(self.downsample);
        if len < required {
            return Err(CausalityError::SeriesTooShort { len, required });
        }
        Ok((len - span) / self.downsample)
    }
}

/// KRange — neighbourhood sizes the per-k probabilities are averaged over.
///
/// Invariants
/// ----------
/// - Non-empty; every `k ≥ 2`.
/// - Order of evaluation (and of diagnostic rows) is the order given;
///   duplicates are allowed and weigh that k accordingly.
/// - The upper bound `k < n'` depends on the data and is checked by the
///   pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KRange(Vec<usize>);

impl KRange {
    /// Wrap an explicit list of neighbourhood sizes.
    ///
    /// Errors
    /// ------
    /// - `CausalityError::EmptyKRange` if `values` is empty.
    /// - `CausalityError::KTooSmall` for the first `k < 2`.
    pub fn new(values: Vec<usize>) -> CausalityResult<Self> {
        validate_k_values(&values)?;
        Ok(KRange(values))
    }

    /// Contiguous range `lo..=hi`.
    ///
    /// Errors
    /// ------
    /// - As [`KRange::new`]; `lo > hi` yields `EmptyKRange`.
    pub fn inclusive(lo: usize, hi: usize) -> CausalityResult<Self> {
        KRange::new((lo..=hi).collect())
    }

    pub fn values(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest k, which sizes the neighbour tables.
    pub fn max(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

/// CausalityOptions — trimming, integration, and reporting settings.
///
/// Fields
/// ------
/// - `eps`: `f64`
///   Fraction of finite estimate rows dropped as outliers, `0 < eps < 1`.
/// - `spread`: `f64`
///   Half-width of the integration box in marginal standard deviations
///   (`c > 0`).
/// - `bins`: `usize`
///   Grid cells per axis of the integration box (`bins ≥ 1`).
/// - `rule`: `R`
///   Partition of dimension space into causal regions.
/// - `export_diagnostics`: `bool`
///   Attach per-k means, standard deviations, probabilities, and trimmed
///   sizes to the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalityOptions<R = RelativeGapRule> {
    pub eps: f64,
    pub spread: f64,
    pub bins: usize,
    pub rule: R,
    pub export_diagnostics: bool,
}

impl<R: RegionRule> CausalityOptions<R> {
    /// Construct validated options from explicit settings.
    ///
    /// Errors
    /// ------
    /// - `CausalityError::InvalidOutlierFraction` unless `0 < eps < 1`.
    /// - `CausalityError::InvalidSpread` unless `spread` is finite and `> 0`.
    /// - `CausalityError::InvalidBins` if `bins == 0`.
    /// - Any error of `rule.validate()`.
    pub fn new(
        eps: f64, spread: f64, bins: usize, rule: R, export_diagnostics: bool,
    ) -> CausalityResult<Self> {
        let opts = CausalityOptions { eps, spread, bins, rule, export_diagnostics };
        validate_options(&opts)?;
        Ok(opts)
    }

    /// Same options with diagnostics export switched on or off.
    pub fn with_diagnostics(self, export_diagnostics: bool) -> Self {
        CausalityOptions { export_diagnostics, ..self }
    }
}

impl Default for CausalityOptions<RelativeGapRule> {
    /// Conventional settings.
    ///
    /// Returns
    /// -------
    /// `CausalityOptions`
    ///   - `eps = 0.05`
    ///   - `spread = 3.0`
    ///   - `bins = 20`
    ///   - `rule = RelativeGapRule { tolerance: 0.25 }`
    ///   - `export_diagnostics = false`
    fn default() -> Self {
        CausalityOptions {
            eps: 0.05,
            spread: 3.0,
            bins: 20,
            rule: RelativeGapRule::default(),
            export_diagnostics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Point-count arithmetic and the too-short guard.
    // - `KRange` construction rules.
    // - `CausalityOptions` defaults and validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify n' = ⌊(n − (d − 1)τ) / s⌋ and the minimal length.
    //
    // Given
    // -----
    // - d = 3, τ = 2, s = 1 and s = 4 with n = 100; n = 5 with s = 2.
    //
    // Expect
    // ------
    // - n' = 96 and 24; `SeriesTooShort { len: 5, required: 6 }`.
    fn point_count_matches_embedding_formula() {
        let params = EmbeddingParams::new(3, 2).unwrap();

        assert_eq!(params.point_count(100).unwrap(), 96);
        assert_eq!(params.with_downsample(4).unwrap().point_count(100).unwrap(), 24);
        assert_eq!(
            params.with_downsample(2).unwrap().point_count(5).unwrap_err(),
            CausalityError::SeriesTooShort { len: 5, required: 6 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero-valued embedding settings are rejected.
    //
    // Given
    // -----
    // - d = 0; τ = 0; stride 0.
    //
    // Expect
    // ------
    // - The matching `Invalid*` variant for each.
    fn embedding_params_reject_zero_settings() {
        assert_eq!(
            EmbeddingParams::new(0, 1).unwrap_err(),
            CausalityError::InvalidEmbeddingDimension { value: 0 }
        );
        assert_eq!(EmbeddingParams::new(2, 0).unwrap_err(), CausalityError::InvalidLag { value: 0 });
        assert_eq!(
            EmbeddingParams::new(2, 1).unwrap().with_downsample(0).unwrap_err(),
            CausalityError::InvalidDownsampleRate { value: 0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify `KRange` validation and its maximum.
    //
    // Given
    // -----
    // - An empty list, a list containing 1, and the unordered list [6, 3, 6].
    //
    // Expect
    // ------
    // - `EmptyKRange`, `KTooSmall { k: 1 }`, and max = 6 with 3 entries.
    fn k_range_validates_values() {
        assert_eq!(KRange::new(vec![]).unwrap_err(), CausalityError::EmptyKRange);
        assert_eq!(KRange::new(vec![4, 1]).unwrap_err(), CausalityError::KTooSmall { k: 1 });

        let range = KRange::new(vec![6, 3, 6]).unwrap();

        assert_eq!(range.max(), 6);
        assert_eq!(range.len(), 3);
        assert_eq!(KRange::inclusive(2, 4).unwrap().values(), &[2, 3, 4]);
    }

    #[test]
    // Purpose
    // -------
    // Pin the defaults and the validated constructor.
    //
    // Given
    // -----
    // - `CausalityOptions::default()` and `new` with eps = 1.0.
    //
    // Expect
    // ------
    // - Documented defaults; `InvalidOutlierFraction { value: 1.0 }`.
    fn causality_options_defaults_and_validation() {
        let opts: CausalityOptions = CausalityOptions::default();
        assert_eq!(opts.eps, 0.05);
        assert_eq!(opts.spread, 3.0);
        assert_eq!(opts.bins, 20);
        assert_eq!(opts.rule, RelativeGapRule { tolerance: 0.25 });
        assert!(!opts.export_diagnostics);

        let result = CausalityOptions::new(1.0, 3.0, 20, RelativeGapRule::default(), false);

        assert_eq!(result.unwrap_err(), CausalityError::InvalidOutlierFraction { value: 1.0 });
    }
}
