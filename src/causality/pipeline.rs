//! causality::pipeline — end-to-end dimensional causality inference.
//!
//! Purpose
//! -------
//! Orchestrate the full test: embed (or accept) the four manifolds, build
//! their neighbour tables once at the largest k, evaluate every k of the
//! range, and average the per-k probability vectors into one
//! [`CausalityOutcome`].
//!
//! Key behaviors
//! -------------
//! - All parameter checks run before any numerical work
//!   (`causality::validation`).
//! - Neighbour tables and per-k dimension estimates are computed for the
//!   four manifolds in parallel; the k loop itself is sequential and
//!   follows the caller's order.
//! - Any per-k failure (too few retained points, degenerate geometry)
//!   aborts the call; no k is skipped.
//! - The final vector is the elementwise mean of the per-k vectors.
//! - With `export_diagnostics`, per-k means, marginal standard deviations,
//!   probabilities, and retained sample sizes are attached verbatim.
//!
//! Logging
//! -------
//! - `debug!` on each [`PipelineStage`] transition with point counts.
//! - `warn!` when non-finite estimates were dropped for some k.
//! - `trace!` with each per-k probability vector.
//! - No subscriber is installed here.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are never mutated; the result is an owned value.
//! - Identical inputs yield bit-identical outputs (ordered parallel
//!   collection, sequential reductions).
use crate::{
    causality::{
        options::{CausalityOptions, EmbeddingParams, KRange},
        validation::{validate_embedding, validate_k_range, validate_options, validate_series},
    },
    errors::{CausalityError, CausalityResult},
    estimation::{
        dimensions::local_dimensions,
        gaussian::{GaussianModel, effective_sample_size, fit_gaussian},
        probabilities::{CausalHypothesis, CausalProbabilities, RegionRule, classify},
        trimming::trim,
    },
    geometry::{
        embedding::build_manifolds,
        manifold::ManifoldSet,
        neighbors::{NeighborTable, knn_distances},
        parallel::try_fan_out,
    },
};
use ndarray::Array2;
use tracing::{debug, trace, warn};

/// PipelineStage — phases of one inference call, used in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Embedding,
    IndexingNeighbors,
    Estimating,
    Trimming,
    Fitting,
    Classifying,
    Aggregating,
    Done,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PipelineStage::Embedding => "embedding",
            PipelineStage::IndexingNeighbors => "indexing_neighbors",
            PipelineStage::Estimating => "estimating",
            PipelineStage::Trimming => "trimming",
            PipelineStage::Fitting => "fitting",
            PipelineStage::Classifying => "classifying",
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::Done => "done",
        };
        write!(f, "{label}")
    }
}

/// Diagnostics — per-k intermediate results of one call.
///
/// Fields
/// ------
/// - `k_values`: `Vec<usize>`
///   The k range in evaluation order; row `i` of every table below refers
///   to `k_values[i]`.
/// - `means`: `Array2<f64>`
///   `len × 4` fitted mean dimensions (X, Y, J, Z).
/// - `stdevs`: `Array2<f64>`
///   `len × 4` marginal standard deviations of the fitted (unregularised)
///   covariance.
/// - `probabilities`: `Vec<CausalProbabilities>`
///   Per-k probability vectors before averaging.
/// - `trimmed_sizes`: `Vec<usize>`
///   Rows retained by the trimmer for each k.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub k_values: Vec<usize>,
    pub means: Array2<f64>,
    pub stdevs: Array2<f64>,
    pub probabilities: Vec<CausalProbabilities>,
    pub trimmed_sizes: Vec<usize>,
}

impl Diagnostics {
    /// Means flattened row-major; entry `i*4 + j` is manifold `j` at `k_values[i]`.
    pub fn means_flat(&self) -> Vec<f64> {
        self.means.iter().copied().collect()
    }

    /// Standard deviations flattened like [`Diagnostics::means_flat`].
    pub fn stdevs_flat(&self) -> Vec<f64> {
        self.stdevs.iter().copied().collect()
    }
}

/// CausalityOutcome — averaged probabilities and optional diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalityOutcome {
    pub probabilities: CausalProbabilities,
    pub diagnostics: Option<Diagnostics>,
}

impl CausalityOutcome {
    pub fn most_likely(&self) -> CausalHypothesis {
        self.probabilities.most_likely()
    }
}

/// Infer the causal relation between two synchronized series.
///
/// Parameters
/// ----------
/// - `x`, `y`: `&[f64]`
///   Equal-length, finite series.
/// - `params`: `&EmbeddingParams`
///   Delay-embedding settings applied to both series.
/// - `k_range`: `&KRange`
///   Neighbourhood sizes to average over; the largest must stay below the
///   post-embedding point count.
/// - `opts`: `&CausalityOptions<R>`
///   Trimming, integration, region rule, and diagnostics settings.
///
/// Returns
/// -------
/// `CausalityResult<CausalityOutcome>`
///   Probabilities over (independent, X→Y, mutual, Y→X, common cause).
///
/// Errors
/// ------
/// - Parameter errors from `causality::validation` (raised before any
///   computation).
/// - `CausalityError::DegenerateGeometry` / `SingularCovariance` when some
///   k yields collapsed estimates or covariance.
/// - `CausalityError::InsufficientData` when fewer than two rows survive
///   trimming for some k.
pub fn infer_causality<R: RegionRule>(
    x: &[f64], y: &[f64], params: &EmbeddingParams, k_range: &KRange, opts: &CausalityOptions<R>,
) -> CausalityResult<CausalityOutcome> {
    validate_series(x, y)?;
    validate_embedding(params)?;
    validate_options(opts)?;
    let points = params.point_count(x.len())?;
    validate_k_range(k_range, points)?;

    debug!(
        stage = %PipelineStage::Embedding,
        n = x.len(),
        points = points,
        emb_dim = params.emb_dim,
        tau = params.tau,
        downsample = params.downsample,
        "Embedding series"
    );
    let manifolds = build_manifolds(x, y, params)?;
    run_pipeline(&manifolds, k_range, opts)
}

/// Infer the causal relation from four pre-built manifolds.
///
/// The manifolds must already be row-aligned (guaranteed by
/// [`ManifoldSet::new`]). Errors are as for [`infer_causality`], with the
/// k bound checked against `manifolds.len()`.
pub fn infer_causality_from_manifolds<R: RegionRule>(
    manifolds: &ManifoldSet, k_range: &KRange, opts: &CausalityOptions<R>,
) -> CausalityResult<CausalityOutcome> {
    validate_options(opts)?;
    validate_k_range(k_range, manifolds.len())?;
    run_pipeline(manifolds, k_range, opts)
}

/// Per-k result carried to aggregation.
struct KEvaluation {
    probabilities: CausalProbabilities,
    model: GaussianModel,
    retained: usize,
}

fn run_pipeline<R: RegionRule>(
    manifolds: &ManifoldSet, k_range: &KRange, opts: &CausalityOptions<R>,
) -> CausalityResult<CausalityOutcome> {
    let k_max = k_range.max();
    debug!(
        stage = %PipelineStage::IndexingNeighbors,
        points = manifolds.len(),
        k_max = k_max,
        "Building neighbour tables"
    );
    let tables = try_fan_out(manifolds.as_array(), |m| knn_distances(m, k_max))?;

    let mut evaluations = Vec::with_capacity(k_range.len());
    for &k in k_range.values() {
        evaluations.push(evaluate_k(&tables, k, opts)?);
    }

    debug!(stage = %PipelineStage::Aggregating, k_count = evaluations.len(), "Averaging over k range");
    let per_k: Vec<CausalProbabilities> = evaluations.iter().map(|e| e.probabilities).collect();
    let probabilities = CausalProbabilities::mean_of(&per_k).ok_or(CausalityError::EmptyKRange)?;

    let diagnostics = opts.export_diagnostics.then(|| collect_diagnostics(k_range, &evaluations));

    debug!(
        stage = %PipelineStage::Done,
        most_likely = %probabilities.most_likely(),
        "Causality inference finished"
    );
    Ok(CausalityOutcome { probabilities, diagnostics })
}

fn evaluate_k<R: RegionRule>(
    tables: &[NeighborTable; 4], k: usize, opts: &CausalityOptions<R>,
) -> CausalityResult<KEvaluation> {
    debug!(stage = %PipelineStage::Estimating, k = k, "Estimating local dimensions");
    let dims = try_fan_out(tables, |t| local_dimensions(t, k))?;

    let sample = trim(&dims, opts.eps)?;
    if sample.dropped_non_finite > 0 {
        warn!(
            k = k,
            dropped = sample.dropped_non_finite,
            "Dropped points with non-finite dimension estimates"
        );
    }
    debug!(
        stage = %PipelineStage::Trimming,
        k = k,
        retained = sample.len(),
        outliers = sample.dropped_outliers,
        "Trimmed dimension estimates"
    );

    let model = fit_gaussian(&sample, effective_sample_size(k))?;
    debug!(
        stage = %PipelineStage::Fitting,
        k = k,
        mean_x = model.mean[0],
        mean_y = model.mean[1],
        mean_j = model.mean[2],
        mean_z = model.mean[3],
        "Fitted Gaussian model"
    );

    let probabilities = classify(&model, &opts.rule, opts.spread, opts.bins)?;
    trace!(
        stage = %PipelineStage::Classifying,
        k = k,
        probabilities = ?probabilities.as_array(),
        "Per-k probabilities"
    );

    Ok(KEvaluation { probabilities, model, retained: sample.len() })
}

fn collect_diagnostics(k_range: &KRange, evaluations: &[KEvaluation]) -> Diagnostics {
    let rows = evaluations.len();
    let mut means = Array2::<f64>::zeros((rows, 4));
    let mut stdevs = Array2::<f64>::zeros((rows, 4));
    for (i, eval) in evaluations.iter().enumerate() {
        let sd = eval.model.marginal_stdevs();
        for j in 0..4 {
            means[[i, j]] = eval.model.mean[j];
            stdevs[[i, j]] = sd[j];
        }
    }
    Diagnostics {
        k_values: k_range.values().to_vec(),
        means,
        stdevs,
        probabilities: evaluations.iter().map(|e| e.probabilities).collect(),
        trimmed_sizes: evaluations.iter().map(|e| e.retained).collect(),
    }
}
