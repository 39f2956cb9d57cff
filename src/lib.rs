//! dimensional_causality — causal inference between time series from the
//! local intrinsic dimensions of delay-embedded manifolds.
//!
//! Purpose
//! -------
//! Decide how two scalar series are causally related by comparing the
//! intrinsic dimension of four reconstructed manifolds: the delay embedding
//! of each series (`X`, `Y`), their joint embedding (`J`), and the
//! embedding of their standardized sum (`Z`). A driving series leaves its
//! dynamics inside the driven one, so the driven manifold already spans the
//! joint dimension; independent series add up; a hidden common driver shows
//! up as a joint dimension below the sum but above either part.
//!
//! Key behaviors
//! -------------
//! - Return a probability distribution over five hypotheses: independence,
//!   X → Y, mutual coupling, Y → X, and a common cause
//!   ([`CausalHypothesis`](estimation::CausalHypothesis)).
//! - Average the per-k probabilities over a user-supplied range of
//!   neighbourhood sizes.
//! - Report malformed inputs, too few usable points, and degenerate
//!   geometry through one error type, [`CausalityError`](errors::CausalityError).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are two finite, synchronized series of equal length.
//! - Neighbour search is exact (brute force), so results are deterministic
//!   for a given input.
//! - The library emits `tracing` events but never installs a subscriber.
//!
//! Conventions
//! -----------
//! - Four-slot quantities are ordered X, Y, J, Z.
//! - Five-slot probability vectors are ordered independent, X → Y, mutual,
//!   Y → X, common cause.
//! - Point clouds are `ndarray::Array2<f64>` (rows = time index); the 4×4
//!   Gaussian model uses `nalgebra` fixed-size types.
//!
//! Downstream usage
//! ----------------
//! - `use dimensional_causality::prelude::*;` then call
//!   [`infer_causality`](causality::infer_causality) with
//!   [`EmbeddingParams`](causality::EmbeddingParams),
//!   [`KRange`](causality::KRange), and
//!   [`CausalityOptions::default()`](causality::CausalityOptions).
//! - Callers with their own reconstruction can build a
//!   [`ManifoldSet`](geometry::ManifoldSet) and call
//!   [`infer_causality_from_manifolds`](causality::infer_causality_from_manifolds).
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each stage.
//! - `tests/integration_causality_pipeline.rs` covers end-to-end behavior:
//!   direction recovery on synthetic manifolds, X/Y symmetry, idempotence,
//!   scale invariance, and degenerate inputs.

pub mod causality;
pub mod errors;
pub mod estimation;
pub mod geometry;

pub mod prelude {
    pub use crate::causality::prelude::*;
}
