//! causality — user-facing inference entry points and their configuration.
//!
//! Purpose
//! -------
//! Tie the geometry and estimation subtrees into one call that turns two
//! series (or four pre-built manifolds) into probabilities over the five
//! causal hypotheses.
//!
//! Key behaviors
//! -------------
//! - [`infer_causality`] embeds two raw series and runs the full pipeline.
//! - [`infer_causality_from_manifolds`] runs the pipeline on a caller-built
//!   [`ManifoldSet`](crate::geometry::ManifoldSet).
//! - [`EmbeddingParams`], [`KRange`], and [`CausalityOptions`] carry the
//!   settings; `validation` rejects malformed settings before any work.
//! - [`Diagnostics`] optionally exposes per-k means, standard deviations,
//!   probabilities, and trimmed sizes.
//!
//! Downstream usage
//! ----------------
//! - `use dimensional_causality::causality::prelude::*;` imports the entry
//!   points and option types in one line.

pub mod options;
pub mod pipeline;
pub mod validation;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::options::{CausalityOptions, EmbeddingParams, KRange};
pub use self::pipeline::{
    CausalityOutcome, Diagnostics, PipelineStage, infer_causality, infer_causality_from_manifolds,
};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::options::{CausalityOptions, EmbeddingParams, KRange};
    pub use super::pipeline::{
        CausalityOutcome, Diagnostics, infer_causality, infer_causality_from_manifolds,
    };
    pub use crate::errors::{CausalityError, CausalityResult, ErrorKind};
    pub use crate::estimation::probabilities::{
        CausalHypothesis, CausalProbabilities, RegionRule, RelativeGapRule,
    };
    pub use crate::geometry::manifold::{ManifoldKind, ManifoldSet};
}
