//! estimation — from neighbour tables to causal-hypothesis probabilities.
//!
//! Purpose
//! -------
//! Implement the per-k statistical chain of the dimensional causality test:
//! local dimension estimates, joint trimming, Gaussian fitting, and binned
//! integration over the causal regions.
//!
//! Key behaviors
//! -------------
//! - [`local_dimensions`] turns a neighbour table into one estimate per
//!   point, flagging degenerate points with `NaN`/`+∞`.
//! - [`trim`] keeps the time indices whose four estimates are finite and
//!   not among the most outlying.
//! - [`fit_gaussian`] summarises the retained rows as a 4-d normal scaled
//!   by the effective sample size `2k`.
//! - [`classify`] integrates the normal over the regions of a
//!   [`RegionRule`] and returns [`CausalProbabilities`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Four-slot data are ordered X, Y, J, Z throughout.
//! - Each stage returns an owned value; nothing here holds state across
//!   neighbourhood sizes.

pub mod dimensions;
pub mod gaussian;
pub mod probabilities;
pub mod trimming;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::dimensions::{LocalDimensions, local_dimensions};
pub use self::gaussian::{GaussianModel, effective_sample_size, fit_gaussian};
pub use self::probabilities::{
    CausalHypothesis, CausalProbabilities, RegionRule, RelativeGapRule, classify,
    regularize_covariance,
};
pub use self::trimming::{TrimmedSample, trim};
