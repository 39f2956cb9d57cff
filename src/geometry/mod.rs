//! geometry — delay embeddings, point-cloud containers, and neighbour tables.
//!
//! Purpose
//! -------
//! Turn raw series into the four manifolds compared by the dimension test
//! and compute the exact nearest-neighbour distances the local dimension
//! estimator needs.
//!
//! Key behaviors
//! -------------
//! - [`build_manifolds`] reconstructs `X`, `Y`, the joint manifold `J`, and
//!   the cross manifold `Z` by delay-coordinate embedding.
//! - [`ManifoldSet`] keeps the four point clouds row-aligned.
//! - [`knn_distances`] builds one [`NeighborTable`] per manifold.
//! - [`fan_out`] / [`try_fan_out`] run the same task over the four slots in
//!   parallel.
//!
//! Invariants & assumptions
//! ------------------------
//! - Row `i` of every manifold and every neighbour table refers to the same
//!   time index.
//! - Point clouds are finite; neighbour search is exact.
//!
//! Conventions
//! -----------
//! - Point clouds are `Array2<f64>` with rows = points and columns =
//!   coordinates.
//! - Four-slot arrays are always in [`ManifoldKind::ALL`] order.

pub mod embedding;
pub mod manifold;
pub mod neighbors;
pub mod parallel;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::embedding::{build_manifolds, delay_embed};
pub use self::manifold::{Manifold, ManifoldKind, ManifoldSet};
pub use self::neighbors::{NeighborTable, knn_distances};
pub use self::parallel::{fan_out, try_fan_out};
