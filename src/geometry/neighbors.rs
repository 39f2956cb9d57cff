//! geometry::neighbors — exact k-nearest-neighbour distance tables.
//!
//! Purpose
//! -------
//! For every point of a [`Manifold`], collect the Euclidean distances to its
//! `k_max` nearest other points in ascending order. The table is built once
//! per manifold at the largest requested k and then shared read-only by the
//! per-k dimension estimates (which only read a prefix of each row).
//!
//! Key behaviors
//! -------------
//! - Brute force, `O(n'² · dims)`; no approximate index.
//! - The point itself is excluded; duplicate points contribute zero
//!   distances.
//! - Candidates are ordered by `(distance, index)` so ties resolve to the
//!   lower time index and the table is deterministic.
//! - Rows are computed in parallel with rayon and collected in order.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 ≤ k_max < n'`.
//! - Each row is non-decreasing.
use crate::{
    errors::{CausalityError, CausalityResult},
    geometry::manifold::Manifold,
};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use std::cmp::Ordering;

/// `NeighborTable` — sorted neighbour distances of one manifold.
///
/// Fields
/// ------
/// - `distances`: `Array2<f64>`
///   Shape `n' × k_max`; row `i` holds `r_1 ≤ r_2 ≤ … ≤ r_{k_max}` for point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborTable {
    distances: Array2<f64>,
}

impl NeighborTable {
    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    /// Number of neighbours stored per point.
    pub fn k_max(&self) -> usize {
        self.distances.ncols()
    }

    /// Number of points `n'`.
    pub fn len(&self) -> usize {
        self.distances.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.nrows() == 0
    }
}

/// Compute the `k_max` nearest-neighbour distances of every point.
///
/// Parameters
/// ----------
/// - `manifold`: `&Manifold`
///   Point cloud with `n'` rows.
/// - `k_max`: `usize`
///   Number of neighbours per point; must satisfy `1 ≤ k_max < n'`.
///
/// Returns
/// -------
/// `CausalityResult<NeighborTable>`
///
/// Errors
/// ------
/// - `CausalityError::KTooSmall` if `k_max == 0`.
/// - `CausalityError::KTooLarge` if `k_max ≥ n'`.
pub fn knn_distances(manifold: &Manifold, k_max: usize) -> CausalityResult<NeighborTable> {
    let n = manifold.len();
    if k_max < 1 {
        return Err(CausalityError::KTooSmall { k: k_max });
    }
    if k_max >= n {
        return Err(CausalityError::KTooLarge { k: k_max, points: n });
    }

    let points = manifold.points();
    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| nearest_distances(points, i, k_max))
        .collect();

    let mut distances = Array2::<f64>::zeros((n, k_max));
    for (mut dst, src) in distances.rows_mut().into_iter().zip(rows.iter()) {
        for (d, &s) in dst.iter_mut().zip(src.iter()) {
            *d = s;
        }
    }
    Ok(NeighborTable { distances })
}

/// Ascending distances from point `i` to its `k` nearest other points.
fn nearest_distances(points: &Array2<f64>, i: usize, k: usize) -> Vec<f64> {
    let origin = points.row(i);
    let mut candidates: Vec<(f64, usize)> = points
        .rows()
        .into_iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(j, row)| (euclidean(origin, row), j))
        .collect();

    if candidates.len() > k {
        candidates.select_nth_unstable_by(k - 1, by_distance_then_index);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(by_distance_then_index);
    candidates.into_iter().map(|(dist, _)| dist).collect()
}

fn by_distance_then_index(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

fn euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(p, q)| (p - q) * (p - q)).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::manifold::ManifoldKind;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact distances on a hand-checkable 1-D cloud.
    // - Duplicate points and multi-dimensional distances.
    // - The k_max bounds.
    // -------------------------------------------------------------------------

    fn line(values: &[f64]) -> Manifold {
        let points = Array2::from_shape_fn((values.len(), 1), |(i, _)| values[i]);
        Manifold::new(ManifoldKind::X, points).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Pin the neighbour distances of a small 1-D cloud.
    //
    // Given
    // -----
    // - Points 0, 1, 3, 6 and k_max = 2.
    //
    // Expect
    // ------
    // - Rows [1, 3], [1, 2], [2, 3], [3, 5].
    fn knn_distances_on_line_match_hand_computation() {
        let manifold = line(&[0.0, 1.0, 3.0, 6.0]);

        let table = knn_distances(&manifold, 2).unwrap();

        assert_eq!(table.distances(), &array![[1.0, 3.0], [1.0, 2.0], [2.0, 3.0], [3.0, 5.0]]);
        assert_eq!(table.k_max(), 2);
        assert_eq!(table.len(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Verify that duplicates yield zero distances and that distances are
    // Euclidean in several dimensions.
    //
    // Given
    // -----
    // - Points (0,0), (0,0), (3,4) and k_max = 2.
    //
    // Expect
    // ------
    // - Row 0 = [0, 5]; row 2 = [5, 5].
    fn knn_distances_handles_duplicates_and_euclidean_norm() {
        let points = array![[0.0, 0.0], [0.0, 0.0], [3.0, 4.0]];
        let manifold = Manifold::new(ManifoldKind::Joint, points).unwrap();

        let table = knn_distances(&manifold, 2).unwrap();

        assert_eq!(table.distances()[[0, 0]], 0.0);
        assert_relative_eq!(table.distances()[[0, 1]], 5.0, epsilon = 1e-12);
        assert_relative_eq!(table.distances()[[2, 0]], 5.0, epsilon = 1e-12);
        assert_relative_eq!(table.distances()[[2, 1]], 5.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure k_max must leave at least one non-neighbour.
    //
    // Given
    // -----
    // - 4 points with k_max = 4 and k_max = 0.
    //
    // Expect
    // ------
    // - `KTooLarge { k: 4, points: 4 }` and `KTooSmall { k: 0 }`.
    fn knn_distances_rejects_out_of_range_k() {
        let manifold = line(&[0.0, 1.0, 3.0, 6.0]);

        assert_eq!(
            knn_distances(&manifold, 4).unwrap_err(),
            CausalityError::KTooLarge { k: 4, points: 4 }
        );
        assert_eq!(knn_distances(&manifold, 0).unwrap_err(), CausalityError::KTooSmall { k: 0 });
    }
}
