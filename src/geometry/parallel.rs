//! geometry::parallel — fixed 4-way fan-out over the manifold slots.
//!
//! Both parallel stages of the pipeline (neighbour indexing and local
//! dimension estimation) do the same thing: apply one function to each of
//! the four manifolds (or tables) independently. [`fan_out`] expresses that
//! once on top of `rayon::join`, and [`try_fan_out`] adds fallible
//! collection with a deterministic error order (lowest axis first).
//!
//! Each task borrows only its own input and returns an owned value, so no
//! synchronisation beyond the join is needed.

use crate::errors::CausalityResult;

/// Apply `f` to each of the four items in parallel, preserving order.
pub fn fan_out<T, R, F>(items: &[T; 4], f: F) -> [R; 4]
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let f = &f;
    let ((a, b), (c, d)) = rayon::join(
        || rayon::join(|| f(&items[0]), || f(&items[1])),
        || rayon::join(|| f(&items[2]), || f(&items[3])),
    );
    [a, b, c, d]
}

/// Fallible [`fan_out`]: all four tasks run, and the first error in axis
/// order is returned.
pub fn try_fan_out<T, R, F>(items: &[T; 4], f: F) -> CausalityResult<[R; 4]>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> CausalityResult<R> + Sync,
{
    let [a, b, c, d] = fan_out(items, f);
    Ok([a?, b?, c?, d?])
}
