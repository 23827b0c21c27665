//! Order-independent reductions over mesh elements.
//!
//! Every estimator is a sum of per-element contributions, and the projector
//! is a componentwise min/max. Both combine associatively, so the same
//! closure runs either sequentially or on the rayon pool.

use rayon::prelude::*;

/// Map each item to a partial result and combine the partials.
///
/// The sequential path folds left to right and is bit-for-bit
/// reproducible. The parallel path may combine partials in any order.
pub(crate) fn map_reduce<T, C, I, F, R>(
    items: &[T],
    parallel: bool,
    identity: I,
    contribution: F,
    combine: R,
) -> C
where
    T: Sync,
    C: Send,
    I: Fn() -> C + Sync + Send,
    F: Fn(&T) -> C + Sync + Send,
    R: Fn(C, C) -> C + Sync + Send,
{
    if parallel {
        items
            .par_iter()
            .map(&contribution)
            .reduce(&identity, &combine)
    } else {
        items.iter().map(&contribution).fold(identity(), &combine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_and_parallel_agree() {
        let items: Vec<u64> = (1..=10_000).collect();
        let seq = map_reduce(&items, false, || 0_u64, |&x| x * 2, |a, b| a + b);
        let par = map_reduce(&items, true, || 0_u64, |&x| x * 2, |a, b| a + b);
        assert_eq!(seq, par);
        assert_eq!(seq, 10_000 * 10_001);
    }

    #[test]
    fn empty_input_yields_identity() {
        let items: Vec<f64> = Vec::new();
        let max = map_reduce(&items, false, || f64::NEG_INFINITY, |&x| x, f64::max);
        assert!(max.is_infinite());
    }
}
