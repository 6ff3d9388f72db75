//! Fisher-Yates shuffling over a copy of the input.

use rand::Rng;

/// Returns a uniformly shuffled copy of `items`; `items` itself is untouched.
pub fn fisher_yates<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    fisher_yates_by(items, |i| rng.random_range(0..=i))
}

/// Shuffle a copy of `items`, drawing each swap partner from `pick`.
///
/// Walks `i` from the last index down to 1 and swaps `i` with `pick(i)`, which
/// must return a value in `0..=i`. Values above `i` are clamped to `i`.
pub fn fisher_yates_by<T: Clone>(items: &[T], mut pick: impl FnMut(usize) -> usize) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = pick(i).min(i);
        shuffled.swap(i, j);
    }
    shuffled
}
