//! Uniform sampling without replacement.

use rand::Rng;
use rand::seq::SliceRandom;

/// Pick `k` items uniformly at random without replacement.
/// Returns every item (shuffled) when `k >= population.len()`.
pub fn sample<T: Clone, R: Rng + ?Sized>(population: &[T], k: usize, rng: &mut R) -> Vec<T> {
    let mut shuffled = population.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(k);
    shuffled
}
