//! Seeded sampling primitives over [`oorandom::Rand64`].
//!
//! The generator is always constructed by the caller and passed in by
//! mutable reference, so no random state is ever shared between calls.

use oorandom::Rand64;

/// Draw `count` items uniformly, allowing repeats.
pub fn sample_with_replacement<T: Clone>(data: &[T], rand: &mut Rand64, count: usize) -> Vec<T> {
    let n = data.len() as u64;
    let mut output = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = rand.rand_range(0..n) as usize;
        output.push(data[idx].clone());
    }
    output
}

/// Draw `count` distinct items uniformly: shuffle a copy and keep the head.
pub fn sample_without_replacement<T: Clone>(
    data: &[T],
    rand: &mut Rand64,
    count: usize,
) -> Vec<T> {
    let mut pool: Vec<T> = data.to_vec();
    shuffle(&mut pool, rand);
    pool.truncate(count);
    pool
}

/// Uniform in-place Fisher-Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rand: &mut Rand64) {
    let n = items.len() as u64;
    for i in 0..n {
        let j = rand.rand_range(i..n) as usize;
        items.swap(i as usize, j);
    }
}
