//! Deterministic utilities for reproducible training
//!
//! Seeded bootstrap sampling and split tie-breaking, so the same dataset and
//! seed always produce the same forest.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;

/// Derive the per-tree seed from the forest seed.
pub fn tree_seed(seed: u64, tree_idx: usize) -> u64 {
    seed.wrapping_add(tree_idx as u64)
}

/// Draw `n_samples` row indices with replacement.
pub fn bootstrap_indices(n_samples: usize, seed: u64) -> Vec<usize> {
    if n_samples == 0 {
        return Vec::new();
    }

    let dist = Uniform::from(0..n_samples);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_samples).map(|_| dist.sample(&mut rng)).collect()
}

/// Deterministic tie-breaker for split selection.
/// Orders by feature index, then threshold; smaller wins.
#[derive(Debug, Clone, Copy)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: f64,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: f64) -> Self {
        Self {
            feature_idx,
            threshold,
        }
    }
}

impl PartialEq for SplitTieBreaker {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplitTieBreaker {}

impl PartialOrd for SplitTieBreaker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplitTieBreaker {
    fn cmp(&self, other: &Self) -> Ordering {
        self.feature_idx
            .cmp(&other.feature_idx)
            .then_with(|| self.threshold.total_cmp(&other.threshold))
    }
}
