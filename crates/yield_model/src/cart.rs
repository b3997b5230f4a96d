//! CART (Classification and Regression Tree) builder
//!
//! Implements deterministic exact-greedy regression tree construction with
//! squared-error impurity. Trees are stored as flat node arrays.

use serde::Serialize;

use crate::dataset::FEATURE_COUNT;
use crate::deterministic::SplitTieBreaker;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Tree node. Leaves carry `value`; internal nodes route `<= threshold` left.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub feature_index: u16,
    pub threshold: f64,
    pub left: u32,
    pub right: u32,
    pub value: Option<f64>,
    pub n_samples: usize,
}

impl Node {
    fn leaf(value: f64, n_samples: usize) -> Self {
        Self {
            feature_index: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            value: Some(value),
            n_samples,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegressionTree {
    pub nodes: Vec<Node>,
}

impl RegressionTree {
    /// Evaluate the tree on a feature vector
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0usize;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };

            if let Some(value) = node.value {
                return value;
            }

            idx = if features[node.feature_index as usize] <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.value.is_some()).count()
    }
}

/// Split candidate with gain and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn new(feature_idx: usize, threshold: f64, gain: f64) -> Self {
        Self {
            feature_idx,
            threshold,
            gain,
            tie_breaker: SplitTieBreaker::new(feature_idx, threshold),
        }
    }

    fn beats(&self, current: &SplitCandidate) -> bool {
        self.gain > current.gain
            || (self.gain == current.gain && self.tie_breaker < current.tie_breaker)
    }
}

/// Running sums for squared-error impurity.
#[derive(Clone, Copy, Debug, Default)]
struct Moments {
    count: f64,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn push(&mut self, y: f64) {
        self.count += 1.0;
        self.sum += y;
        self.sum_sq += y * y;
    }

    fn minus(&self, other: &Moments) -> Moments {
        Moments {
            count: self.count - other.count,
            sum: self.sum - other.sum,
            sum_sq: self.sum_sq - other.sum_sq,
        }
    }

    /// Sum of squared deviations from the mean.
    fn sse(&self) -> f64 {
        if self.count == 0.0 {
            return 0.0;
        }
        (self.sum_sq - self.sum * self.sum / self.count).max(0.0)
    }
}

/// Output of a single tree build.
#[derive(Clone, Debug)]
pub struct BuiltTree {
    pub tree: RegressionTree,
    /// Unnormalized total impurity decrease per feature.
    pub impurity_decrease: [f64; FEATURE_COUNT],
}

/// Build a regression tree using exact-greedy CART algorithm
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [[f64; FEATURE_COUNT]],
    targets: &'a [f64],
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [[f64; FEATURE_COUNT]],
        targets: &'a [f64],
        config: TreeConfig,
    ) -> Self {
        assert_eq!(features.len(), targets.len());

        Self {
            config,
            features,
            targets,
        }
    }

    /// Build a tree over `indices` (which may repeat rows, as in a bootstrap sample).
    pub fn build(&self, indices: &[usize]) -> BuiltTree {
        let mut nodes = Vec::new();
        let mut impurity_decrease = [0.0; FEATURE_COUNT];

        if !indices.is_empty() {
            self.build_node(indices, 0, &mut nodes, &mut impurity_decrease);
        }

        BuiltTree {
            tree: RegressionTree { nodes },
            impurity_decrease,
        }
    }

    /// Recursively build tree nodes
    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        impurity_decrease: &mut [f64; FEATURE_COUNT],
    ) -> u32 {
        let current_idx = nodes.len() as u32;
        let leaf_value = self.mean_target(indices);

        let depth_exhausted = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted
            || indices.len() < self.config.min_samples_split
            || self.is_pure(indices, leaf_value)
        {
            nodes.push(Node::leaf(leaf_value, indices.len()));
            return current_idx;
        }

        let Some(split) = self.find_best_split(indices) else {
            nodes.push(Node::leaf(leaf_value, indices.len()));
            return current_idx;
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        // Reserve space for current node
        nodes.push(Node {
            feature_index: split.feature_idx as u16,
            threshold: split.threshold,
            left: 0,
            right: 0,
            value: None,
            n_samples: indices.len(),
        });
        impurity_decrease[split.feature_idx] += split.gain;

        let left_idx = self.build_node(&left_indices, depth + 1, nodes, impurity_decrease);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes, impurity_decrease);

        nodes[current_idx as usize].left = left_idx;
        nodes[current_idx as usize].right = right_idx;

        current_idx
    }

    /// Find the split with the largest squared-error reduction.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let min_leaf = self.config.min_samples_leaf.max(1);
        let n = indices.len();
        if n < 2 * min_leaf {
            return None;
        }

        let mut total = Moments::default();
        for &idx in indices {
            total.push(self.targets[idx]);
        }
        let parent_sse = total.sse();

        let mut best_split: Option<SplitCandidate> = None;
        let mut sorted = indices.to_vec();

        for feature_idx in 0..FEATURE_COUNT {
            sorted.sort_by(|&a, &b| {
                self.features[a][feature_idx]
                    .total_cmp(&self.features[b][feature_idx])
                    .then(a.cmp(&b))
            });

            let mut left = Moments::default();
            for pos in 0..n - 1 {
                left.push(self.targets[sorted[pos]]);

                let here = self.features[sorted[pos]][feature_idx];
                let next = self.features[sorted[pos + 1]][feature_idx];
                if here == next {
                    continue;
                }

                let left_count = pos + 1;
                if left_count < min_leaf || n - left_count < min_leaf {
                    continue;
                }

                let right = total.minus(&left);
                let gain = parent_sse - left.sse() - right.sse();
                if gain <= 0.0 {
                    continue;
                }

                let candidate = SplitCandidate::new(feature_idx, midpoint(here, next), gain);
                best_split = match best_split {
                    Some(current) if !candidate.beats(&current) => Some(current),
                    _ => Some(candidate),
                };
            }
        }

        best_split
    }

    /// Split samples based on threshold
    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: f64,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .partition(|&&idx| self.features[idx][feature_idx] <= threshold)
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let sum: f64 = indices.iter().map(|&idx| self.targets[idx]).sum();
        sum / indices.len() as f64
    }

    fn is_pure(&self, indices: &[usize], mean: f64) -> bool {
        let variance = indices
            .iter()
            .map(|&idx| {
                let d = self.targets[idx] - mean;
                d * d
            })
            .sum::<f64>()
            / indices.len() as f64;
        variance <= f64::EPSILON
    }
}

/// Threshold between two adjacent distinct values. Falls back to `low` when
/// the midpoint rounds up to `high`, so `high` always routes right.
fn midpoint(low: f64, high: f64) -> f64 {
    let mid = low + (high - low) / 2.0;
    if mid >= high {
        low
    } else {
        mid
    }
}
