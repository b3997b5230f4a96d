//! Random forest regressor
//!
//! Bagged CART trees: each tree is grown on a seeded bootstrap sample with all
//! features considered at every split. Predictions average the trees.
//! Feature importance is the mean decrease in impurity.

use serde::Serialize;
use tracing::{debug, info};

use crate::cart::{CartBuilder, RegressionTree, TreeConfig};
use crate::dataset::{Dataset, FEATURE_COUNT};
use crate::deterministic::{bootstrap_indices, tree_seed};
use crate::errors::TrainerError;

/// Ensemble size used by the dashboard.
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Seed used by the dashboard.
pub const DEFAULT_SEED: u64 = 42;

/// Forest training configuration
#[derive(Clone, Debug)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub seed: u64,
    pub tree: TreeConfig,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            seed: DEFAULT_SEED,
            tree: TreeConfig::default(),
        }
    }
}

/// Fitted forest plus its per-feature importance scores.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    feature_importances: [f64; FEATURE_COUNT],
}

impl RandomForest {
    /// Mean of the per-tree predictions.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        total / self.trees.len() as f64
    }

    /// Importance scores in `FEATURE_COLUMNS` order; they sum to 1.0.
    pub fn feature_importances(&self) -> &[f64; FEATURE_COUNT] {
        &self.feature_importances
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

/// Forest trainer
pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Train a forest on the given dataset
    pub fn train(&self, dataset: &Dataset) -> Result<RandomForest, TrainerError> {
        if self.config.n_estimators == 0 {
            return Err(TrainerError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if dataset.is_empty() {
            return Err(TrainerError::EmptyDataset);
        }

        let features = dataset.features();
        let targets = dataset.targets();
        let builder = CartBuilder::new(&features, &targets, self.config.tree.clone());

        info!(
            samples = dataset.len(),
            trees = self.config.n_estimators,
            seed = self.config.seed,
            "Training random forest"
        );

        let mut trees = Vec::with_capacity(self.config.n_estimators);
        let mut importance_sum = [0.0; FEATURE_COUNT];

        for tree_idx in 0..self.config.n_estimators {
            let indices = bootstrap_indices(dataset.len(), tree_seed(self.config.seed, tree_idx));
            let built = builder.build(&indices);

            debug!(
                "Trained tree {}/{} ({} nodes)",
                tree_idx + 1,
                self.config.n_estimators,
                built.tree.nodes.len()
            );

            let tree_total: f64 = built.impurity_decrease.iter().sum();
            if tree_total > 0.0 {
                for (sum, decrease) in importance_sum.iter_mut().zip(built.impurity_decrease) {
                    *sum += decrease / tree_total;
                }
            }

            trees.push(built.tree);
        }

        let feature_importances = normalize_importances(importance_sum);
        info!(?feature_importances, "Training complete");

        Ok(RandomForest {
            trees,
            feature_importances,
        })
    }
}

/// Scale to sum 1.0. Without any split the scores are uniform.
fn normalize_importances(mut scores: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        for score in &mut scores {
            *score /= total;
        }
        scores
    } else {
        [1.0 / FEATURE_COUNT as f64; FEATURE_COUNT]
    }
}
