//! Process-lifetime dashboard context.
//!
//! Holds the dataset and trained forest. Built exactly once at startup by
//! [`DashboardContext::initialize`] and shared read-only afterwards (it is
//! deliberately not `Clone`; share it behind an `Arc`).

use std::path::Path;
use tracing::info;

use crate::dataset::{Dataset, FEATURE_COLUMNS};
use crate::errors::{ModelError, TrainerError};
use crate::forest::{ForestConfig, ForestTrainer, RandomForest};
use crate::inputs::InputVector;
use crate::recommend::{Advisory, AdvisoryThresholds};

#[derive(Debug)]
pub struct DashboardContext {
    dataset: Dataset,
    model: RandomForest,
    thresholds: AdvisoryThresholds,
}

impl DashboardContext {
    /// Load the dataset and train the forest. Either failure is fatal.
    pub fn initialize<P: AsRef<Path>>(
        dataset_path: P,
        config: &ForestConfig,
        thresholds: AdvisoryThresholds,
    ) -> Result<Self, ModelError> {
        let path = dataset_path.as_ref();
        info!("Loading dataset from: {}", path.display());

        let dataset = Dataset::from_csv(path)?;
        info!("Loaded {} observations", dataset.len());
        for (column, (min, max)) in FEATURE_COLUMNS.iter().zip(dataset.feature_stats()) {
            info!("  {}: min={}, max={}", column, min, max);
        }

        Ok(Self::from_dataset(dataset, config, thresholds)?)
    }

    /// Train on an already loaded dataset.
    pub fn from_dataset(
        dataset: Dataset,
        config: &ForestConfig,
        thresholds: AdvisoryThresholds,
    ) -> Result<Self, TrainerError> {
        let model = ForestTrainer::new(config.clone()).train(&dataset)?;

        Ok(Self {
            dataset,
            model,
            thresholds,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn model(&self) -> &RandomForest {
        &self.model
    }

    pub fn thresholds(&self) -> &AdvisoryThresholds {
        &self.thresholds
    }

    /// Predicted yield in tons/ha.
    pub fn predict(&self, input: &InputVector) -> f64 {
        self.model.predict(&input.as_features())
    }

    pub fn recommend(&self, prediction: f64, input: &InputVector) -> Vec<Advisory> {
        self.thresholds
            .evaluate(prediction, input.rainfall_mm(), input.soil_nitrogen_mgkg())
    }
}
