//! Crop yield model
//!
//! Loads historical yield observations, trains a deterministic random forest
//! on rainfall, temperature and soil nitrogen, and renders predictions,
//! sustainability advisories and a downloadable text report.

pub mod cart;
pub mod context;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod forest;
pub mod inputs;
pub mod recommend;
pub mod report;

pub use context::DashboardContext;
pub use dataset::{Dataset, Observation, FEATURE_COLUMNS, FEATURE_COUNT, TARGET_COLUMN};
pub use errors::{DatasetError, ModelError, TrainerError};
pub use forest::{ForestConfig, ForestTrainer, RandomForest};
pub use inputs::{Control, InputVector, CONTROLS};
pub use recommend::{Advisory, AdvisoryThresholds};
pub use report::{render, FeatureImportance, ReportView, REPORT_CONTENT_TYPE, REPORT_FILENAME};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
