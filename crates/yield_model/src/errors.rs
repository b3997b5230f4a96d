use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the observation dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read dataset header: {0}")]
    Header(#[source] csv::Error),

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: column `{column}` is not a finite number")]
    NonFinite { row: usize, column: &'static str },
}

/// Errors returned by the forest trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),
}

/// Fatal startup errors for the dashboard context.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("training error: {0}")]
    Training(#[from] TrainerError),
}
