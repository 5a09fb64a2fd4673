//! Error types shared across the workspace.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read dataset at {path}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset at {path} is not numeric tabular data")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: ndarray_csv::ReadError,
    },
    #[error("target column `{0}` not present in dataset header")]
    MissingTargetColumn(String),
    #[error("train and test splits expose different feature columns")]
    FeatureMismatch,
    #[error("invalid parameter: {0}")]
    InvalidParams(String),
    #[error("not enough samples to fit a model")]
    NotEnoughSamples,
}
