//! Core building blocks for the `entrack` training pipeline.
//!
//! This crate holds everything the pipeline crates share: a tabular
//! [`Dataset`] with named feature columns and CSV loading, the regression
//! [`metrics`](crate::metrics) used for evaluation, and the
//! [`traits`](crate::traits) that separate hyperparameter sets from fitted
//! models.
//!
//! The model itself lives in `entrack-elasticnet`, the tracking client in
//! `entrack-mlflow` and the command line front end in `entrack-cli`.

pub mod dataset;
pub mod error;
pub mod metrics;
pub mod prelude;
pub mod traits;

pub use dataset::Dataset;
pub use error::{Error, Result};
