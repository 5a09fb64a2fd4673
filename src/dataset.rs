//! Single-target tabular datasets.
//!
//! A [`Dataset`] keeps the feature matrix and the target vector together with
//! the feature column names, so that splits loaded from different files can be
//! checked against each other before a model is fitted across them.

use std::path::Path;

use csv::ReaderBuilder;
use ndarray::{Array1, Array2, Axis};
use ndarray_csv::Array2Reader;

use crate::error::{Error, Result};

/// An immutable collection of feature records and one continuous target.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Array2<f64>,
    targets: Array1<f64>,
    feature_names: Vec<String>,
}

impl Dataset {
    /// Create a dataset from a feature matrix with shape `(n_samples,
    /// n_features)` and a target vector with shape `(n_samples)`.
    ///
    /// Feature names default to `feature-0`, `feature-1`, ... and can be
    /// replaced with [`with_feature_names`](Dataset::with_feature_names).
    pub fn new(records: Array2<f64>, targets: Array1<f64>) -> Dataset {
        let feature_names = (0..records.ncols())
            .map(|i| format!("feature-{}", i))
            .collect();

        Dataset {
            records,
            targets,
            feature_names,
        }
    }

    /// Replace the feature names, in column order.
    pub fn with_feature_names<S: Into<String>>(mut self, names: Vec<S>) -> Dataset {
        self.feature_names = names.into_iter().map(|x| x.into()).collect();
        self
    }

    /// Load a comma-separated file with a header row and split off the column
    /// named `target_col` as the target vector.
    ///
    /// Every other column becomes a feature, in file order. The target column
    /// is never part of the returned feature matrix or feature names.
    pub fn from_csv<P: AsRef<Path>>(path: P, target_col: &str) -> Result<Dataset> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .from_path(path)
            .map_err(|source| Error::DatasetRead {
                path: path.into(),
                source,
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| Error::DatasetRead {
                path: path.into(),
                source,
            })?
            .iter()
            .map(str::to_owned)
            .collect();

        let target_idx = headers
            .iter()
            .position(|name| name == target_col)
            .ok_or_else(|| Error::MissingTargetColumn(target_col.to_owned()))?;

        let array: Array2<f64> =
            reader
                .deserialize_array2_dynamic()
                .map_err(|source| Error::DatasetParse {
                    path: path.into(),
                    source,
                })?;

        let feature_idx: Vec<usize> = (0..array.ncols()).filter(|&i| i != target_idx).collect();
        let targets = array.column(target_idx).to_owned();
        let records = array.select(Axis(1), &feature_idx);
        let feature_names = feature_idx.iter().map(|&i| headers[i].clone()).collect();

        Ok(Dataset {
            records,
            targets,
            feature_names,
        })
    }

    /// The feature matrix with shape `(n_samples, n_features)`.
    pub fn records(&self) -> &Array2<f64> {
        &self.records
    }

    /// The target vector with shape `(n_samples)`.
    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    /// Feature column names, in the order of the record columns.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }
}
