//! YAML run configuration.
//!
//! Mirrors the layout of `params.yaml`. The file is loaded once; a missing
//! file or a missing required key aborts the run.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Root of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub base: Base,
    pub split_data: SplitData,
    /// Directory the model is persisted to when the tracking backend stores
    /// artifacts on the local filesystem.
    pub model_dir: PathBuf,
    pub estimators: Estimators,
    pub mlflow_config: MlflowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Base {
    pub random_state: u64,
    pub target_col: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitData {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Estimators {
    #[serde(rename = "ElasticNet")]
    pub elastic_net: Estimator,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Estimator {
    pub params: ElasticNetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticNetConfig {
    pub alpha: f64,
    pub l1_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MlflowConfig {
    pub remote_server_uri: String,
    pub experiment_name: String,
    pub run_name: String,
    pub registered_model_name: String,
}

impl Params {
    pub fn from_path(path: &Path) -> anyhow::Result<Params> {
        let file = File::open(path)
            .with_context(|| format!("cannot open configuration at {}", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("malformed configuration at {}", path.display()))
    }
}
