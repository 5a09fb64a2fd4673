//! The train → evaluate → track procedure.

use std::fs;

use anyhow::Context;
use tracing::info;

use entrack::prelude::*;
use entrack_elasticnet::ElasticNet;
use entrack_mlflow::{ArtifactStore, MlflowClient};

use crate::config::Params;

/// Metrics of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Run one complete train-evaluate-log cycle.
///
/// Datasets are loaded and the model is fitted and scored before the first
/// tracking call, so a bad dataset never leaves a half-recorded run behind.
/// Once the run is open, any error on the way out marks it as failed.
pub fn train_and_evaluate(config: &Params) -> anyhow::Result<Report> {
    let target = &config.base.target_col;
    let train = Dataset::from_csv(&config.split_data.train_path, target)?;
    let test = Dataset::from_csv(&config.split_data.test_path, target)?;
    if train.feature_names() != test.feature_names() {
        return Err(Error::FeatureMismatch.into());
    }
    info!(
        samples = train.nsamples(),
        features = train.nfeatures(),
        target,
        "loaded training split"
    );

    let estimator = &config.estimators.elastic_net.params;
    let model = ElasticNet::params()
        .penalty(estimator.alpha)
        .l1_ratio(estimator.l1_ratio)
        .random_seed(config.base.random_state)
        .fit(&train)?;
    info!(n_steps = model.n_steps(), "model fitted");

    let predicted = model.predict(&test);
    let rmse = predicted.root_mean_squared_error(test.targets());
    let mae = predicted.mean_absolute_error(test.targets());
    let r2 = predicted.r2(test.targets());

    println!(
        "Elasticnet model (alpha={}, l1_ratio={}):",
        estimator.alpha, estimator.l1_ratio
    );
    println!("  RMSE: {}", rmse);
    println!("  MAE: {}", mae);
    println!("  R2: {}", r2);

    let mlflow = &config.mlflow_config;
    let client = MlflowClient::new(&mlflow.remote_server_uri);
    let experiment_id = client.experiment_id_by_name(&mlflow.experiment_name)?;
    let run = client.start_run(&experiment_id, &mlflow.run_name)?;

    run.log_param("alpha", &estimator.alpha.to_string())?;
    run.log_param("l1_ratio", &estimator.l1_ratio.to_string())?;
    run.log_param("random_state", &config.base.random_state.to_string())?;

    run.log_metric("rmse", rmse)?;
    run.log_metric("mae", mae)?;
    run.log_metric("r2", r2)?;

    let serialized = serde_json::to_vec_pretty(&model)?;
    match ArtifactStore::from_uri(run.artifact_uri()) {
        ArtifactStore::Remote => {
            run.log_model(&serialized)?;
            run.register_model(&mlflow.registered_model_name)?;
        }
        ArtifactStore::Local => {
            // the backend keeps artifacts on this filesystem, keep the model
            // next to it instead of going through the registry
            fs::create_dir_all(&config.model_dir).with_context(|| {
                format!("cannot create model directory {}", config.model_dir.display())
            })?;
            let model_path = config.model_dir.join("model.json");
            fs::write(&model_path, &serialized)
                .with_context(|| format!("cannot persist model to {}", model_path.display()))?;
            info!(path = %model_path.display(), "persisted model locally");
        }
    }

    run.finish()?;

    Ok(Report { rmse, mae, r2 })
}
