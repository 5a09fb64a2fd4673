//! Scoped tracking runs.

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::{epoch_millis, MlflowClient, RunInfo};
use crate::error::{Result, TrackingError};

/// Path of the model artifact below the run's artifact root.
const MODEL_ARTIFACT_PATH: &str = "model/model.json";

#[derive(Serialize)]
struct LogParam<'a> {
    run_id: &'a str,
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct LogMetric<'a> {
    run_id: &'a str,
    key: &'a str,
    value: f64,
    timestamp: i64,
    step: i64,
}

#[derive(Serialize)]
struct CreateRegisteredModel<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateModelVersion<'a> {
    name: &'a str,
    source: String,
    run_id: &'a str,
}

/// A run opened on the tracking server.
///
/// The guard closes the run on every exit path: [`finish`](ActiveRun::finish)
/// marks it `FINISHED`, dropping the guard without finishing marks it
/// `FAILED`.
pub struct ActiveRun<'a> {
    client: &'a MlflowClient,
    run_id: String,
    artifact_uri: String,
    open: bool,
}

impl<'a> ActiveRun<'a> {
    pub(crate) fn new(client: &'a MlflowClient, info: RunInfo) -> ActiveRun<'a> {
        ActiveRun {
            client,
            run_id: info.run_id,
            artifact_uri: info.artifact_uri,
            open: true,
        }
    }

    /// The server-assigned run identifier.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The artifact root the server assigned to this run.
    pub fn artifact_uri(&self) -> &str {
        &self.artifact_uri
    }

    /// Record one scalar parameter under the run.
    pub fn log_param(&self, key: &str, value: &str) -> Result<()> {
        self.client.post_ok(
            "runs/log-parameter",
            &LogParam {
                run_id: &self.run_id,
                key,
                value,
            },
        )
    }

    /// Record one scalar metric under the run. The evaluation is single-shot,
    /// so the step is always 0.
    pub fn log_metric(&self, key: &str, value: f64) -> Result<()> {
        self.client.post_ok(
            "runs/log-metric",
            &LogMetric {
                run_id: &self.run_id,
                key,
                value,
                timestamp: epoch_millis(),
                step: 0,
            },
        )
    }

    /// Upload the serialized model below the run's artifact root.
    ///
    /// The tracking server only accepts uploads for artifact roots it proxies
    /// itself (`mlflow-artifacts:` scheme). For roots the server does not
    /// proxy, e.g. a bucket reached with store credentials, the model version
    /// is registered by run source alone and nothing is uploaded here.
    pub fn log_model(&self, bytes: &[u8]) -> Result<()> {
        match self.artifact_uri.strip_prefix("mlflow-artifacts:/") {
            Some(root) => {
                let url = format!(
                    "{}/api/2.0/mlflow-artifacts/artifacts/{}/{}",
                    self.client.base(),
                    root.trim_start_matches('/'),
                    MODEL_ARTIFACT_PATH,
                );
                self.client.put_bytes(&url, bytes.to_vec())
            }
            None => {
                debug!(
                    uri = %self.artifact_uri,
                    "artifact root is not proxied by the tracking server, skipping upload"
                );
                Ok(())
            }
        }
    }

    /// Register the run's model in the model registry, creating the
    /// registered model on first use.
    pub fn register_model(&self, name: &str) -> Result<()> {
        match self
            .client
            .post_ok("registered-models/create", &CreateRegisteredModel { name })
        {
            // every run after the first one finds the model already there
            Err(TrackingError::Api { code, .. }) if code == "RESOURCE_ALREADY_EXISTS" => {}
            other => other?,
        }

        self.client.post_ok(
            "model-versions/create",
            &CreateModelVersion {
                name,
                source: format!("runs:/{}/model", self.run_id),
                run_id: &self.run_id,
            },
        )
    }

    /// Mark the run as successfully completed.
    pub fn finish(mut self) -> Result<()> {
        self.open = false;
        self.client.update_run(&self.run_id, "FINISHED")
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if self.open {
            // best effort, Drop cannot propagate the error
            if let Err(err) = self.client.update_run(&self.run_id, "FAILED") {
                warn!(run_id = %self.run_id, %err, "could not mark run as failed");
            }
        }
    }
}
