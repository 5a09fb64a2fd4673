//! HTTP plumbing for the MLflow tracking server.

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrackingError};
use crate::run::ActiveRun;

/// Client for one MLflow tracking server.
///
/// Holds the connection pool and the server base URI. Every call blocks until
/// the server answers; there are no retries.
pub struct MlflowClient {
    http: Client,
    base: String,
}

#[derive(Serialize)]
struct CreateExperiment<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateExperimentResponse {
    experiment_id: String,
}

#[derive(Deserialize)]
struct GetExperimentResponse {
    experiment: Experiment,
}

#[derive(Deserialize)]
struct Experiment {
    experiment_id: String,
}

#[derive(Serialize)]
struct CreateRun<'a> {
    experiment_id: &'a str,
    run_name: &'a str,
    start_time: i64,
}

#[derive(Deserialize)]
pub(crate) struct CreateRunResponse {
    pub(crate) run: Run,
}

#[derive(Deserialize)]
pub(crate) struct Run {
    pub(crate) info: RunInfo,
}

#[derive(Deserialize)]
pub(crate) struct RunInfo {
    pub(crate) run_id: String,
    pub(crate) artifact_uri: String,
}

#[derive(Serialize)]
struct UpdateRun<'a> {
    run_id: &'a str,
    status: &'a str,
    end_time: i64,
}

#[derive(Deserialize)]
struct ApiError {
    error_code: String,
    message: String,
}

impl MlflowClient {
    /// Point the client at a tracking server, e.g. `http://localhost:5000`.
    pub fn new(tracking_uri: impl Into<String>) -> MlflowClient {
        MlflowClient {
            http: Client::new(),
            base: tracking_uri.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Resolve an experiment name to its id, creating the experiment when the
    /// server does not know it yet.
    pub fn experiment_id_by_name(&self, name: &str) -> Result<String> {
        let url = self.api_url("experiments/get-by-name");
        debug!(%url, name, "resolving experiment");
        let response = self
            .http
            .get(&url)
            .query(&[("experiment_name", name)])
            .send()?;

        match parse::<GetExperimentResponse>(response) {
            Ok(found) => Ok(found.experiment.experiment_id),
            Err(TrackingError::Api { code, .. }) if code == "RESOURCE_DOES_NOT_EXIST" => {
                debug!(name, "experiment does not exist yet, creating it");
                let created: CreateExperimentResponse =
                    self.post("experiments/create", &CreateExperiment { name })?;
                Ok(created.experiment_id)
            }
            Err(err) => Err(err),
        }
    }

    /// Open a named run under the experiment and hand out the scoped guard.
    pub fn start_run(&self, experiment_id: &str, run_name: &str) -> Result<ActiveRun<'_>> {
        let created: CreateRunResponse = self.post(
            "runs/create",
            &CreateRun {
                experiment_id,
                run_name,
                start_time: epoch_millis(),
            },
        )?;

        Ok(ActiveRun::new(self, created.run.info))
    }

    pub(crate) fn update_run(&self, run_id: &str, status: &str) -> Result<()> {
        self.post_ok(
            "runs/update",
            &UpdateRun {
                run_id,
                status,
                end_time: epoch_millis(),
            },
        )
    }

    pub(crate) fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.api_url(endpoint);
        debug!(%url, "mlflow request");
        let response = self.http.post(&url).json(body).send()?;
        parse(response)
    }

    pub(crate) fn post_ok<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<()> {
        let _: serde_json::Value = self.post(endpoint, body)?;
        Ok(())
    }

    pub(crate) fn put_bytes(&self, url: &str, bytes: Vec<u8>) -> Result<()> {
        debug!(%url, len = bytes.len(), "uploading artifact");
        let response = self.http.put(url).body(bytes).send()?;
        ensure_success(response).map(|_| ())
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/2.0/mlflow/{}", self.base, endpoint)
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let err = response.json::<ApiError>().unwrap_or_else(|_| ApiError {
            error_code: status.to_string(),
            message: "no error body".to_owned(),
        });
        Err(TrackingError::Api {
            code: err.error_code,
            message: err.message,
        })
    }
}

fn parse<R: DeserializeOwned>(response: Response) -> Result<R> {
    Ok(ensure_success(response)?.json()?)
}

pub(crate) fn epoch_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
