//! Synchronous client for the MLflow REST tracking API.
//!
//! The pipeline runs strictly sequentially, so the client is built on
//! [`reqwest::blocking`] and exposes a scoped-run model: a run opened through
//! [`MlflowClient::start_run`] is guaranteed to be terminated on every exit
//! path. [`ActiveRun::finish`] marks it `FINISHED`; a run that is dropped
//! without finishing is marked `FAILED`.
//!
//! ```ignore
//! let client = MlflowClient::new("http://localhost:5000");
//! let experiment_id = client.experiment_id_by_name("wine-quality")?;
//! let run = client.start_run(&experiment_id, "elasticnet")?;
//!
//! run.log_param("alpha", "0.9")?;
//! run.log_metric("rmse", 0.7)?;
//! run.finish()?;
//! ```

mod artifact;
mod client;
mod error;
mod run;

pub use artifact::ArtifactStore;
pub use client::MlflowClient;
pub use error::{Result, TrackingError};
pub use run::ActiveRun;
