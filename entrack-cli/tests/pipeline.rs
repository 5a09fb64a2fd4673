//! Pipeline behavior that does not need a live tracking server.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use entrack_cli::config::{
    Base, ElasticNetConfig, Estimator, Estimators, MlflowConfig, Params, SplitData,
};
use entrack_cli::pipeline::train_and_evaluate;

// nothing listens here; any tracking call fails with a transport error
const UNREACHABLE_TRACKER: &str = "http://127.0.0.1:1";

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn params(train_path: PathBuf, test_path: PathBuf, model_dir: PathBuf) -> Params {
    Params {
        base: Base {
            random_state: 42,
            target_col: "quality".to_owned(),
        },
        split_data: SplitData {
            train_path,
            test_path,
        },
        model_dir,
        estimators: Estimators {
            elastic_net: Estimator {
                params: ElasticNetConfig {
                    alpha: 0.5,
                    l1_ratio: 0.5,
                },
            },
        },
        mlflow_config: MlflowConfig {
            remote_server_uri: UNREACHABLE_TRACKER.to_owned(),
            experiment_name: "wine-quality".to_owned(),
            run_name: "elasticnet".to_owned(),
            registered_model_name: "ElasticnetWineModel".to_owned(),
        },
    }
}

#[test]
fn missing_dataset_fails_before_any_tracking_call() {
    let dir = TempDir::new().unwrap();
    let test_path = write_csv(dir.path(), "test.csv", "alcohol,quality\n9.4,5\n");

    let config = params(
        dir.path().join("does-not-exist.csv"),
        test_path,
        dir.path().join("models"),
    );
    let err = train_and_evaluate(&config).unwrap_err();

    // the dataset error surfaces, not a transport error against the
    // unreachable tracker
    assert!(matches!(
        err.downcast_ref::<entrack::Error>(),
        Some(entrack::Error::DatasetRead { .. })
    ));
}

#[test]
fn missing_target_column_fails_before_any_tracking_call() {
    let dir = TempDir::new().unwrap();
    let train_path = write_csv(dir.path(), "train.csv", "alcohol,ph\n9.4,3.5\n");
    let test_path = write_csv(dir.path(), "test.csv", "alcohol,ph\n9.8,3.2\n");

    let config = params(train_path, test_path, dir.path().join("models"));
    let err = train_and_evaluate(&config).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<entrack::Error>(),
        Some(entrack::Error::MissingTargetColumn(_))
    ));
}

#[test]
fn mismatched_feature_columns_are_rejected() {
    let dir = TempDir::new().unwrap();
    let train_path = write_csv(
        dir.path(),
        "train.csv",
        "alcohol,ph,quality\n9.4,3.5,5\n9.8,3.2,6\n",
    );
    let test_path = write_csv(
        dir.path(),
        "test.csv",
        "alcohol,sulphates,quality\n9.4,0.5,5\n",
    );

    let config = params(train_path, test_path, dir.path().join("models"));
    let err = train_and_evaluate(&config).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<entrack::Error>(),
        Some(entrack::Error::FeatureMismatch)
    ));
}

#[test]
fn tracking_failure_surfaces_after_fitting() {
    let dir = TempDir::new().unwrap();
    let train_path = write_csv(
        dir.path(),
        "train.csv",
        "alcohol,quality\n0.0,1.0\n1.0,3.0\n2.0,5.0\n3.0,7.0\n",
    );
    let test_path = write_csv(
        dir.path(),
        "test.csv",
        "alcohol,quality\n4.0,9.0\n5.0,11.0\n",
    );

    let config = params(train_path, test_path, dir.path().join("models"));
    let err = train_and_evaluate(&config).unwrap_err();

    // datasets load and the model fits; the first failure is the tracker
    assert!(matches!(
        err.downcast_ref::<entrack_mlflow::TrackingError>(),
        Some(entrack_mlflow::TrackingError::Transport(_))
    ));
}
