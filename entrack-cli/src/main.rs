//! Command line entry point for the entrack training pipeline.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use entrack_cli::{config::Params, pipeline};

/// Train an elastic net on a pre-split dataset and record the run to an
/// MLflow tracking server.
#[derive(Parser, Debug)]
#[command(name = "entrack", version, about)]
struct Cli {
    /// Configuration file path
    #[arg(long, default_value = "params.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let params = Params::from_path(&cli.config)?;
    pipeline::train_and_evaluate(&params)?;

    Ok(())
}
